//! Loads a minimax evaluator's weight vector and search depth from a JSON
//! artifact produced by an external weight-training process. Accepts the
//! two shapes seen in the wild: a flat `{weights, minimax_depth}` record,
//! and an evolutionary-search result nested under `best_individual`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::agent::minimax::evaluator::FEATURE_COUNT;
use crate::error::{MastergoalError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub values: Vec<f64>,
    pub depth: u8,
}

#[derive(Deserialize)]
struct FlatShape {
    weights: Option<Vec<f64>>,
    minimax_depth: Option<u8>,
    best_individual: Option<NestedShape>,
}

#[derive(Deserialize)]
struct NestedShape {
    weights: Vec<f64>,
    depth: u8,
}

impl Weights {
    /// Reads and validates a weights file, failing with
    /// [`MastergoalError::InvalidInput`] when neither accepted shape is
    /// present or the feature-vector length doesn't match the evaluator.
    pub fn load(path: impl AsRef<Path>) -> Result<Weights> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MastergoalError::invalid_input(format!("cannot read weights file {}: {e}", path.display())))?;
        Weights::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Weights> {
        let shape: FlatShape = serde_json::from_str(text)
            .map_err(|e| MastergoalError::invalid_input(format!("malformed weights JSON: {e}")))?;

        let (values, depth) = if let Some(values) = shape.weights {
            let depth = shape
                .minimax_depth
                .ok_or_else(|| MastergoalError::invalid_input("weights file has 'weights' but no 'minimax_depth'"))?;
            (values, depth)
        } else if let Some(nested) = shape.best_individual {
            (nested.weights, nested.depth)
        } else {
            return Err(MastergoalError::invalid_input(
                "weights file has neither 'weights' nor 'best_individual.weights'",
            ));
        };

        if values.len() != FEATURE_COUNT {
            return Err(MastergoalError::invalid_input(format!(
                "weights file has {} weights, expected {}",
                values.len(),
                FEATURE_COUNT
            )));
        }
        if depth == 0 {
            return Err(MastergoalError::invalid_input("minimax depth must be at least 1"));
        }

        Ok(Weights { values, depth })
    }

    pub fn uniform(depth: u8) -> Weights {
        Weights { values: vec![1.0; FEATURE_COUNT], depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_shape() {
        let json = format!(
            r#"{{"weights": {:?}, "minimax_depth": 3}}"#,
            vec![1.0; FEATURE_COUNT]
        );
        let w = Weights::parse(&json).unwrap();
        assert_eq!(w.depth, 3);
        assert_eq!(w.values.len(), FEATURE_COUNT);
    }

    #[test]
    fn parses_nested_best_individual_shape() {
        let json = format!(
            r#"{{"best_individual": {{"weights": {:?}, "depth": 5}}}}"#,
            vec![0.5; FEATURE_COUNT]
        );
        let w = Weights::parse(&json).unwrap();
        assert_eq!(w.depth, 5);
    }

    #[test]
    fn rejects_wrong_length() {
        let json = r#"{"weights": [1.0, 2.0], "minimax_depth": 2}"#;
        assert!(Weights::parse(json).is_err());
    }

    #[test]
    fn rejects_missing_weights() {
        let json = r#"{"minimax_depth": 2}"#;
        assert!(Weights::parse(json).is_err());
    }

    #[test]
    fn loads_from_a_real_file_on_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"weights": {:?}, "minimax_depth": 4}}"#, vec![0.1; FEATURE_COUNT]).unwrap();
        let w = Weights::load(file.path()).unwrap();
        assert_eq!(w.depth, 4);
        assert_eq!(w.values.len(), FEATURE_COUNT);
    }

    #[test]
    fn missing_file_is_an_invalid_input_error() {
        let err = Weights::load("/nonexistent/path/weights.json").unwrap_err();
        assert!(matches!(err, MastergoalError::InvalidInput { .. }));
    }
}
