//! Schema of the external predictor's output document

use std::collections::BTreeMap;

use serde::Deserialize;

/// One dataset's predictor output: fitted coefficients plus per-character
/// survival functions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct PredictorOutput {
    /// Attribute names, index-aligned with `mean_beta_exp`.
    pub attributes: Vec<String>,
    /// Mean exponentiated coefficient per attribute.
    pub mean_beta_exp: Vec<f64>,
    pub characters: BTreeMap<String, CharacterPrediction>,
}

impl PredictorOutput {
    /// Zips attribute names with their coefficients. Trailing entries of
    /// the longer side are dropped.
    pub(crate) fn coefficients(&self) -> BTreeMap<String, f64> {
        self.attributes
            .iter()
            .cloned()
            .zip(self.mean_beta_exp.iter().copied())
            .collect()
    }
}

/// Survival probability per year of a character's life, starting at birth
/// (book) or the show's first year (show).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CharacterPrediction {
    pub survival_function_mean: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients_zip_names_with_values() {
        let output: PredictorOutput = serde_json::from_str(
            r#"{
                "attributes": ["male", "isBastard"],
                "meanBetaExp": [1.1, 0.9],
                "characters": {
                    "Jon Snow": {"survivalFunctionMean": [1.0, 0.99]}
                }
            }"#,
        )
        .unwrap();

        let coefficients = output.coefficients();
        assert_eq!(coefficients.len(), 2);
        assert!((coefficients["male"] - 1.1).abs() < f64::EPSILON);
        assert_eq!(
            output.characters["Jon Snow"].survival_function_mean,
            vec![1.0, 0.99]
        );
    }

    #[test]
    fn mismatched_lengths_drop_the_excess() {
        let output = PredictorOutput {
            attributes: vec!["a".to_string(), "b".to_string()],
            mean_beta_exp: vec![0.5],
            characters: BTreeMap::new(),
        };
        assert_eq!(output.coefficients().len(), 1);
    }
}
