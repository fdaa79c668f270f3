//! Classifier trait and common types

use beachsafe_core::{Error, FeatureVector, Result};

/// Trait for trained safety classifiers.
///
/// Implementations are immutable after loading and shared by every
/// inference call, so they must be `Send + Sync`.
pub trait SafetyClassifier: Send + Sync {
    /// Class probabilities indexed by Safety class code
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Most probable Safety class code for an encoded feature vector
    fn predict(&self, features: &FeatureVector) -> Result<u32> {
        most_probable(&self.predict_proba(features)?)
    }
}

/// Index of the highest probability; ties go to the lowest code
pub fn most_probable(probabilities: &[f32]) -> Result<u32> {
    let mut best: Option<(usize, f32)> = None;
    for (class, &p) in probabilities.iter().enumerate() {
        if p.is_nan() {
            return Err(Error::classifier(format!("probability of class {class} is NaN")));
        }
        if best.map_or(true, |(_, top)| p > top) {
            best = Some((class, p));
        }
    }
    best.map(|(class, _)| class as u32)
        .ok_or_else(|| Error::classifier("classifier returned no probabilities"))
}

/// Where a prediction's label came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionSource {
    /// Decoded from the classifier output
    Model,
    /// Conservative label substituted after a call-time failure
    Fallback { reason: String },
}

/// Detailed result of one inference call
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Safety label
    pub label: beachsafe_core::SafetyLabel,

    /// Model output or fallback
    pub source: PredictionSource,

    /// Encoded features, when encoding ran
    pub features: Option<FeatureVector>,

    /// Class probabilities, when the classifier produced them
    pub probabilities: Option<Vec<f32>>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl Prediction {
    /// Whether the label is the conservative fallback
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PredictionSource::Fallback { .. })
    }

    /// Highest class probability, if the classifier produced probabilities
    pub fn confidence(&self) -> Option<f32> {
        let probabilities = self.probabilities.as_ref()?;
        probabilities
            .iter()
            .copied()
            .fold(None, |best: Option<f32>, p| Some(best.map_or(p, |b| b.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_probable_prefers_lowest_code_on_ties() {
        assert_eq!(most_probable(&[0.2, 0.8, 0.0]).unwrap(), 1);
        assert_eq!(most_probable(&[0.4, 0.2, 0.4]).unwrap(), 0);
        assert_eq!(most_probable(&[0.0, 0.5, 0.5]).unwrap(), 1);
    }

    #[test]
    fn test_most_probable_rejects_empty_and_nan() {
        assert!(matches!(most_probable(&[]), Err(Error::Classifier(_))));
        assert!(most_probable(&[0.5, f32::NAN]).is_err());
    }
}
