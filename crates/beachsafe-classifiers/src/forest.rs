//! Decision-forest safety classifier.
//!
//! Wraps aprender's [`RandomForestClassifier`] (CART trees with Gini
//! splits, grown on seeded bootstrap samples). Inference goes through the
//! forest's vote proportions and picks the most voted class, ties going to
//! the lowest code, so prediction is deterministic for a fixed forest and
//! input.

use crate::classifier::{most_probable, SafetyClassifier};
use aprender::primitives::Matrix;
use aprender::tree::RandomForestClassifier;
use beachsafe_core::{Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hyperparameters for growing a forest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,

    /// Maximum tree depth (root has depth 0), unlimited when `None`
    pub max_depth: Option<usize>,

    /// Base seed; tree `i` uses `random_state + i`
    pub random_state: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            random_state: 42,
        }
    }
}

/// Random forest over encoded feature rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    inner: RandomForestClassifier,
    n_estimators: usize,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Fit a forest on `x` (one row per sample) and class codes `y`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, rows differ in width, a label
    /// is not below `n_classes`, `n_estimators` is zero, or the per-tree
    /// seeds would overflow.
    pub fn fit(x: &[Vec<f32>], y: &[u32], n_classes: usize, params: &ForestParams) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::dataset("cannot fit with zero samples"));
        }
        if x.len() != y.len() {
            return Err(Error::dataset(format!(
                "{} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(Error::config("n_estimators must be at least 1"));
        }
        if params
            .random_state
            .checked_add(params.n_estimators as u64)
            .is_none()
        {
            return Err(Error::config(format!(
                "random_state {} leaves no room for {} tree seeds",
                params.random_state, params.n_estimators
            )));
        }

        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(Error::dataset("feature rows must share a non-zero width"));
        }
        if let Some(bad) = y.iter().find(|&&label| label as usize >= n_classes) {
            return Err(Error::dataset(format!(
                "label {bad} outside {n_classes} classes"
            )));
        }

        let matrix = Matrix::from_vec(x.len(), n_features, x.concat())
            .map_err(|e| Error::dataset(format!("feature matrix: {e}")))?;
        let labels: Vec<usize> = y.iter().map(|&label| label as usize).collect();

        let mut inner =
            RandomForestClassifier::new(params.n_estimators).with_random_state(params.random_state);
        if let Some(depth) = params.max_depth {
            inner = inner.with_max_depth(depth);
        }
        inner
            .fit(&matrix, &labels)
            .map_err(|e| Error::classifier(format!("forest fit failed: {e}")))?;

        Ok(Self {
            inner,
            n_estimators: params.n_estimators,
            n_features,
            n_classes,
        })
    }

    /// Number of trees
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Number of input features
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes the forest can emit
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Check the structure of a deserialized forest.
    ///
    /// aprender keeps the fitted trees private and panics on an unfitted
    /// tree or an out-of-range split feature, so the trees are checked
    /// through their serialized form before the forest serves predictions.
    pub fn validate(&self) -> Result<()> {
        if self.n_classes == 0 {
            return Err(Error::artifact("forest declares zero classes"));
        }

        let value = serde_json::to_value(&self.inner)?;
        let trees = value
            .get("trees")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::artifact("forest has no tree list"))?;
        if trees.is_empty() {
            return Err(Error::artifact("forest has no trees"));
        }
        if trees.len() != self.n_estimators {
            return Err(Error::artifact(format!(
                "forest holds {} trees, metadata declares {}",
                trees.len(),
                self.n_estimators
            )));
        }
        if !value.get("y_train").is_some_and(Value::is_array) {
            return Err(Error::artifact("forest is missing its training labels"));
        }

        for (i, tree) in trees.iter().enumerate() {
            if let Some(width) = tree.get("n_features").and_then(Value::as_u64) {
                if width as usize > self.n_features {
                    return Err(Error::artifact(format!(
                        "tree {i} was fitted on {width} features, forest has {}",
                        self.n_features
                    )));
                }
            }
            let root = tree
                .get("tree")
                .filter(|root| !root.is_null())
                .ok_or_else(|| Error::artifact(format!("tree {i} is not fitted")))?;
            self.validate_node(root)
                .map_err(|e| Error::artifact(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }

    fn validate_node(&self, node: &Value) -> std::result::Result<(), String> {
        if let Some(leaf) = node.get("Leaf") {
            let label = leaf
                .get("class_label")
                .and_then(Value::as_u64)
                .ok_or("leaf without a class label")?;
            if label as usize >= self.n_classes {
                return Err(format!(
                    "leaf class {label} outside {} classes",
                    self.n_classes
                ));
            }
            return Ok(());
        }

        let split = node.get("Node").ok_or("node is neither a split nor a leaf")?;
        let feature = split
            .get("feature_idx")
            .and_then(Value::as_u64)
            .ok_or("split without a feature index")?;
        if feature as usize >= self.n_features {
            return Err(format!(
                "split on feature {feature}, forest has {} features",
                self.n_features
            ));
        }
        for side in ["left", "right"] {
            let child = split
                .get(side)
                .ok_or_else(|| format!("split without a {side} child"))?;
            self.validate_node(child)?;
        }
        Ok(())
    }

    /// Vote proportions for one sample, indexed by class code
    pub fn predict_proba_row(&self, x: &[f32]) -> Result<Vec<f32>> {
        if x.len() != self.n_features {
            return Err(Error::classifier(format!(
                "expected {} features, got {}",
                self.n_features,
                x.len()
            )));
        }

        let sample = Matrix::from_vec(1, self.n_features, x.to_vec())
            .map_err(|e| Error::classifier(format!("feature row: {e}")))?;
        let votes = self.inner.predict_proba(&sample);

        // Classes above the highest trained label get no column
        let (_, width) = votes.shape();
        if width > self.n_classes {
            return Err(Error::classifier(format!(
                "forest voted over {width} classes, expected {}",
                self.n_classes
            )));
        }
        let mut proba = vec![0.0f32; self.n_classes];
        for (class, p) in proba.iter_mut().enumerate().take(width) {
            *p = votes.get(0, class);
        }
        Ok(proba)
    }

    /// Predicted class code for one sample; ties go to the lowest code
    pub fn predict_row(&self, x: &[f32]) -> Result<u32> {
        most_probable(&self.predict_proba_row(x)?)
    }

    /// Fraction of rows predicted correctly
    pub fn score(&self, x: &[Vec<f32>], y: &[u32]) -> Result<f32> {
        if x.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for (row, label) in x.iter().zip(y) {
            if self.predict_row(row)? == *label {
                correct += 1;
            }
        }
        Ok(correct as f32 / x.len() as f32)
    }
}

impl SafetyClassifier for RandomForest {
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        self.predict_proba_row(&features.as_f32())
    }

    fn name(&self) -> &str {
        "random-forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Class is 1 when feature 0 > 1, otherwise 0; feature 1 is noise
    fn threshold_data() -> (Vec<Vec<f32>>, Vec<u32>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for a in 0..4 {
            for b in 0..3 {
                x.push(vec![a as f32, b as f32]);
                y.push(u32::from(a > 1));
            }
        }
        (x, y)
    }

    fn params(n: usize) -> ForestParams {
        ForestParams {
            n_estimators: n,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_learns_threshold() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 2, &params(15)).unwrap();

        assert_eq!(forest.n_estimators(), 15);
        assert!(forest.validate().is_ok());
        assert_eq!(forest.score(&x, &y).unwrap(), 1.0);
        assert_eq!(forest.predict_row(&[3.0, 0.0]).unwrap(), 1);
        assert_eq!(forest.predict_row(&[0.0, 2.0]).unwrap(), 0);
    }

    #[test]
    fn test_probabilities_cover_declared_classes() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 3, &params(10)).unwrap();

        let proba = forest.predict_proba_row(&[1.0, 1.0]).unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f32>() - 1.0).abs() < 1e-4);
        assert_eq!(proba[2], 0.0);
    }

    #[test]
    fn test_fit_is_reproducible_with_seed() {
        let (x, y) = threshold_data();
        let a = RandomForest::fit(&x, &y, 2, &params(8)).unwrap();
        let b = RandomForest::fit(&x, &y, 2, &params(8)).unwrap();

        for row in &x {
            assert_eq!(
                a.predict_proba_row(row).unwrap(),
                b.predict_proba_row(row).unwrap()
            );
        }
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 2, &params(3)).unwrap();
        assert!(matches!(
            forest.predict_row(&[1.0]),
            Err(Error::Classifier(_))
        ));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(RandomForest::fit(&[], &[], 2, &params(3)).is_err());
        assert!(RandomForest::fit(&[vec![1.0]], &[5], 2, &params(3)).is_err());
        assert!(RandomForest::fit(&[vec![1.0], vec![1.0, 2.0]], &[0, 1], 2, &params(3)).is_err());
        assert!(RandomForest::fit(&[vec![1.0]], &[0], 2, &params(0)).is_err());

        let overflowing = ForestParams {
            random_state: u64::MAX,
            ..params(3)
        };
        assert!(matches!(
            RandomForest::fit(&[vec![1.0]], &[0], 2, &overflowing),
            Err(Error::Config(_))
        ));
    }

    fn corrupt(forest: &RandomForest, edit: impl FnOnce(&mut Value)) -> RandomForest {
        let mut json = serde_json::to_value(forest).unwrap();
        edit(&mut json);
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_validate_detects_corruption() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 2, &params(2)).unwrap();

        let fewer_classes = corrupt(&forest, |json| json["n_classes"] = serde_json::json!(1));
        assert!(matches!(fewer_classes.validate(), Err(Error::Artifact(_))));

        let unfitted = corrupt(&forest, |json| {
            json["inner"]["trees"][0]["tree"] = Value::Null;
        });
        assert!(matches!(unfitted.validate(), Err(Error::Artifact(_))));

        let no_trees = corrupt(&forest, |json| {
            json["inner"]["trees"] = serde_json::json!([]);
        });
        assert!(no_trees.validate().is_err());

        let narrow = corrupt(&forest, |json| json["n_features"] = serde_json::json!(1));
        assert!(matches!(narrow.validate(), Err(Error::Artifact(_))));
    }
}
