//! Classifier artifact: a bagged ensemble of decision trees plus the
//! label-to-recommendation lookup table. Both are persisted as JSON and
//! loaded once at startup.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base text used when the classifier emits a label the map does not know.
pub const FALLBACK_RECOMMENDATION: &str = "General review sessions recommended.";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("feature vector has {got} values, model expects {expected}")]
    FeatureWidth { got: usize, expected: usize },
    #[error("model contains no trees")]
    EmptyModel,
    #[error("training failed: {0}")]
    Training(String),
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The serving boundary: anything that maps a feature vector to a label.
/// Production uses [`ForestModel`]; tests plug in fixed or failing stubs.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<usize, ModelError>;
}

/// Bootstrap-aggregated decision trees with majority voting.
#[derive(Serialize, Deserialize)]
pub struct ForestModel {
    trees: Vec<DecisionTree<f64, usize>>,
    n_features: usize,
    pub accuracy: f64,
}

impl ForestModel {
    /// Fits `n_trees` trees, each on a bootstrap resample drawn with the
    /// seeded generator so training is reproducible.
    pub fn fit(
        features: &Array2<f64>,
        targets: &Array1<usize>,
        n_trees: usize,
        seed: u64,
    ) -> Result<Self, ModelError> {
        if n_trees == 0 {
            return Err(ModelError::EmptyModel);
        }
        let n_rows = features.nrows();
        if n_rows == 0 || targets.len() != n_rows {
            return Err(ModelError::Training(format!(
                "feature rows ({}) and targets ({}) do not line up",
                n_rows,
                targets.len()
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut trees = Vec::with_capacity(n_trees);
        for _ in 0..n_trees {
            let mut sample_x = Array2::zeros((n_rows, features.ncols()));
            let mut sample_y = Array1::zeros(n_rows);
            for row in 0..n_rows {
                let pick = rng.gen_range(0..n_rows);
                sample_x.row_mut(row).assign(&features.row(pick));
                sample_y[row] = targets[pick];
            }
            let dataset = Dataset::new(sample_x, sample_y);
            let tree = DecisionTree::params()
                .max_depth(Some(16))
                .fit(&dataset)
                .map_err(|e| ModelError::Training(e.to_string()))?;
            trees.push(tree);
        }

        Ok(Self {
            trees,
            n_features: features.ncols(),
            accuracy: 0.0,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        if model.trees.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Majority-vote predictions for a whole feature matrix.
    pub fn predict_batch(&self, features: &Array2<f64>) -> Result<Array1<usize>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if features.ncols() != self.n_features {
            return Err(ModelError::FeatureWidth {
                got: features.ncols(),
                expected: self.n_features,
            });
        }

        let per_tree: Vec<Array1<usize>> =
            self.trees.iter().map(|tree| tree.predict(features)).collect();

        let mut labels = Array1::zeros(features.nrows());
        for row in 0..features.nrows() {
            let votes: Vec<usize> = per_tree.iter().map(|p| p[row]).collect();
            labels[row] = majority(&votes);
        }
        Ok(labels)
    }

    /// Fraction of holdout rows predicted correctly.
    pub fn evaluate(
        &self,
        features: &Array2<f64>,
        targets: &Array1<usize>,
    ) -> Result<f64, ModelError> {
        let predictions = self.predict_batch(features)?;
        let correct = predictions
            .iter()
            .zip(targets.iter())
            .filter(|(pred, actual)| pred == actual)
            .count();
        Ok(correct as f64 / targets.len() as f64)
    }
}

impl Classifier for ForestModel {
    fn predict(&self, features: &[f64]) -> Result<usize, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureWidth {
                got: features.len(),
                expected: self.n_features,
            });
        }
        let matrix = Array2::from_shape_vec((1, self.n_features), features.to_vec())
            .map_err(|e| ModelError::Training(e.to_string()))?;
        let labels = self.predict_batch(&matrix)?;
        Ok(labels[0])
    }
}

/// Most frequent label; ties break toward the smallest label.
fn majority(votes: &[usize]) -> usize {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &vote in votes {
        *counts.entry(vote).or_insert(0) += 1;
    }
    let mut winner = 0;
    let mut best = 0;
    for (label, count) in counts {
        if count > best {
            best = count;
            winner = label;
        }
    }
    winner
}

/// Fixed label-to-sentence table shared read-only across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationMap(HashMap<usize, String>);

impl RecommendationMap {
    /// The five base recommendations the trainer persists alongside the model.
    pub fn defaults() -> Self {
        let entries = [
            (0, "Focus on visual aids like diagrams and videos to enhance understanding."),
            (1, "Engage in hands-on activities and practical exercises to improve retention."),
            (2, "Use written summaries and note-taking to reinforce learning."),
            (3, "Incorporate group discussions and interactive forums to boost engagement."),
            (4, "Schedule regular review sessions to address low performance areas."),
        ];
        Self(
            entries
                .into_iter()
                .map(|(label, text)| (label, text.to_string()))
                .collect(),
        )
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn base_text(&self, label: usize) -> &str {
        self.0
            .get(&label)
            .map(String::as_str)
            .unwrap_or(FALLBACK_RECOMMENDATION)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Startup snapshot surfaced on the model info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub accuracy: f64,
    pub trees: usize,
    pub features: usize,
}

impl ModelInfo {
    pub fn from_model(model: &ForestModel) -> Self {
        Self {
            accuracy: model.accuracy,
            trees: model.n_trees(),
            features: model.n_features(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_model() -> ForestModel {
        // Two well-separated classes on one axis.
        let features = array![
            [1.0, 10.0],
            [2.0, 11.0],
            [1.5, 9.0],
            [8.0, 50.0],
            [9.0, 52.0],
            [8.5, 49.0],
        ];
        let targets = array![0, 0, 0, 1, 1, 1];
        ForestModel::fit(&features, &targets, 15, 42).unwrap()
    }

    #[test]
    fn majority_breaks_ties_toward_smallest_label() {
        assert_eq!(majority(&[2, 2, 4, 4]), 2);
        assert_eq!(majority(&[3]), 3);
        assert_eq!(majority(&[1, 0, 1, 0, 1]), 1);
    }

    #[test]
    fn fit_separates_toy_classes() {
        let model = toy_model();
        assert_eq!(model.predict(&[1.2, 10.5]).unwrap(), 0);
        assert_eq!(model.predict(&[8.7, 51.0]).unwrap(), 1);
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let model = toy_model();
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ModelError::FeatureWidth { got: 1, expected: 2 })
        ));
    }

    #[test]
    fn zero_trees_is_an_error() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let targets = array![0, 1];
        assert!(matches!(
            ForestModel::fit(&features, &targets, 0, 42),
            Err(ModelError::EmptyModel)
        ));
    }

    #[test]
    fn artifact_round_trip_preserves_predictions() {
        let model = toy_model();
        let file = tempfile::NamedTempFile::new().unwrap();
        model.save(file.path()).unwrap();

        let restored = ForestModel::load(file.path()).unwrap();
        assert_eq!(restored.n_trees(), model.n_trees());
        assert_eq!(
            restored.predict(&[1.2, 10.5]).unwrap(),
            model.predict(&[1.2, 10.5]).unwrap()
        );
    }

    #[test]
    fn map_falls_back_for_unknown_labels() {
        let map = RecommendationMap::defaults();
        assert_eq!(map.len(), 5);
        assert!(map.base_text(0).starts_with("Focus on visual aids"));
        assert_eq!(map.base_text(99), FALLBACK_RECOMMENDATION);
    }

    #[test]
    fn map_round_trips_through_json() {
        let map = RecommendationMap::defaults();
        let file = tempfile::NamedTempFile::new().unwrap();
        map.save(file.path()).unwrap();

        let restored = RecommendationMap::load(file.path()).unwrap();
        assert_eq!(restored.base_text(3), map.base_text(3));
    }
}
