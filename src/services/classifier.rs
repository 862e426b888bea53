// Classifier adapter
// Loads the trained forest artifact once at startup and turns raw predictions
// into a verdict plus a confidence percentage. The artifact is opaque: the
// engine only relies on the 10-column input contract and the -1/+1 output.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::models::analysis::Verdict;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Artifact loading failures. All of these are fatal at startup: the service
/// must not accept requests without a usable classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model artifact declares {artifact} feature columns, engine produces {engine}")]
    FeatureCountMismatch { artifact: usize, engine: usize },

    #[error("Model artifact contains no classes")]
    NoClasses,

    #[error("Model artifact contains no trees")]
    EmptyForest,

    #[error("Malformed tree in model artifact: {0}")]
    MalformedTree(String),
}

// =============================================================================
// ARTIFACT FORMAT
// =============================================================================

/// On-disk JSON artifact exported by the training pipeline.
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    #[allow(dead_code)]
    schema_version: u32,
    feature_count: usize,
    classes: Vec<i8>,
    supports_probability: bool,
    trees: Vec<Tree>,
}

#[derive(Debug, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class_counts: Vec<u32>,
    },
}

// =============================================================================
// FOREST
// =============================================================================

/// Decision forest over the ternary feature columns.
#[derive(Debug)]
pub struct Forest {
    classes: Vec<i8>,
    trees: Vec<Tree>,
}

impl Forest {
    /// Walk one tree to its leaf counts. Load-time validation guarantees
    /// child indices move strictly forward, so the walk terminates.
    fn leaf_counts<'t>(&self, tree: &'t Tree, vector: &[i8; FEATURE_COUNT]) -> &'t [u32] {
        let mut index = 0usize;
        loop {
            match &tree.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if f64::from(vector[*feature]) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                },
                Node::Leaf { class_counts } => return class_counts,
            }
        }
    }

    /// Per-tree class distribution: leaf counts normalized to sum 1.
    fn tree_distribution(&self, tree: &Tree, vector: &[i8; FEATURE_COUNT]) -> Vec<f64> {
        let counts = self.leaf_counts(tree, vector);
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return vec![0.0; counts.len()];
        }
        counts
            .iter()
            .map(|&c| f64::from(c) / f64::from(total))
            .collect()
    }

    /// Majority vote across trees, each tree voting for its leaf's dominant
    /// class. Ties resolve to the first class in artifact order.
    fn predict_by_vote(&self, vector: &[i8; FEATURE_COUNT]) -> i8 {
        let mut votes = vec![0u32; self.classes.len()];
        for tree in &self.trees {
            let counts = self.leaf_counts(tree, vector);
            if let Some(winner) = argmax(counts) {
                votes[winner] += 1;
            }
        }
        self.classes[argmax(&votes).unwrap_or(0)]
    }

    /// Averaged per-tree distributions, aligned with the artifact's class
    /// order. This is the probability interface.
    fn predict_distribution(&self, vector: &[i8; FEATURE_COUNT]) -> Vec<f64> {
        let mut accumulated = vec![0.0f64; self.classes.len()];
        for tree in &self.trees {
            for (slot, p) in accumulated
                .iter_mut()
                .zip(self.tree_distribution(tree, vector))
            {
                *slot += p;
            }
        }
        let tree_count = self.trees.len() as f64;
        for slot in accumulated.iter_mut() {
            *slot /= tree_count;
        }
        accumulated
    }
}

fn argmax<T: PartialOrd + Copy>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {},
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// The loaded classifier. Probability support is decided once, from the
/// artifact, when the model is loaded. It is never probed per request.
#[derive(Debug)]
pub enum Classifier {
    /// Discrete prediction only; confidence is pinned at 100.
    Discrete(Forest),
    /// Prediction plus a class probability distribution.
    Probabilistic(Forest),
}

/// Verdict and confidence for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    pub confidence: f64,
}

impl Classifier {
    /// Load and validate the artifact. Any failure here must abort startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&content)?;

        if artifact.feature_count != FEATURE_COUNT {
            return Err(ClassifierError::FeatureCountMismatch {
                artifact: artifact.feature_count,
                engine: FEATURE_COUNT,
            });
        }
        if artifact.classes.is_empty() {
            return Err(ClassifierError::NoClasses);
        }
        if artifact.trees.is_empty() {
            return Err(ClassifierError::EmptyForest);
        }
        for (tree_index, tree) in artifact.trees.iter().enumerate() {
            validate_tree(tree_index, tree, artifact.classes.len())?;
        }

        info!(
            "Classifier loaded from {}: {} trees, {} classes, probability={}",
            path.display(),
            artifact.trees.len(),
            artifact.classes.len(),
            artifact.supports_probability
        );

        let forest = Forest {
            classes: artifact.classes,
            trees: artifact.trees,
        };
        if artifact.supports_probability {
            Ok(Classifier::Probabilistic(forest))
        } else {
            Ok(Classifier::Discrete(forest))
        }
    }

    /// Raw class prediction in `{-1, +1}` (whatever the artifact trained on).
    pub fn predict(&self, vector: &FeatureVector) -> i8 {
        let encoded = vector.as_array();
        match self {
            Classifier::Discrete(forest) => forest.predict_by_vote(&encoded),
            Classifier::Probabilistic(forest) => {
                let distribution = forest.predict_distribution(&encoded);
                forest.classes[argmax(&distribution).unwrap_or(0)]
            },
        }
    }

    /// Class probability distribution, when this classifier supports one.
    pub fn predict_probability(&self, vector: &FeatureVector) -> Option<Vec<f64>> {
        match self {
            Classifier::Discrete(_) => None,
            Classifier::Probabilistic(forest) => {
                Some(forest.predict_distribution(&vector.as_array()))
            },
        }
    }

    /// Verdict plus confidence percentage.
    ///
    /// Confidence is 100 when no probability interface exists and when the
    /// distribution is single-class (an under-trained artifact is tolerated,
    /// not rejected). Otherwise it is the maximum of the distribution, scaled
    /// to percent and rounded to 2 decimals. Max rather than a lookup by class
    /// label, since class-to-index order is the artifact's business.
    pub fn classify(&self, vector: &FeatureVector) -> Prediction {
        let verdict = Verdict::from_raw(self.predict(vector));
        let confidence = match self.predict_probability(vector) {
            Some(distribution) if distribution.len() >= 2 => {
                let max = distribution.iter().fold(0.0f64, |a, &b| a.max(b));
                round_percent(max * 100.0)
            },
            _ => 100.0,
        };
        Prediction {
            verdict,
            confidence,
        }
    }

    pub fn tree_count(&self) -> usize {
        self.forest().trees.len()
    }

    pub fn class_count(&self) -> usize {
        self.forest().classes.len()
    }

    pub fn supports_probability(&self) -> bool {
        matches!(self, Classifier::Probabilistic(_))
    }

    fn forest(&self) -> &Forest {
        match self {
            Classifier::Discrete(forest) | Classifier::Probabilistic(forest) => forest,
        }
    }
}

fn validate_tree(tree_index: usize, tree: &Tree, class_count: usize) -> Result<(), ClassifierError> {
    if tree.nodes.is_empty() {
        return Err(ClassifierError::MalformedTree(format!(
            "tree {} has no nodes",
            tree_index
        )));
    }
    for (node_index, node) in tree.nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                left,
                right,
                ..
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(ClassifierError::MalformedTree(format!(
                        "tree {} node {} splits on feature {}",
                        tree_index, node_index, feature
                    )));
                }
                // Children must point strictly forward: this is what lets the
                // prediction walk run without cycle detection.
                if *left <= node_index || *right <= node_index {
                    return Err(ClassifierError::MalformedTree(format!(
                        "tree {} node {} has backward child index",
                        tree_index, node_index
                    )));
                }
                if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                    return Err(ClassifierError::MalformedTree(format!(
                        "tree {} node {} has out-of-range child index",
                        tree_index, node_index
                    )));
                }
            },
            Node::Leaf { class_counts } => {
                if class_counts.len() != class_count {
                    return Err(ClassifierError::MalformedTree(format!(
                        "tree {} node {} has {} class counts, artifact declares {} classes",
                        tree_index,
                        node_index,
                        class_counts.len(),
                        class_count
                    )));
                }
            },
        }
    }
    Ok(())
}

fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Signal;

    fn vector(first: Signal) -> FeatureVector {
        FeatureVector {
            ip_literal_host: first,
            url_length: Signal::Safe,
            shortener: Signal::Safe,
            at_symbol: Signal::Safe,
            double_slash_redirect: Signal::Safe,
            hyphenated_host: Signal::Safe,
            subdomain_depth: Signal::Safe,
            https_scheme: Signal::Safe,
            image_source_locality: Signal::Safe,
            anchor_href_locality: Signal::Safe,
        }
    }

    fn write_artifact(json: &str) -> std::path::PathBuf {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let file = std::env::temp_dir().join(format!(
            "phishguard-model-{}-{}.json",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&file, json).unwrap();
        file
    }

    fn stump_artifact(supports_probability: bool, classes: &str, leaves: &str) -> Classifier {
        let json = format!(
            r#"{{
                "schema_version": 1,
                "feature_count": 10,
                "classes": {classes},
                "supports_probability": {supports_probability},
                "trees": [{{"nodes": [
                    {{"kind": "split", "feature": 0, "threshold": 0.0, "left": 1, "right": 2}},
                    {leaves}
                ]}}]
            }}"#
        );
        let file = write_artifact(&json);
        let classifier = Classifier::load(&file).unwrap();
        std::fs::remove_file(&file).ok();
        classifier
    }

    fn two_class_stump(supports_probability: bool) -> Classifier {
        stump_artifact(
            supports_probability,
            "[-1, 1]",
            r#"{"kind": "leaf", "class_counts": [3, 1]},
               {"kind": "leaf", "class_counts": [1, 3]}"#,
        )
    }

    #[test]
    fn negative_prediction_is_phishing() {
        let classifier = two_class_stump(true);
        assert_eq!(classifier.predict(&vector(Signal::Suspicious)), -1);
        assert_eq!(
            classifier.classify(&vector(Signal::Suspicious)).verdict,
            Verdict::Phishing
        );
        assert_eq!(
            classifier.classify(&vector(Signal::Safe)).verdict,
            Verdict::Legitimate
        );
    }

    #[test]
    fn probabilistic_confidence_is_max_of_distribution() {
        let classifier = two_class_stump(true);
        let prediction = classifier.classify(&vector(Signal::Suspicious));
        assert_eq!(prediction.confidence, 75.0);

        let distribution = classifier
            .predict_probability(&vector(Signal::Suspicious))
            .unwrap();
        assert_eq!(distribution, vec![0.75, 0.25]);
    }

    #[test]
    fn discrete_classifier_reports_full_confidence() {
        let classifier = two_class_stump(false);
        assert!(!classifier.supports_probability());
        assert!(classifier
            .predict_probability(&vector(Signal::Suspicious))
            .is_none());
        let prediction = classifier.classify(&vector(Signal::Suspicious));
        assert_eq!(prediction.verdict, Verdict::Phishing);
        assert_eq!(prediction.confidence, 100.0);
    }

    #[test]
    fn degenerate_single_class_model_tolerated() {
        let classifier = stump_artifact(
            true,
            "[1]",
            r#"{"kind": "leaf", "class_counts": [4]},
               {"kind": "leaf", "class_counts": [4]}"#,
        );
        let prediction = classifier.classify(&vector(Signal::Suspicious));
        assert_eq!(prediction.verdict, Verdict::Legitimate);
        assert_eq!(prediction.confidence, 100.0);
    }

    #[test]
    fn confidence_rounds_to_two_decimals() {
        // Leaf counts of 2/1 give 2/3 = 66.666..% -> 66.67.
        let classifier = stump_artifact(
            true,
            "[-1, 1]",
            r#"{"kind": "leaf", "class_counts": [2, 1]},
               {"kind": "leaf", "class_counts": [1, 2]}"#,
        );
        let prediction = classifier.classify(&vector(Signal::Suspicious));
        assert_eq!(prediction.confidence, 66.67);
        assert!((0.0..=100.0).contains(&prediction.confidence));
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let result = Classifier::load("/nonexistent/model.json");
        assert!(matches!(result, Err(ClassifierError::Io { .. })));
    }

    #[test]
    fn feature_count_mismatch_rejected() {
        let json = r#"{
            "schema_version": 1,
            "feature_count": 9,
            "classes": [-1, 1],
            "supports_probability": true,
            "trees": [{"nodes": [{"kind": "leaf", "class_counts": [1, 1]}]}]
        }"#;
        let file = write_artifact(json);
        let result = Classifier::load(&file);
        std::fs::remove_file(&file).ok();
        assert!(matches!(
            result,
            Err(ClassifierError::FeatureCountMismatch { artifact: 9, engine: 10 })
        ));
    }

    #[test]
    fn backward_child_index_rejected() {
        let json = r#"{
            "schema_version": 1,
            "feature_count": 10,
            "classes": [-1, 1],
            "supports_probability": true,
            "trees": [{"nodes": [
                {"kind": "split", "feature": 0, "threshold": 0.0, "left": 0, "right": 1},
                {"kind": "leaf", "class_counts": [1, 1]}
            ]}]
        }"#;
        let file = write_artifact(json);
        let result = Classifier::load(&file);
        std::fs::remove_file(&file).ok();
        assert!(matches!(result, Err(ClassifierError::MalformedTree(_))));
    }
}
