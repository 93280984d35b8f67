// Precomputed Pro Bowl probability curves.
//
// Each point gives, for one position and one RAS value, the probability of
// multiple Pro Bowl selections under two independent models. The models are
// opaque: this module only filters and orders their output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::dataset::ALL;

/// One (RAS, position) sample of both model outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPoint {
    pub ras: f64,
    pub position: String,
    pub logistic_prob: Option<f64>,
    pub forest_prob: Option<f64>,
}

/// Which model's probability to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    LogisticRegression,
    RandomForest,
}

impl Model {
    pub const ALL: [Model; 2] = [Model::LogisticRegression, Model::RandomForest];

    pub fn label(&self) -> &'static str {
        match self {
            Model::LogisticRegression => "Logistic Regression",
            Model::RandomForest => "Random Forest",
        }
    }

    pub fn probability(&self, point: &PredictionPoint) -> Option<f64> {
        match self {
            Model::LogisticRegression => point.logistic_prob,
            Model::RandomForest => point.forest_prob,
        }
    }
}

/// All loaded points, sorted by RAS ascending.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<Value>")]
pub struct PredictionSet {
    points: Vec<PredictionPoint>,
}

impl PredictionSet {
    pub fn new(mut points: Vec<PredictionPoint>) -> Self {
        points.sort_by(|a, b| a.ras.total_cmp(&b.ras));
        PredictionSet { points }
    }

    pub fn points(&self) -> &[PredictionPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `"All"` followed by the distinct positions in RAS order of first
    /// appearance. A literal `"All"` position in the data is not repeated.
    pub fn positions(&self) -> Vec<String> {
        let mut out = vec![ALL.to_string()];
        for p in &self.points {
            if !out.iter().any(|o| o == &p.position) {
                out.push(p.position.clone());
            }
        }
        out
    }

    /// Points for one position; `"All"` returns every point.
    pub fn for_position(&self, position: &str) -> Vec<&PredictionPoint> {
        self.points
            .iter()
            .filter(|p| position == ALL || p.position == position)
            .collect()
    }

    /// `(ras, probability)` pairs for a chart line, skipping points where
    /// the model has no output.
    pub fn curve(&self, position: &str, model: Model) -> Vec<(f64, f64)> {
        self.for_position(position)
            .into_iter()
            .filter_map(|p| model.probability(p).map(|prob| (p.ras, prob)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Raw JSON normalization
// ---------------------------------------------------------------------------

fn lookup<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

fn probability(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite() && (0.0..=1.0).contains(p))
}

fn point_from_value(value: &Value) -> Option<PredictionPoint> {
    let Some(obj) = value.as_object() else {
        warn!("skipping prediction entry that is not an object");
        return None;
    };
    let Some(ras) = lookup(obj, &["RAS", "ras"]).and_then(Value::as_f64).filter(|r| r.is_finite()) else {
        warn!("skipping prediction entry without a numeric RAS");
        return None;
    };
    let Some(position) = lookup(obj, &["Position", "position"]).and_then(Value::as_str) else {
        warn!("skipping prediction entry at RAS {} without a position", ras);
        return None;
    };
    Some(PredictionPoint {
        ras,
        position: position.trim().to_string(),
        logistic_prob: probability(lookup(obj, &["LogisticRegression_Prob", "logisticProb"])),
        forest_prob: probability(lookup(obj, &["RandomForest_Prob", "forestProb"])),
    })
}

impl From<Vec<Value>> for PredictionSet {
    fn from(values: Vec<Value>) -> Self {
        PredictionSet::new(values.iter().filter_map(point_from_value).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PredictionSet {
        serde_json::from_value(json!([
            {"RAS": 9.0, "Position": "WR", "LogisticRegression_Prob": 0.41, "RandomForest_Prob": 0.55},
            {"RAS": 5.0, "Position": "WR", "LogisticRegression_Prob": 0.18, "RandomForest_Prob": 0.20},
            {"RAS": 7.0, "Position": "RB", "LogisticRegression_Prob": 0.30, "RandomForest_Prob": null},
            {"RAS": 6.0, "Position": "All", "LogisticRegression_Prob": 0.25, "RandomForest_Prob": 0.27}
        ]))
        .unwrap()
    }

    #[test]
    fn points_are_sorted_by_ras() {
        let ras: Vec<f64> = sample().points().iter().map(|p| p.ras).collect();
        assert_eq!(ras, vec![5.0, 6.0, 7.0, 9.0]);
    }

    #[test]
    fn positions_start_with_all_once() {
        assert_eq!(sample().positions(), vec!["All", "WR", "RB"]);
    }

    #[test]
    fn for_position_filters_and_all_keeps_everything() {
        let set = sample();
        assert_eq!(set.for_position("WR").len(), 2);
        assert_eq!(set.for_position(ALL).len(), 4);
        assert!(set.for_position("K").is_empty());
    }

    #[test]
    fn curve_skips_missing_model_output() {
        let set = sample();
        assert_eq!(set.curve("RB", Model::LogisticRegression), vec![(7.0, 0.30)]);
        assert!(set.curve("RB", Model::RandomForest).is_empty());
        assert_eq!(
            set.curve("WR", Model::RandomForest),
            vec![(5.0, 0.20), (9.0, 0.55)]
        );
    }

    #[test]
    fn malformed_entries_degrade() {
        let set: PredictionSet = serde_json::from_value(json!([
            {"RAS": "high", "Position": "WR"},
            {"RAS": 4.0},
            "garbage",
            {"ras": 3.0, "position": "TE", "logisticProb": 1.4, "forestProb": 0.1}
        ]))
        .unwrap();
        assert_eq!(set.len(), 1);
        let p = &set.points()[0];
        assert_eq!(p.position, "TE");
        assert_eq!(p.logistic_prob, None);
        assert_eq!(p.forest_prob, Some(0.1));
    }

    #[test]
    fn model_labels() {
        assert_eq!(Model::LogisticRegression.label(), "Logistic Regression");
        assert_eq!(Model::RandomForest.label(), "Random Forest");
    }
}
