// Pairwise correlation matrix between athletic measurements.
//
// Source format: a JSON object keyed by measurement name whose values are
// objects keyed by measurement name, e.g. {"RAS": {"RAS": 1, "Speed": 0.4}}.
// The outer key order defines both axes.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

const DIAGONAL_TOLERANCE: f64 = 1e-6;

/// Square matrix of correlation coefficients. Cells that were missing,
/// non-numeric, or outside `[-1, 1]` are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct CorrelationMatrix {
    measures: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    fn index_of(&self, measure: &str) -> Option<usize> {
        self.measures.iter().position(|m| m == measure)
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.index_of(row)?;
        let c = self.index_of(col)?;
        self.cell(r, c)
    }

    /// Cell by axis index.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Measures whose self-correlation is missing or not 1.
    pub fn diagonal_anomalies(&self) -> Vec<&str> {
        (0..self.len())
            .filter(|&i| {
                self.cell(i, i)
                    .map_or(true, |v| (v - 1.0).abs() > DIAGONAL_TOLERANCE)
            })
            .map(|i| self.measures[i].as_str())
            .collect()
    }

    /// Other measures ranked by the strength of their correlation with
    /// `target`, strongest first. Missing cells are skipped.
    pub fn ranked_against(&self, target: &str) -> Vec<(&str, f64)> {
        let Some(t) = self.index_of(target) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&str, f64)> = self
            .measures
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != t)
            .filter_map(|(i, m)| self.cell(t, i).map(|v| (m.as_str(), v)))
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked
    }
}

fn coefficient(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && (-1.0..=1.0).contains(v))
}

impl From<Value> for CorrelationMatrix {
    fn from(value: Value) -> Self {
        let Value::Object(rows) = value else {
            warn!("correlation data is not a JSON object; treating as empty");
            return CorrelationMatrix::default();
        };

        let measures: Vec<String> = rows.keys().cloned().collect();
        let cells = measures
            .iter()
            .map(|row| {
                let row_obj = rows.get(row).and_then(Value::as_object);
                if row_obj.is_none() {
                    warn!("correlation row '{}' is not an object", row);
                }
                measures
                    .iter()
                    .map(|col| coefficient(row_obj.and_then(|o| o.get(col))))
                    .collect()
            })
            .collect();

        CorrelationMatrix { measures, cells }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
