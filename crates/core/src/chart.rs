//! Chart data normalization.
//!
//! The backend's aggregate records do not have a stable shape: depending
//! on the deployment the quantity arrives as `total`, `quantity` or
//! `cantidad`, the label as `producto` or `product`, and numbers may be
//! strings with a decimal comma. [`normalize`] folds all of these into a
//! canonical [`ChartSeries`].

use serde::Serialize;
use serde_json::Value;

/// Keys searched, in order, for the point value.
pub const VALUE_KEYS: [&str; 3] = ["total", "quantity", "cantidad"];

/// Keys searched, in order, for the point label.
pub const LABEL_KEYS: [&str; 2] = ["producto", "product"];

/// Label used when no label key is present.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub const CHART_TITLE: &str = "Product statistics";
pub const DATASET_LABEL: &str = "Quantity";

/// One bar of the aggregate chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: i64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Normalized chart series, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn new(points: Vec<ChartPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Whether the series is worth displaying.
    ///
    /// Requires at least one label and at least one strictly positive
    /// value; a non-empty series of zeros counts as no data.
    pub fn has_data(&self) -> bool {
        !self.points.is_empty() && self.points.iter().any(|p| p.value > 0)
    }
}

/// Normalize raw backend chart records.
///
/// Each record is handled on its own: a record that is not an object, or
/// that lacks every alias, becomes `{label: "Unknown", value: 0}` instead
/// of failing the whole series.
pub fn normalize(raw: &[Value]) -> ChartSeries {
    ChartSeries::new(raw.iter().map(normalize_record).collect())
}

/// Normalize a single raw record.
pub fn normalize_record(record: &Value) -> ChartPoint {
    let label = first_present(record, &LABEL_KEYS)
        .and_then(label_text)
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

    let value = first_present(record, &VALUE_KEYS)
        .map(coerce_value)
        .unwrap_or(0);

    ChartPoint { label, value }
}

/// First key in `keys` whose value exists and is not `null`.
fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = record.as_object()?;
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a raw value to an integer.
///
/// Numbers are used as-is (floats rounded). Strings have `,` replaced by
/// `.` and are parsed as `f64`; a parse failure or a non-finite result
/// yields 0, as does any other JSON type.
pub fn coerce_value(value: &Value) -> i64 {
    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i;
            }
            n.as_f64()
        }
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => n.round() as i64,
        _ => 0,
    }
}

/// Renderer-facing projection of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub dataset_label: String,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
    pub has_data: bool,
}

impl BarChart {
    pub fn from_series(series: &ChartSeries) -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            dataset_label: DATASET_LABEL.to_string(),
            labels: series.points().iter().map(|p| p.label.clone()).collect(),
            values: series.values(),
            has_data: series.has_data(),
        }
    }

    /// Largest value, used to scale bars. Zero for an empty chart.
    pub fn max_value(&self) -> i64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}
