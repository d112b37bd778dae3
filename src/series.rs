//! Series normalization: arbitrary input shapes in, ordered `(key, value)` series out.
//!
//! Accepted shapes:
//! - a mapping `{"2023-01-01": 3, ...}` or a list of pairs `[["Jan", 3], ...]`
//!   (one implicit series named `"Value"`, legend hidden);
//! - a list of series objects `[{"name": "A", "data": ...}, ...]`, where each `data`
//!   is itself a mapping or a list of pairs.

use crate::coerce::{Timestamp, to_float, to_str, to_time};
use crate::types::ChartKind;
use serde::Serialize;
use serde_json::{Map, Value};

/// Name given to the implicit series of single-series input.
pub const DEFAULT_SERIES_NAME: &str = "Value";

/// One `(key, value)` observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint<K> {
    pub key: K,
    pub value: f64,
}

/// One sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry<K> {
    /// `None` when a series object carried no name; the backend picks its own label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub data: Vec<DataPoint<K>>,
    /// Remaining fields of a caller-supplied series object (e.g. `color`).
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Normalized series plus the legend decision derived from the input shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized<K> {
    pub series: Vec<SeriesEntry<K>>,
    pub hide_legend: bool,
}

pub type TimeSeries = Normalized<Timestamp>;
pub type CategorySeries = Normalized<String>;

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Input ready for a backend, tagged by key type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "keys", content = "series", rename_all = "lowercase")]
pub enum SeriesSet {
    Time(Vec<SeriesEntry<Timestamp>>),
    Category(Vec<SeriesEntry<String>>),
    Pie(Vec<Slice>),
}

impl SeriesSet {
    /// True if any point of any series is below zero. Pie data never counts.
    pub fn has_negative(&self) -> bool {
        fn any_negative<K>(series: &[SeriesEntry<K>]) -> bool {
            series.iter().flat_map(|s| &s.data).any(|p| p.value < 0.0)
        }
        match self {
            SeriesSet::Time(s) => any_negative(s),
            SeriesSet::Category(s) => any_negative(s),
            SeriesSet::Pie(_) => false,
        }
    }
}

/// Normalize `data` the way a chart of `kind` needs it.
///
/// Returns the series and whether the legend should be hidden (single implicit
/// series). Pie data never hides the legend.
pub fn normalize(kind: ChartKind, data: &Value) -> (SeriesSet, bool) {
    match kind {
        ChartKind::Line | ChartKind::Area => {
            let n = normalize_time(data);
            (SeriesSet::Time(n.series), n.hide_legend)
        }
        ChartKind::Column | ChartKind::Bar => {
            let n = normalize_categories(data);
            (SeriesSet::Category(n.series), n.hide_legend)
        }
        ChartKind::Pie => (SeriesSet::Pie(normalize_pie(data)), false),
    }
}

/// Normalize time-keyed input (line and area charts); points sorted ascending.
pub fn normalize_time(data: &Value) -> TimeSeries {
    let mut out = normalize_with(data, to_time);
    for s in &mut out.series {
        // Stable, so equal timestamps keep their source order.
        s.data.sort_by(|a, b| a.key.cmp(&b.key));
    }
    out
}

/// Normalize category-keyed input (column and bar charts); source order kept.
pub fn normalize_categories(data: &Value) -> CategorySeries {
    normalize_with(data, to_str)
}

/// Normalize pie input: a flat mapping or list of `(label, value)` pairs.
pub fn normalize_pie(data: &Value) -> Vec<Slice> {
    to_pairs(data)
        .into_iter()
        .map(|(label, value)| Slice {
            label: to_str(&label),
            value: to_float(&value),
        })
        .collect()
}

fn normalize_with<K>(data: &Value, key: impl Fn(&Value) -> K) -> Normalized<K> {
    let points = |raw: &Value| -> Vec<DataPoint<K>> {
        to_pairs(raw)
            .into_iter()
            .map(|(k, v)| DataPoint {
                key: key(&k),
                value: to_float(&v),
            })
            .collect()
    };

    if !is_multi_series(data) {
        return Normalized {
            series: vec![SeriesEntry {
                name: Some(DEFAULT_SERIES_NAME.to_string()),
                data: points(data),
                extra: Map::new(),
            }],
            hide_legend: true,
        };
    }

    let series = data
        .as_array()
        .into_iter()
        .flatten()
        .map(|item| {
            let mut extra = item.as_object().cloned().unwrap_or_default();
            let raw = extra.shift_remove("data").unwrap_or(Value::Null);
            let name = match extra.shift_remove("name") {
                Some(Value::String(s)) => Some(s),
                Some(Value::Null) | None => None,
                Some(other) => Some(to_str(&other)),
            };
            SeriesEntry {
                name,
                data: points(&raw),
                extra,
            }
        })
        .collect();

    Normalized {
        series,
        hide_legend: false,
    }
}

/// A list whose first element is an object (not a positional pair) is multi-series.
pub fn is_multi_series(data: &Value) -> bool {
    matches!(data.as_array().and_then(|a| a.first()), Some(Value::Object(_)))
}

/// Turn a mapping or a list of pairs into owned `(key, value)` pairs.
///
/// Mappings iterate in insertion order. Missing pair positions read as `null`;
/// anything that is neither list nor mapping yields no pairs.
pub fn to_pairs(data: &Value) -> Vec<(Value, Value)> {
    match data {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(pair) => (
                    pair.first().cloned().unwrap_or(Value::Null),
                    pair.get(1).cloned().unwrap_or(Value::Null),
                ),
                _ => (Value::Null, Value::Null),
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pairs_from_mapping_keep_insertion_order() {
        let pairs = to_pairs(&json!({"b": 1, "a": 2}));
        assert_eq!(pairs[0].0, json!("b"));
        assert_eq!(pairs[1].0, json!("a"));
    }

    #[test]
    fn scalars_have_no_pairs() {
        assert!(to_pairs(&json!(42)).is_empty());
        assert!(to_pairs(&Value::Null).is_empty());
    }

    #[test]
    fn list_of_pairs_is_not_multi_series() {
        assert!(!is_multi_series(&json!([["a", 1]])));
        assert!(is_multi_series(&json!([{"name": "a", "data": []}])));
        assert!(!is_multi_series(&json!([])));
    }
}
