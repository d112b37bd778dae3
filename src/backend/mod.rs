//! Backend adapters: map normalized series and merged options onto a charting
//! library's own structures.
//!
//! - [`Highcharts`]: series objects on a single option tree, always ready
//! - [`GoogleCharts`]: a DataTable plus options, ready once the loader fires
//!
//! A backend builds a [`NativeChart`] and mounts it into the target element; the
//! HTML adapter later replays it through the vendor's JavaScript API.

pub mod google;
pub mod highcharts;

pub use google::GoogleCharts;
pub use highcharts::Highcharts;

use crate::dom::Element;
use crate::error::RenderError;
use crate::latch::ReadyLatch;
use crate::series::{SeriesEntry, SeriesSet};
use crate::types::ChartKind;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

/// A chart as the backend library would receive it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeChart {
    /// Backend name, e.g. `"highcharts"`.
    pub backend: &'static str,
    /// JavaScript constructor invoked to draw, e.g. `"Highcharts.Chart"`.
    pub constructor: String,
    /// Backend-native data table; `null` when the data lives in `options`.
    pub data: Value,
    /// Fully merged option tree.
    pub options: Value,
    /// Redraw whenever the window is resized.
    pub redraw_on_resize: bool,
}

/// Contract shared by both charting libraries.
pub trait Backend {
    /// Short identifier (`"highcharts"`, `"google"`).
    fn name(&self) -> &'static str;

    /// Readiness of the underlying library.
    fn ready(&self) -> &ReadyLatch;

    /// Read-only default option tree; callers merge over a copy.
    fn defaults(&self) -> &Value;

    /// Kind-specific overrides merged over the defaults.
    fn overrides(&self, kind: ChartKind) -> Value;

    fn hide_legend(&self, options: &mut Value);
    fn set_min(&self, options: &mut Value, kind: ChartKind, min: f64);
    fn set_max(&self, options: &mut Value, kind: ChartKind, max: f64);

    /// Translate normalized series into the library's native chart.
    fn build(
        &self,
        kind: ChartKind,
        element_id: &str,
        series: &SeriesSet,
        options: Value,
    ) -> Result<NativeChart, RenderError>;

    /// Script tags the page must load before any chart can draw.
    fn library_scripts(&self) -> &'static [&'static str];

    /// One-time loader statement run after the library scripts, if any.
    fn loader_script(&self) -> Option<String> {
        None
    }

    /// Statement that draws `chart` into the element with id `element_id`.
    fn draw_script(&self, element_id: &str, chart: &NativeChart) -> String;

    /// JavaScript expression that evaluates to the rendered chart's SVG markup.
    fn image_markup_script(&self, element_id: &str) -> String;

    /// Build the native chart and mount it into `element`. One call, one draw.
    fn render(
        &self,
        kind: ChartKind,
        element: &Element,
        series: &SeriesSet,
        options: Value,
    ) -> Result<(), RenderError> {
        let id = element.id();
        let chart = self.build(kind, &id, series, options)?;
        debug!("{} drew {} chart into #{}", self.name(), kind, id);
        element.mount(chart);
        Ok(())
    }
}

/// Pick a backend by the globals a page exposes. Highcharts wins over Google.
pub fn detect<S: AsRef<str>>(globals: &[S]) -> Option<Rc<dyn Backend>> {
    let has = |name: &str| globals.iter().any(|g| g.as_ref() == name);
    if has("Highcharts") {
        Some(Rc::new(Highcharts::new()))
    } else if has("google") {
        Some(Rc::new(GoogleCharts::new()))
    } else {
        None
    }
}

/// Look up a backend by name (`highcharts` or `google`).
pub fn by_name(name: &str) -> Option<Rc<dyn Backend>> {
    match name.to_ascii_lowercase().as_str() {
        "highcharts" => Some(Rc::new(Highcharts::new())),
        "google" | "google-charts" | "googlecharts" => Some(Rc::new(GoogleCharts::new())),
        _ => None,
    }
}

/// JSON number, or `null` for NaN and infinities.
pub fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Column/bar layout: one row per distinct category, one cell per series.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    /// Distinct categories in first-seen order across all series.
    pub categories: Vec<String>,
    /// `rows[c][s]` is series `s` at category `c`; missing or non-numeric cells are 0.
    pub rows: Vec<Vec<f64>>,
}

impl CategoryTable {
    pub fn build(series: &[SeriesEntry<String>]) -> Self {
        let mut cells: IndexMap<&str, Vec<Option<f64>>> = IndexMap::new();
        for (i, s) in series.iter().enumerate() {
            for p in &s.data {
                cells
                    .entry(p.key.as_str())
                    .or_insert_with(|| vec![None; series.len()])[i] = Some(p.value);
            }
        }
        let categories = cells.keys().map(|k| (*k).to_string()).collect();
        let rows = cells
            .into_values()
            .map(|row| {
                row.into_iter()
                    .map(|c| c.filter(|v| !v.is_nan()).unwrap_or(0.0))
                    .collect()
            })
            .collect();
        Self { categories, rows }
    }

    /// Values of series `s`, one per category.
    pub fn column(&self, s: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[s]).collect()
    }
}

fn mismatch(kind: ChartKind, series: &SeriesSet) -> RenderError {
    let got = match series {
        SeriesSet::Time(_) => "time-keyed series",
        SeriesSet::Category(_) => "category-keyed series",
        SeriesSet::Pie(_) => "pie slices",
    };
    RenderError::Backend(format!("{kind} chart cannot draw {got}"))
}

/// Serialize `v` for inlining into a `<script>` element.
pub(crate) fn script_json(v: &Value) -> String {
    v.to_string().replace("</", "<\\/")
}
