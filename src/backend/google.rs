//! Google Charts adapter: data goes into a DataTable, options stay separate.
//!
//! The visualization package loads asynchronously, so charts queue behind
//! [`GoogleCharts::ready`] until [`GoogleCharts::library_loaded`] is called.

use super::{Backend, CategoryTable, NativeChart, mismatch, number, script_json};
use crate::coerce::Timestamp;
use crate::error::RenderError;
use crate::latch::ReadyLatch;
use crate::merge::set_path;
use crate::series::{SeriesEntry, SeriesSet};
use crate::types::ChartKind;
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::sync::LazyLock;

static DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "chartArea": {},
        "fontName": "'Lucida Grande', 'Lucida Sans Unicode', Verdana, Arial, Helvetica, sans-serif",
        "pointSize": 6,
        "legend": {
            "textStyle": { "fontSize": 12, "color": "#444" },
            "alignment": "center",
            "position": "right"
        },
        "curveType": "function",
        "hAxis": {
            "textStyle": { "color": "#666", "fontSize": 12 },
            "gridlines": { "color": "transparent" },
            "baselineColor": "#ccc",
            "viewWindow": {}
        },
        "vAxis": {
            "textStyle": { "color": "#666", "fontSize": 12 },
            "baselineColor": "#ccc",
            "viewWindow": {}
        },
        "tooltip": {
            "textStyle": { "color": "#666", "fontSize": 12 }
        }
    })
});

const SCRIPTS: &[&str] = &["https://www.google.com/jsapi"];

#[derive(Debug, Clone)]
pub struct GoogleCharts {
    ready: ReadyLatch,
}

impl GoogleCharts {
    /// Backend whose library has not finished loading yet.
    pub fn new() -> Self {
        Self {
            ready: ReadyLatch::pending(),
        }
    }

    /// Backend whose library is already usable.
    pub fn loaded() -> Self {
        Self {
            ready: ReadyLatch::open_now(),
        }
    }

    /// Signal that the visualization package finished loading. Queued charts draw now.
    pub fn library_loaded(&self) {
        self.ready.open();
    }

    fn constructor(kind: ChartKind) -> &'static str {
        match kind {
            ChartKind::Line => "google.visualization.LineChart",
            ChartKind::Area => "google.visualization.AreaChart",
            ChartKind::Column => "google.visualization.ColumnChart",
            ChartKind::Bar => "google.visualization.BarChart",
            ChartKind::Pie => "google.visualization.PieChart",
        }
    }

    /// Value axis bounds: horizontal for bar charts, vertical otherwise.
    fn bound_axis(kind: ChartKind) -> &'static str {
        if kind == ChartKind::Bar { "hAxis" } else { "vAxis" }
    }
}

impl Default for GoogleCharts {
    fn default() -> Self {
        Self::new()
    }
}

fn columns<K>(key_type: &str, series: &[SeriesEntry<K>]) -> Vec<Value> {
    std::iter::once(json!({ "type": key_type, "label": "" }))
        .chain(
            series
                .iter()
                .map(|s| json!({ "type": "number", "label": s.name.as_deref().unwrap_or("") })),
        )
        .collect()
}

/// Rows keyed by epoch milliseconds, ascending. Points with an invalid timestamp
/// have no place on the axis and are left out. Cells a series lacks stay `null`.
fn time_rows(series: &[SeriesEntry<Timestamp>]) -> Vec<Value> {
    let mut rows: IndexMap<Timestamp, Vec<Value>> = IndexMap::new();
    for (i, s) in series.iter().enumerate() {
        for p in s.data.iter().filter(|p| p.key.is_valid()) {
            rows.entry(p.key)
                .or_insert_with(|| vec![Value::Null; series.len()])[i] = number(p.value);
        }
    }
    rows.sort_keys();
    rows.into_iter()
        .map(|(key, cells)| {
            let mut row = vec![json!(key.millis())];
            row.extend(cells);
            Value::Array(row)
        })
        .collect()
}

fn category_rows(table: &CategoryTable) -> Vec<Value> {
    table
        .categories
        .iter()
        .zip(&table.rows)
        .map(|(category, cells)| {
            let mut row = vec![json!(category)];
            row.extend(cells.iter().copied().map(number));
            Value::Array(row)
        })
        .collect()
}

impl Backend for GoogleCharts {
    fn name(&self) -> &'static str {
        "google"
    }

    fn ready(&self) -> &ReadyLatch {
        &self.ready
    }

    fn defaults(&self) -> &Value {
        &DEFAULTS
    }

    fn overrides(&self, kind: ChartKind) -> Value {
        match kind {
            ChartKind::Area => json!({
                "isStacked": true,
                "pointSize": 0,
                "areaOpacity": 0.5
            }),
            ChartKind::Bar => json!({
                "hAxis": { "gridlines": { "color": "#ccc" } }
            }),
            ChartKind::Pie => json!({
                "chartArea": { "top": "10%", "height": "80%" }
            }),
            ChartKind::Line | ChartKind::Column => json!({}),
        }
    }

    fn hide_legend(&self, options: &mut Value) {
        set_path(options, &["legend", "position"], json!("none"));
    }

    fn set_min(&self, options: &mut Value, kind: ChartKind, min: f64) {
        set_path(options, &[Self::bound_axis(kind), "viewWindow", "min"], number(min));
    }

    fn set_max(&self, options: &mut Value, kind: ChartKind, max: f64) {
        set_path(options, &[Self::bound_axis(kind), "viewWindow", "max"], number(max));
    }

    fn build(
        &self,
        kind: ChartKind,
        _element_id: &str,
        series: &SeriesSet,
        options: Value,
    ) -> Result<NativeChart, RenderError> {
        let data = match (kind, series) {
            (ChartKind::Line | ChartKind::Area, SeriesSet::Time(entries)) => json!({
                "cols": columns("datetime", entries),
                "rows": time_rows(entries),
            }),
            (ChartKind::Column | ChartKind::Bar, SeriesSet::Category(entries)) => json!({
                "cols": columns("string", entries),
                "rows": category_rows(&CategoryTable::build(entries)),
            }),
            (ChartKind::Pie, SeriesSet::Pie(slices)) => json!({
                "cols": [
                    { "type": "string", "label": "" },
                    { "type": "number", "label": "Value" }
                ],
                "rows": slices
                    .iter()
                    .map(|s| json!([s.label, number(s.value)]))
                    .collect::<Vec<_>>(),
            }),
            _ => return Err(mismatch(kind, series)),
        };

        Ok(NativeChart {
            backend: self.name(),
            constructor: Self::constructor(kind).into(),
            data,
            options,
            redraw_on_resize: true,
        })
    }

    fn library_scripts(&self) -> &'static [&'static str] {
        SCRIPTS
    }

    fn loader_script(&self) -> Option<String> {
        Some(r#"google.load("visualization", "1.0", {"packages": ["corechart"]});"#.into())
    }

    fn draw_script(&self, element_id: &str, chart: &NativeChart) -> String {
        format!(
            r#"google.setOnLoadCallback(function () {{
  var spec = {data};
  var data = new google.visualization.DataTable();
  spec.cols.forEach(function (c) {{ data.addColumn(c.type, c.label); }});
  data.addRows(spec.rows.map(function (r) {{
    return spec.cols[0].type === "datetime" ? [new Date(r[0])].concat(r.slice(1)) : r;
  }}));
  var chart = new {constructor}(document.getElementById({id}));
  var draw = function () {{ chart.draw(data, {options}); }};
  {resize}draw();
}});"#,
            data = script_json(&chart.data),
            constructor = chart.constructor,
            id = json!(element_id),
            options = script_json(&chart.options),
            resize = if chart.redraw_on_resize {
                "window.addEventListener(\"resize\", draw);\n  "
            } else {
                ""
            },
        )
    }

    fn image_markup_script(&self, element_id: &str) -> String {
        format!(
            "document.getElementById({id}).getElementsByTagName(\"svg\")[0].parentNode.innerHTML",
            id = json!(element_id)
        )
    }
}
