//! Highcharts adapter: everything, series included, lives in one option tree.

use super::{Backend, CategoryTable, NativeChart, mismatch, number, script_json};
use crate::error::RenderError;
use crate::latch::ReadyLatch;
use crate::merge::set_path;
use crate::series::{SeriesEntry, SeriesSet};
use crate::types::ChartKind;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

static DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "chart": {},
        "xAxis": {
            "labels": { "style": { "fontSize": "12px" } }
        },
        "yAxis": {
            "title": { "text": null },
            "labels": { "style": { "fontSize": "12px" } }
        },
        "title": { "text": null },
        "credits": { "enabled": false },
        "legend": { "borderWidth": 0 },
        "tooltip": { "style": { "fontSize": "12px" } },
        "plotOptions": {
            "areaspline": {},
            "series": { "marker": {} }
        },
        "exporting": { "enabled": false }
    })
});

const SCRIPTS: &[&str] = &["https://code.highcharts.com/highcharts.js"];

/// Highcharts is loaded synchronously, so its latch starts open.
#[derive(Debug, Clone)]
pub struct Highcharts {
    ready: ReadyLatch,
}

impl Highcharts {
    pub fn new() -> Self {
        Self {
            ready: ReadyLatch::open_now(),
        }
    }

    fn chart_type(kind: ChartKind) -> &'static str {
        match kind {
            ChartKind::Line => "spline",
            ChartKind::Area => "areaspline",
            ChartKind::Column => "column",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

impl Default for Highcharts {
    fn default() -> Self {
        Self::new()
    }
}

/// Series object: `name` (if any), `data`, then caller extras. Unnamed series are
/// left for Highcharts to label.
fn series_object<K>(entry: &SeriesEntry<K>, data: Vec<Value>) -> Map<String, Value> {
    let mut obj = Map::new();
    if let Some(name) = &entry.name {
        obj.insert("name".into(), Value::String(name.clone()));
    }
    obj.insert("data".into(), Value::Array(data));
    for (k, v) in &entry.extra {
        obj.insert(k.clone(), v.clone());
    }
    obj
}

impl Backend for Highcharts {
    fn name(&self) -> &'static str {
        "highcharts"
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
                "plotOptions": {
                    "areaspline": { "stacking": "normal" },
                    "series": { "marker": { "enabled": false } }
                }
            }),
            _ => json!({}),
        }
    }

    fn hide_legend(&self, options: &mut Value) {
        set_path(options, &["legend", "enabled"], Value::Bool(false));
    }

    fn set_min(&self, options: &mut Value, _kind: ChartKind, min: f64) {
        set_path(options, &["yAxis", "min"], number(min));
    }

    fn set_max(&self, options: &mut Value, _kind: ChartKind, max: f64) {
        set_path(options, &["yAxis", "max"], number(max));
    }

    fn build(
        &self,
        kind: ChartKind,
        element_id: &str,
        series: &SeriesSet,
        mut options: Value,
    ) -> Result<NativeChart, RenderError> {
        let native_series: Vec<Value> = match (kind, series) {
            (ChartKind::Line | ChartKind::Area, SeriesSet::Time(entries)) => {
                set_path(&mut options, &["xAxis", "type"], json!("datetime"));
                entries
                    .iter()
                    .map(|s| {
                        let data = s
                            .data
                            .iter()
                            .filter_map(|p| Some(json!([p.key.millis()?, number(p.value)])))
                            .collect();
                        let mut obj = series_object(s, data);
                        obj.insert("marker".into(), json!({ "symbol": "circle" }));
                        Value::Object(obj)
                    })
                    .collect()
            }
            (ChartKind::Column | ChartKind::Bar, SeriesSet::Category(entries)) => {
                let table = CategoryTable::build(entries);
                set_path(&mut options, &["xAxis", "categories"], json!(table.categories));
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let data = table.column(i).into_iter().map(number).collect();
                        Value::Object(series_object(s, data))
                    })
                    .collect()
            }
            (ChartKind::Pie, SeriesSet::Pie(slices)) => {
                let data: Vec<Value> = slices
                    .iter()
                    .map(|s| json!([s.label, number(s.value)]))
                    .collect();
                vec![json!({ "type": "pie", "name": "Value", "data": data })]
            }
            _ => return Err(mismatch(kind, series)),
        };

        if kind != ChartKind::Pie {
            set_path(&mut options, &["chart", "type"], json!(Self::chart_type(kind)));
        }
        set_path(&mut options, &["chart", "renderTo"], json!(element_id));
        set_path(&mut options, &["series"], Value::Array(native_series));

        Ok(NativeChart {
            backend: self.name(),
            constructor: "Highcharts.Chart".into(),
            data: Value::Null,
            options,
            redraw_on_resize: false,
        })
    }

    fn library_scripts(&self) -> &'static [&'static str] {
        SCRIPTS
    }

    fn draw_script(&self, _element_id: &str, chart: &NativeChart) -> String {
        format!("new {}({});", chart.constructor, script_json(&chart.options))
    }

    fn image_markup_script(&self, element_id: &str) -> String {
        format!(
            "(function () {{ var el = document.getElementById({id}); \
             var chart = Highcharts.charts.filter(function (c) {{ return c && c.renderTo === el; }})[0]; \
             return chart.getSVG({{exporting: {{sourceWidth: el.offsetWidth}}}}); }})()",
            id = json!(element_id)
        )
    }
}
