use chartkick::backend::Backend;
use chartkick::merge::{extend, merge};
use chartkick::options::merged_options;
use chartkick::series::normalize;
use chartkick::{ChartKind, ChartOptions, GoogleCharts, Highcharts};
use serde_json::{Value, json};

fn options_for(backend: &dyn Backend, kind: ChartKind, data: Value, opts: &ChartOptions) -> Value {
    let (series, hide_legend) = normalize(kind, &data);
    merged_options(backend, kind, &series, opts, hide_legend)
}

#[test]
fn deep_merge_is_idempotent() {
    let a = json!({"x": {"y": 1, "z": [1, {"k": "v"}]}, "w": null});
    let b = json!({"x": {"z": [2]}, "n": 3});
    let once = merge(&a, &b);
    assert_eq!(merge(&once, &b), once);
}

#[test]
fn merging_a_tree_with_itself_changes_nothing() {
    let a = json!({"x": {"y": 1, "z": [1, {"k": "v"}]}, "w": null, "s": "t"});
    assert_eq!(merge(&a, &a), a);
}

#[test]
fn deep_merge_unions_nested_objects() {
    let out = merge(&json!({"a": {"b": 1, "c": 2}}), &json!({"a": {"c": 3, "d": 4}}));
    assert_eq!(out, json!({"a": {"b": 1, "c": 3, "d": 4}}));
}

#[test]
fn deep_merge_replaces_mismatched_containers() {
    let out = merge(&json!({"a": 5, "b": [1, 2]}), &json!({"a": {"x": 1}, "b": {"y": 2}}));
    assert_eq!(out, json!({"a": {"x": 1}, "b": {"y": 2}}));
}

#[test]
fn arrays_merge_by_index() {
    let mut target = json!([{"a": 1}, 2]);
    extend(&mut target, &json!([{"b": 2}, 3, 4]));
    assert_eq!(target, json!([{"a": 1, "b": 2}, 3, 4]));
}

#[test]
fn explicit_null_overwrites() {
    let out = merge(&json!({"title": {"text": "t"}}), &json!({"title": {"text": null}}));
    assert_eq!(out, json!({"title": {"text": null}}));
}

#[test]
fn merge_leaves_inputs_untouched() {
    let a = json!({"a": {"b": 1}});
    let b = json!({"a": {"b": 2}});
    let _ = merge(&a, &b);
    assert_eq!(a, json!({"a": {"b": 1}}));
    assert_eq!(b, json!({"a": {"b": 2}}));
}

#[test]
fn non_negative_data_starts_axis_at_zero() {
    let hc = Highcharts::new();
    let opts = options_for(&hc, ChartKind::Column, json!({"a": 1, "b": 2, "c": 3}), &ChartOptions::new());
    assert_eq!(opts["yAxis"]["min"], json!(0.0));
}

#[test]
fn negative_data_leaves_min_unset() {
    let hc = Highcharts::new();
    let opts = options_for(&hc, ChartKind::Column, json!({"a": -1, "b": 2}), &ChartOptions::new());
    assert!(opts["yAxis"].get("min").is_none());
}

#[test]
fn explicit_bounds_are_applied() {
    let hc = Highcharts::new();
    let opts = options_for(
        &hc,
        ChartKind::Line,
        json!({"2023-01-01": -5}),
        &ChartOptions::new().min(-10.0).max(50.0),
    );
    assert_eq!(opts["yAxis"]["min"], json!(-10.0));
    assert_eq!(opts["yAxis"]["max"], json!(50.0));
}

#[test]
fn library_options_win_over_everything() {
    let hc = Highcharts::new();
    let opts = options_for(
        &hc,
        ChartKind::Line,
        json!({"2023-01-01": 1}),
        &ChartOptions::new()
            .max(10.0)
            .library(json!({"yAxis": {"max": 99}, "legend": {"enabled": true}})),
    );
    assert_eq!(opts["yAxis"]["max"], json!(99));
    assert_eq!(opts["legend"]["enabled"], json!(true));
    assert_eq!(opts["legend"]["borderWidth"], json!(0));
}

#[test]
fn single_series_hides_legend() {
    let data = json!({"a": 1});
    let hc = options_for(&Highcharts::new(), ChartKind::Column, data.clone(), &ChartOptions::new());
    assert_eq!(hc["legend"]["enabled"], json!(false));
    let gc = options_for(&GoogleCharts::loaded(), ChartKind::Column, data, &ChartOptions::new());
    assert_eq!(gc["legend"]["position"], json!("none"));
}

#[test]
fn named_series_keep_legend() {
    let data = json!([{"name": "a", "data": {"x": 1}}]);
    let hc = options_for(&Highcharts::new(), ChartKind::Column, data, &ChartOptions::new());
    assert!(hc["legend"].get("enabled").is_none());
}

#[test]
fn google_bar_bounds_target_horizontal_axis() {
    let gc = GoogleCharts::loaded();
    let opts = options_for(&gc, ChartKind::Bar, json!({"a": 1}), &ChartOptions::new().max(5.0));
    assert_eq!(opts["hAxis"]["viewWindow"]["min"], json!(0.0));
    assert_eq!(opts["hAxis"]["viewWindow"]["max"], json!(5.0));
    assert_eq!(opts["hAxis"]["gridlines"]["color"], json!("#ccc"));
    assert_eq!(opts["vAxis"]["viewWindow"], json!({}));
}

#[test]
fn google_column_bounds_target_vertical_axis() {
    let gc = GoogleCharts::loaded();
    let opts = options_for(&gc, ChartKind::Column, json!({"a": 1}), &ChartOptions::new());
    assert_eq!(opts["vAxis"]["viewWindow"]["min"], json!(0.0));
}

#[test]
fn area_overrides_apply() {
    let hc = options_for(&Highcharts::new(), ChartKind::Area, json!({"2023-01-01": 1}), &ChartOptions::new());
    assert_eq!(hc["plotOptions"]["areaspline"]["stacking"], json!("normal"));
    assert_eq!(hc["plotOptions"]["series"]["marker"]["enabled"], json!(false));

    let gc = options_for(&GoogleCharts::loaded(), ChartKind::Area, json!({"2023-01-01": 1}), &ChartOptions::new());
    assert_eq!(gc["isStacked"], json!(true));
    assert_eq!(gc["pointSize"], json!(0));
    assert_eq!(gc["areaOpacity"], json!(0.5));
}

#[test]
fn pie_skips_legend_and_bounds() {
    let gc = GoogleCharts::loaded();
    let opts = options_for(&gc, ChartKind::Pie, json!({"a": 1}), &ChartOptions::new().min(3.0));
    assert_eq!(opts["vAxis"]["viewWindow"], json!({}));
    assert_eq!(opts["legend"]["position"], json!("right"));
    assert_eq!(opts["chartArea"]["top"], json!("10%"));
}

#[test]
fn defaults_survive_a_merge() {
    let hc = Highcharts::new();
    let before = hc.defaults().clone();
    let _ = options_for(
        &hc,
        ChartKind::Area,
        json!({"2023-01-01": 1}),
        &ChartOptions::new().library(json!({"credits": {"enabled": true}})),
    );
    assert_eq!(hc.defaults(), &before);
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: ChartOptions = serde_json::from_str(r#"{"max": 4, "library": {"a": 1}}"#).unwrap();
    assert_eq!(opts, ChartOptions::new().max(4.0).library(json!({"a": 1})));
}
