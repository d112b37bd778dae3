//! Caller-facing chart options and the precedence rules that turn them into a
//! backend option tree.
//!
//! Precedence, lowest first: backend defaults, chart-kind overrides, legend
//! hiding, axis bounds, then the caller's `library` tree.

use crate::backend::Backend;
use crate::merge::{extend, merge};
use crate::series::SeriesSet;
use crate::types::ChartKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options accepted by every chart entry point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Lower bound of the value axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound of the value axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Offer a PNG download link on hover.
    pub download: bool,
    /// Backend-native options, merged last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<Value>,
}

impl ChartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn library(mut self, library: Value) -> Self {
        self.library = Some(library);
        self
    }
}

/// Build the option tree handed to `backend` for one render.
///
/// Without an explicit `min`, the axis starts at zero unless some point is
/// negative. Pie charts only take defaults, overrides and `library`.
pub fn merged_options(
    backend: &dyn Backend,
    kind: ChartKind,
    series: &SeriesSet,
    opts: &ChartOptions,
    hide_legend: bool,
) -> Value {
    let mut options = merge(backend.defaults(), &backend.overrides(kind));

    if kind != ChartKind::Pie {
        if hide_legend {
            backend.hide_legend(&mut options);
        }

        match opts.min {
            Some(min) => backend.set_min(&mut options, kind, min),
            None if !series.has_negative() => backend.set_min(&mut options, kind, 0.0),
            None => {}
        }

        if let Some(max) = opts.max {
            backend.set_max(&mut options, kind, max);
        }
    }

    if let Some(library) = &opts.library {
        extend(&mut options, library);
    }
    options
}
