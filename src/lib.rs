//! chartkick
//!
//! Normalize loosely-shaped series data and render it through Highcharts or
//! Google Charts. Pairs with the `chartkick` CLI.
//!
//! ### Features
//! - Line, area, column, bar and pie charts from one call each
//! - Accepts mappings, lists of pairs, or lists of named series; date strings,
//!   UNIX timestamps and numeric strings are coerced
//! - Axis minimum defaults to zero for non-negative data; `min`, `max` and a
//!   backend-native `library` tree override the defaults
//! - Inline data or JSON fetched over HTTP
//! - Standalone HTML output
//!
//! ### Example
//! ```no_run
//! use chartkick::{ChartOptions, Charts, Document, GoogleCharts};
//! use serde_json::json;
//! use std::rc::Rc;
//!
//! let doc = Document::new();
//! doc.create_element("visits");
//! let google = Rc::new(GoogleCharts::new());
//! let charts = Charts::new(doc.clone(), Some(google.clone()));
//! charts.line_chart(
//!     "visits",
//!     json!({"2023-01-01": 10, "2023-01-02": 20}),
//!     ChartOptions::new().max(50.0),
//! )?;
//! google.library_loaded();
//! std::fs::write("visits.html", chartkick::html::render_page(&doc, Some(&*google), "Visits"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod backend;
pub mod chart;
pub mod coerce;
pub mod dom;
pub mod error;
pub mod export;
pub mod fetch;
pub mod html;
pub mod latch;
pub mod merge;
pub mod options;
pub mod series;
pub mod types;

pub use backend::{Backend, GoogleCharts, Highcharts, NativeChart};
pub use chart::{Chart, ChartState, Charts, DataSource, Target};
pub use dom::{Document, Element};
pub use error::{ChartError, RenderError};
pub use options::ChartOptions;
pub use types::ChartKind;
