//! Chart facade: one entry point per chart kind.
//!
//! Each call resolves the target element, obtains the data (inline or fetched),
//! normalizes it, merges options and hands both to the backend once the backend
//! is ready. Failures are written into the element; render failures raised
//! during the call are also returned to the caller.
//!
//! ```
//! use chartkick::{ChartOptions, Charts, Document, Highcharts};
//! use serde_json::json;
//! use std::rc::Rc;
//!
//! let doc = Document::new();
//! doc.create_element("sales");
//! let charts = Charts::new(doc.clone(), Some(Rc::new(Highcharts::new())));
//! let chart = charts.column_chart("sales", json!({"Jan": 3, "Feb": 5}), ChartOptions::new())?;
//! assert!(chart.is_rendered());
//! # Ok::<(), chartkick::ChartError>(())
//! ```

use crate::backend::Backend;
use crate::dom::{Document, Element};
use crate::error::{ChartError, RenderError, Result};
use crate::export::bind_download_link;
use crate::fetch::{HttpFetcher, JsonFetch};
use crate::options::{ChartOptions, merged_options};
use crate::series::normalize;
use crate::types::ChartKind;
use log::{debug, info, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Where a chart's data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Data supplied directly.
    Inline(Value),
    /// URL of a JSON document shaped like inline data.
    Remote(String),
}

/// A JSON string is a reference to fetch; any other value is inline data.
impl From<Value> for DataSource {
    fn from(v: Value) -> Self {
        match v {
            Value::String(url) => DataSource::Remote(url),
            other => DataSource::Inline(other),
        }
    }
}

impl From<&str> for DataSource {
    fn from(url: &str) -> Self {
        DataSource::Remote(url.to_string())
    }
}

impl From<String> for DataSource {
    fn from(url: String) -> Self {
        DataSource::Remote(url)
    }
}

/// Element to render into: a handle or an element id.
#[derive(Debug, Clone)]
pub enum Target {
    Id(String),
    Element(Element),
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Id(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Id(id)
    }
}

impl From<Element> for Target {
    fn from(el: Element) -> Self {
        Target::Element(el)
    }
}

impl From<&Element> for Target {
    fn from(el: &Element) -> Self {
        Target::Element(el.clone())
    }
}

/// Lifecycle of one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    Created,
    AwaitingData,
    AwaitingBackendReady,
    Rendered,
    Errored(ChartError),
}

impl ChartState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChartState::Rendered | ChartState::Errored(_))
    }
}

/// Handle to one render sequence.
#[derive(Debug, Clone)]
pub struct Chart {
    kind: ChartKind,
    element: Element,
    state: Rc<RefCell<ChartState>>,
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn state(&self) -> ChartState {
        self.state.borrow().clone()
    }

    pub fn is_rendered(&self) -> bool {
        matches!(*self.state.borrow(), ChartState::Rendered)
    }

    /// The error the chart ended with, if any.
    pub fn error(&self) -> Option<ChartError> {
        match &*self.state.borrow() {
            ChartState::Errored(e) => Some(e.clone()),
            _ => None,
        }
    }
}

/// Everything a render continuation needs, cheap to clone into callbacks.
#[derive(Clone)]
struct Job {
    kind: ChartKind,
    element: Element,
    options: ChartOptions,
    state: Rc<RefCell<ChartState>>,
}

impl Job {
    fn set_state(&self, state: ChartState) {
        debug!("#{} {} chart -> {:?}", self.element.id(), self.kind, state);
        *self.state.borrow_mut() = state;
    }

    fn fail(&self, error: ChartError) -> ChartError {
        warn!("#{} {} chart failed: {}", self.element.id(), self.kind, error);
        self.element.show_error(&error.to_string());
        self.set_state(ChartState::Errored(error.clone()));
        error
    }

    /// Queue the draw behind the backend latch. Returns the render error if the
    /// draw ran, and failed, before this call returned.
    fn render_when_ready(&self, backend: Rc<dyn Backend>, data: Value) -> Result<()> {
        self.set_state(ChartState::AwaitingBackendReady);
        let latch = backend.ready().clone();
        let job = self.clone();
        latch.wait(move || job.draw(backend.as_ref(), &data));

        match &*self.state.borrow() {
            ChartState::Errored(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    fn draw(&self, backend: &dyn Backend, data: &Value) {
        let (series, hide_legend) = normalize(self.kind, data);
        let options = merged_options(backend, self.kind, &series, &self.options, hide_legend);
        match backend.render(self.kind, &self.element, &series, options) {
            Ok(()) => {
                if self.options.download {
                    bind_download_link(&self.element, backend);
                }
                info!("rendered {} chart into #{}", self.kind, self.element.id());
                self.set_state(ChartState::Rendered);
            }
            Err(e) => {
                self.fail(e.into());
            }
        }
    }
}

/// Entry points bound to a document, a backend and a fetcher.
///
/// Without [`Charts::with_fetcher`], an [`HttpFetcher`] is built on the first
/// remote data source and reused afterwards.
#[derive(Clone)]
pub struct Charts {
    document: Document,
    backend: Option<Rc<dyn Backend>>,
    fetcher: RefCell<Option<Rc<dyn JsonFetch>>>,
}

impl Charts {
    /// `backend: None` means no charting library is installed; every chart fails.
    pub fn new(document: Document, backend: Option<Rc<dyn Backend>>) -> Self {
        Self {
            document,
            backend,
            fetcher: RefCell::new(None),
        }
    }

    /// Replace the collaborator used for remote data sources.
    pub fn with_fetcher(self, fetcher: Rc<dyn JsonFetch>) -> Self {
        *self.fetcher.borrow_mut() = Some(fetcher);
        self
    }

    fn fetcher(&self) -> anyhow::Result<Rc<dyn JsonFetch>> {
        if let Some(fetcher) = &*self.fetcher.borrow() {
            return Ok(fetcher.clone());
        }
        let fetcher: Rc<dyn JsonFetch> = Rc::new(HttpFetcher::new()?);
        *self.fetcher.borrow_mut() = Some(fetcher.clone());
        Ok(fetcher)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn backend(&self) -> Option<&Rc<dyn Backend>> {
        self.backend.as_ref()
    }

    pub fn line_chart(
        &self,
        target: impl Into<Target>,
        source: impl Into<DataSource>,
        options: ChartOptions,
    ) -> Result<Chart> {
        self.chart(ChartKind::Line, target, source, options)
    }

    pub fn area_chart(
        &self,
        target: impl Into<Target>,
        source: impl Into<DataSource>,
        options: ChartOptions,
    ) -> Result<Chart> {
        self.chart(ChartKind::Area, target, source, options)
    }

    pub fn column_chart(
        &self,
        target: impl Into<Target>,
        source: impl Into<DataSource>,
        options: ChartOptions,
    ) -> Result<Chart> {
        self.chart(ChartKind::Column, target, source, options)
    }

    pub fn bar_chart(
        &self,
        target: impl Into<Target>,
        source: impl Into<DataSource>,
        options: ChartOptions,
    ) -> Result<Chart> {
        self.chart(ChartKind::Bar, target, source, options)
    }

    pub fn pie_chart(
        &self,
        target: impl Into<Target>,
        source: impl Into<DataSource>,
        options: ChartOptions,
    ) -> Result<Chart> {
        self.chart(ChartKind::Pie, target, source, options)
    }

    /// Start a render sequence for `kind`.
    ///
    /// Inline data renders (or queues behind the backend latch) before this returns.
    /// Remote data is fetched first; a fetch failure is shown in the element and
    /// recorded in the chart state, never returned.
    pub fn chart(
        &self,
        kind: ChartKind,
        target: impl Into<Target>,
        source: impl Into<DataSource>,
        options: ChartOptions,
    ) -> Result<Chart> {
        let element = self.resolve(target.into())?;
        let job = Job {
            kind,
            element: element.clone(),
            options,
            state: Rc::new(RefCell::new(ChartState::Created)),
        };
        let chart = Chart {
            kind,
            element,
            state: job.state.clone(),
        };

        let Some(backend) = self.backend.clone() else {
            return Err(job.fail(RenderError::LibraryNotInstalled.into()));
        };

        match source.into() {
            DataSource::Inline(data) => job.render_when_ready(backend, data)?,
            DataSource::Remote(url) => {
                job.set_state(ChartState::AwaitingData);
                let fetcher = match self.fetcher() {
                    Ok(fetcher) => fetcher,
                    Err(e) => {
                        job.fail(ChartError::DataFetch(format!("{e:#}")));
                        return Ok(chart);
                    }
                };
                let on_data = job.clone();
                let on_fail = job;
                fetcher.fetch_json(
                    &url,
                    Box::new(move |data| {
                        // Failures past this point live in the chart state.
                        let _ = on_data.render_when_ready(backend, data);
                    }),
                    Box::new(move |message| {
                        on_fail.fail(ChartError::DataFetch(message));
                    }),
                );
            }
        }
        Ok(chart)
    }

    fn resolve(&self, target: Target) -> Result<Element> {
        match target {
            Target::Element(el) => Ok(el),
            Target::Id(id) => self
                .document
                .get_element_by_id(&id)
                .ok_or_else(|| RenderError::ElementNotFound(id).into()),
        }
    }
}

impl fmt::Debug for Charts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Charts")
            .field("document", &self.document)
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}
