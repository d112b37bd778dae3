//! Minimal page model: a document of elements addressable by id.
//!
//! An element holds whatever the last render left in it: nothing, a mounted
//! backend chart, or an error message. The HTML adapter turns the document into a
//! page.

use crate::backend::NativeChart;
use crate::export::DownloadLink;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Prefix written in front of every reported failure.
pub const ERROR_PREFIX: &str = "Error Loading Chart: ";
/// Foreground color of an element showing an error.
pub const ERROR_COLOR: &str = "#ff0000";

/// Visible content of an element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Chart(NativeChart),
}

#[derive(Debug)]
struct ElementState {
    id: String,
    content: Content,
    color: Option<String>,
    position: Option<String>,
    download: Option<DownloadLink>,
    mounts: usize,
}

/// Shared handle to one page element.
#[derive(Debug, Clone)]
pub struct Element(Rc<RefCell<ElementState>>);

impl Element {
    /// Detached element; use [`Document::create_element`] to make it addressable.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(ElementState {
            id: id.into(),
            content: Content::Empty,
            color: None,
            position: None,
            download: None,
            mounts: 0,
        })))
    }

    pub fn id(&self) -> String {
        self.0.borrow().id.clone()
    }

    pub fn content(&self) -> Ref<'_, Content> {
        Ref::map(self.0.borrow(), |s| &s.content)
    }

    /// Text content, if the element shows text.
    pub fn text(&self) -> Option<String> {
        match &*self.content() {
            Content::Text(t) => Some(t.clone()),
            _ => None,
        }
    }

    /// The chart currently mounted, if any.
    pub fn chart(&self) -> Option<NativeChart> {
        match &*self.content() {
            Content::Chart(c) => Some(c.clone()),
            _ => None,
        }
    }

    /// How many charts have been mounted into this element over its lifetime.
    pub fn mount_count(&self) -> usize {
        self.0.borrow().mounts
    }

    pub fn color(&self) -> Option<String> {
        self.0.borrow().color.clone()
    }

    pub fn position(&self) -> Option<String> {
        self.0.borrow().position.clone()
    }

    pub fn download_link(&self) -> Option<DownloadLink> {
        self.0.borrow().download.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().content = Content::Text(text.into());
    }

    pub fn set_color(&self, color: impl Into<String>) {
        self.0.borrow_mut().color = Some(color.into());
    }

    pub fn set_position(&self, position: impl Into<String>) {
        self.0.borrow_mut().position = Some(position.into());
    }

    pub fn set_download_link(&self, link: DownloadLink) {
        self.0.borrow_mut().download = Some(link);
    }

    /// Replace the element's content with a backend chart.
    pub fn mount(&self, chart: NativeChart) {
        let mut state = self.0.borrow_mut();
        state.content = Content::Chart(chart);
        state.mounts += 1;
    }

    /// Replace the content with an error message styled as a failure.
    pub fn show_error(&self, message: &str) {
        self.set_text(format!("{ERROR_PREFIX}{message}"));
        self.set_color(ERROR_COLOR);
    }

    /// Whether both handles refer to the same element.
    pub fn same_as(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Elements of one page, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Rc<RefCell<IndexMap<String, Element>>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the element `id`, or return the existing one.
    pub fn create_element(&self, id: &str) -> Element {
        self.elements
            .borrow_mut()
            .entry(id.to_string())
            .or_insert_with(|| Element::new(id))
            .clone()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.elements.borrow().get(id).cloned()
    }

    pub fn elements(&self) -> Vec<Element> {
        self.elements.borrow().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_shared_handle() {
        let doc = Document::new();
        let a = doc.create_element("chart-1");
        let b = doc.get_element_by_id("chart-1").unwrap();
        assert!(a.same_as(&b));
        assert!(doc.get_element_by_id("missing").is_none());
    }

    #[test]
    fn show_error_sets_text_and_color() {
        let el = Element::new("x");
        el.show_error("boom");
        assert_eq!(el.text().as_deref(), Some("Error Loading Chart: boom"));
        assert_eq!(el.color().as_deref(), Some(ERROR_COLOR));
    }
}
