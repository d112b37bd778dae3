//! HTML presentation: turn a [`Document`] into a standalone page.
//!
//! Every element becomes a `<div>`. Mounted charts are replayed through the
//! backend's own JavaScript; elements holding text (errors) show it verbatim.

use crate::backend::Backend;
use crate::dom::{Content, Document, Element};
use crate::export::download_script;
use std::fmt::Write as _;

/// Height given to chart containers when the page does not size them.
pub const DEFAULT_HEIGHT: &str = "300px";

/// Escape text for use inside HTML content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn element_div(el: &Element) -> String {
    let mut style = format!("height: {DEFAULT_HEIGHT};");
    if let Some(color) = el.color() {
        let _ = write!(style, " color: {color};");
    }
    if let Some(position) = el.position() {
        let _ = write!(style, " position: {position};");
    }
    let text = el.text().unwrap_or_default();
    format!(
        "<div id=\"{}\" style=\"{}\">{}</div>",
        escape_html(&el.id()),
        escape_html(&style),
        escape_html(&text)
    )
}

/// Scripts that draw every mounted chart and wire their download links.
fn chart_scripts(document: &Document, backend: &dyn Backend) -> Vec<String> {
    let mut scripts = Vec::new();
    for el in document.elements() {
        let id = el.id();
        if let Content::Chart(chart) = &*el.content() {
            scripts.push(backend.draw_script(&id, chart));
        }
        if let Some(link) = el.download_link() {
            scripts.push(download_script(&id, &link));
        }
    }
    scripts
}

/// Render `document` as a complete HTML page.
///
/// `backend` supplies the library scripts; without one only the element
/// contents (typically error messages) are written.
pub fn render_page(document: &Document, backend: Option<&dyn Backend>, title: &str) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{}</title>", escape_html(title));
    if let Some(backend) = backend {
        for src in backend.library_scripts() {
            let _ = writeln!(page, "<script src=\"{}\"></script>", escape_html(src));
        }
        if let Some(loader) = backend.loader_script() {
            let _ = writeln!(page, "<script>{loader}</script>");
        }
    }
    page.push_str("</head>\n<body>\n");
    for el in document.elements() {
        page.push_str(&element_div(&el));
        page.push('\n');
    }
    if let Some(backend) = backend {
        let scripts = chart_scripts(document, backend);
        if !scripts.is_empty() {
            page.push_str("<script>\n");
            for s in scripts {
                page.push_str(&s);
                page.push('\n');
            }
            page.push_str("</script>\n");
        }
    }
    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn error_elements_render_as_red_text() {
        let doc = Document::new();
        doc.create_element("c").show_error("nope");
        let page = render_page(&doc, None, "t");
        assert!(page.contains("color: #ff0000;"));
        assert!(page.contains("Error Loading Chart: nope"));
        assert!(!page.contains("<script"));
    }
}
