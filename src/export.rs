//! Download affordance: a PNG link that appears while hovering a chart.
//!
//! The image itself is produced in the browser: the backend's SVG markup is
//! rasterized with canvg when the page supports canvas and data-URI navigation.

use crate::backend::Backend;
use crate::dom::Element;
use serde::Serialize;

/// File name offered by the browser's save dialog.
pub const DOWNLOAD_FILE_NAME: &str = "chart.png";

/// Link attached to an element after a render with `download: true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadLink {
    pub file_name: String,
    /// JavaScript expression yielding the chart's SVG markup.
    pub image_script: String,
}

/// Attach a download link to `element`. The element becomes the positioning
/// context for the link.
pub fn bind_download_link(element: &Element, backend: &dyn Backend) {
    let link = DownloadLink {
        file_name: DOWNLOAD_FILE_NAME.to_string(),
        image_script: backend.image_markup_script(&element.id()),
    };
    element.set_position("relative");
    element.set_download_link(link);
}

/// Browser-side wiring for a download link: guarded on canvas and canvg support,
/// refreshed on resize, shown on mouseover and removed on mouseout.
pub fn download_script(element_id: &str, link: &DownloadLink) -> String {
    let id = serde_json::Value::from(element_id);
    let file = serde_json::Value::from(link.file_name.as_str());
    format!(
        r#"(function () {{
  var canvas = document.createElement("canvas");
  if (!(canvas.getContext && canvas.getContext("2d")) || navigator.appName === "Microsoft Internet Explorer" || !("canvg" in window)) {{ return; }}
  var element = document.getElementById({id});
  var dataUri = function () {{
    var c = document.createElement("canvas");
    window.canvg(c, {image});
    return c.toDataURL("image/png");
  }};
  var link = document.createElement("a");
  link.download = {file};
  link.style.position = "absolute";
  link.style.top = "20px";
  link.style.right = "20px";
  link.style.zIndex = 1000;
  link.target = "_blank";
  link.textContent = "⬇";
  link.href = dataUri();
  window.addEventListener("resize", function () {{ link.href = dataUri(); }});
  var outside = function (e) {{ var r = e.relatedTarget; return !r || (r !== element && !element.contains(r)); }};
  element.addEventListener("mouseover", function (e) {{ if (outside(e)) {{ element.appendChild(link); }} }});
  element.addEventListener("mouseout", function (e) {{ if (outside(e) && link.parentNode) {{ link.parentNode.removeChild(link); }} }});
}})();"#,
        id = id,
        image = link.image_script,
        file = file,
    )
}
