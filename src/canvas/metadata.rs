//! Page size, units and authoring metadata of the `<svg>` element

use super::Canvas;
use crate::error::{FormError, Result};
use crate::query::{inkscape_attribute, ns_attribute, SODIPODI_NS};
use std::str::FromStr;

/// `viewBox` rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FromStr for ViewBox {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FormError::Attribute(format!("invalid viewBox {s:?}"));
        let numbers = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<f64>>>()?;
        match numbers[..] {
            [x, y, width, height] => Ok(ViewBox { x, y, width, height }),
            _ => Err(invalid()),
        }
    }
}

/// Everything the metadata accessors report, in one value
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasInfo {
    pub units: String,
    pub width: f64,
    pub height: f64,
    pub view_box: Option<ViewBox>,
    pub scale: f64,
    pub version: Option<String>,
    pub inkscape_version: Option<String>,
    pub docname: Option<String>,
}

/// Split `210mm` into its number and two-letter unit
fn split_length(length: &str) -> (Option<f64>, Option<&str>) {
    let length = length.trim();
    let cut = length.len().saturating_sub(2);
    match (length.get(..cut), length.get(cut..)) {
        (Some(number), Some(unit)) if cut > 0 && unit.bytes().all(|b| b.is_ascii_alphabetic()) => {
            (number.trim().parse().ok(), Some(unit))
        }
        _ => (length.parse().ok(), None),
    }
}

impl Canvas {
    fn root_attribute(&self, name: &str) -> Option<&str> {
        self.doc.get_attribute(self.root, name)
    }

    /// Unit suffix of `width`: `mm` when there is no width, `px` when the
    /// width is a bare number
    pub fn units(&self) -> &str {
        match self.root_attribute("width") {
            None => "mm",
            Some(width) => split_length(width).1.unwrap_or("px"),
        }
    }

    /// `viewBox`, `None` when missing or malformed
    pub fn view_box(&self) -> Option<ViewBox> {
        self.root_attribute("viewBox")?.parse().ok()
    }

    /// Page width in [`units`](Self::units), else the viewBox width, else 0
    pub fn width(&self) -> f64 {
        self.length("width", |vb| vb.width)
    }

    pub fn height(&self) -> f64 {
        self.length("height", |vb| vb.height)
    }

    fn length(&self, name: &str, from_view_box: impl Fn(&ViewBox) -> f64) -> f64 {
        self.root_attribute(name)
            .and_then(|value| split_length(value).0)
            .filter(|&n| n != 0.0)
            .or_else(|| self.view_box().as_ref().map(from_view_box))
            .unwrap_or(0.0)
    }

    /// User units per page unit
    pub fn scale(&self) -> f64 {
        let width = self.width();
        match self.view_box() {
            Some(vb) if width != 0.0 => vb.width / width,
            _ => 1.0,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.root_attribute("version")
    }

    pub fn inkscape_version(&self) -> Option<&str> {
        inkscape_attribute(&self.doc, self.root, "version")
    }

    pub fn docname(&self) -> Option<&str> {
        ns_attribute(&self.doc, self.root, SODIPODI_NS, "sodipodi", "docname")
    }

    pub fn set_docname(&mut self, name: &str) -> Result<()> {
        let root = self.root;
        let undeclared = self.doc.get_attribute_ns(root, SODIPODI_NS, "docname").is_none()
            && self.doc.get_attribute(root, "sodipodi:docname").is_some();
        if undeclared {
            self.doc_mut().set_attribute(root, "sodipodi:docname", name)
        } else {
            self.doc_mut().set_attribute_ns(root, SODIPODI_NS, "docname", name)
        }
    }

    pub fn info(&self) -> CanvasInfo {
        CanvasInfo {
            units: self.units().to_string(),
            width: self.width(),
            height: self.height(),
            view_box: self.view_box(),
            scale: self.scale(),
            version: self.version().map(str::to_string),
            inkscape_version: self.inkscape_version().map(str::to_string),
            docname: self.docname().map(str::to_string),
        }
    }
}
