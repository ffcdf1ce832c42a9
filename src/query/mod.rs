//! Fixed-shape element queries
//!
//! The canvas only ever asks a handful of questions of a document:
//! `.//tag`, `.//*[@id=X]`, `.//tag[@id=X]/leaf`, `.//g[@id=X]//leaf` and
//! group lookups by Inkscape attributes. They are expressed as a
//! [`Selector`] (one location step with predicates) plus the [`axes`]
//! helpers that chain steps.
//!
//! Element names match by local name, so documents with or without the SVG
//! default namespace (or with an `svg:` prefix) behave the same.

pub mod axes;
pub mod selector;

pub use axes::{select, select_path, Axis};
pub use selector::Selector;

use crate::dom::{NodeId, XmlDocument};

/// SVG namespace
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// Inkscape extension namespace (`inkscape:label`, `inkscape:groupmode`, ...)
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
/// Sodipodi namespace (`sodipodi:docname`)
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";

/// Look up an attribute by namespace, falling back to the conventional
/// prefix when the document never declared the namespace
pub fn ns_attribute<'d>(doc: &'d XmlDocument, node: NodeId, uri: &str, prefix: &str, local: &str) -> Option<&'d str> {
    doc.get_attribute_ns(node, uri, local)
        .or_else(|| doc.get_attribute(node, &format!("{prefix}:{local}")))
}

/// `inkscape:*` attribute of an element
pub fn inkscape_attribute<'d>(doc: &'d XmlDocument, node: NodeId, local: &str) -> Option<&'d str> {
    ns_attribute(doc, node, INKSCAPE_NS, "inkscape", local)
}
