//! DOM Module - Arena-based XML Document
//!
//! Implements an editable DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names, values and text
//! - Namespace resolution at parse time

pub mod document;
pub mod node;
pub mod strings;
pub mod writer;

pub use document::{ParseOptions, XmlDocument, XML_NAMESPACE};
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::StringPool;

use crate::error::Result;
use std::borrow::Cow;

/// Read access to a document tree
///
/// The field resolver and candidate reducer are generic over this trait, so
/// they only ever see tags, children, attributes and element text.
pub trait DocumentAccess {
    /// Get root element ID
    fn root_element_id(&self) -> Option<NodeId>;

    fn get_node(&self, id: NodeId) -> Option<&XmlNode>;

    /// Qualified element name as written (`svg:tspan`)
    fn node_name(&self, id: NodeId) -> Option<&str>;

    /// Get node local name (without prefix)
    fn node_local_name(&self, id: NodeId) -> Option<&str>;

    /// Content of a text, CDATA or comment node
    fn text_content(&self, id: NodeId) -> Option<&str>;

    /// Get attribute value by qualified name
    fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str>;

    /// Element text: the leading run of text/CDATA children before the first
    /// other child, `None` when the element starts with no text node at all
    fn text(&self, id: NodeId) -> Option<Cow<'_, str>>;

    /// Iterate over children - returns collected Vec for trait object compatibility
    fn children_vec(&self, id: NodeId) -> Vec<NodeId>;

    /// Iterate over descendants in document order, excluding `id` itself
    fn descendants_vec(&self, id: NodeId) -> Vec<NodeId>;

    #[inline]
    fn is_element(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(XmlNode::is_element)
    }

    fn element_children_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children_vec(id)
            .into_iter()
            .filter(|&child| self.is_element(child))
            .collect()
    }
}

/// Write access used when filling fields
pub trait DocumentMut: DocumentAccess {
    /// Replace the element text; an empty string still leaves an (empty) text node
    fn set_text(&mut self, id: NodeId, value: &str) -> Result<()>;

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()>;
}
