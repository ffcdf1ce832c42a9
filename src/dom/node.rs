//! XML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    Element,
    Text,
    /// CDATA section
    CData,
    Comment,
    ProcessingInstruction,
}

/// An XML node in the arena
///
/// Detached nodes stay in the arena with `parent == None`; ids are never reused.
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub kind: NodeKind,
    /// Parent node (None for document root and detached nodes)
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for name (elements, PI targets) or content
    /// (text, CDATA, comments)
    pub name_id: u32,
    /// Processing instruction data, or 0
    pub value_id: u32,
    /// Index into string pool for the resolved namespace URI, or 0
    pub namespace_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    pub attr_count: u16,
}

impl XmlNode {
    fn with_kind(kind: NodeKind, name_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            value_id: 0,
            namespace_id: 0,
            attr_start: 0,
            attr_count: 0,
        }
    }

    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document, 0, None)
    }

    pub fn element(name_id: u32, parent: Option<NodeId>) -> Self {
        Self::with_kind(NodeKind::Element, name_id, parent)
    }

    /// Text node; `content_id` holds the decoded text
    pub fn text(content_id: u32, parent: Option<NodeId>) -> Self {
        Self::with_kind(NodeKind::Text, content_id, parent)
    }

    pub fn cdata(content_id: u32, parent: Option<NodeId>) -> Self {
        Self::with_kind(NodeKind::CData, content_id, parent)
    }

    pub fn comment(content_id: u32, parent: Option<NodeId>) -> Self {
        Self::with_kind(NodeKind::Comment, content_id, parent)
    }

    pub fn processing_instruction(target_id: u32, data_id: u32, parent: Option<NodeId>) -> Self {
        let mut node = Self::with_kind(NodeKind::ProcessingInstruction, target_id, parent);
        node.value_id = data_id;
        node
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Text or CDATA: the kinds that make up element text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attr_count > 0
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute {
    /// Qualified name as written (`inkscape:label`)
    pub name_id: u32,
    /// Resolved namespace URI for prefixed names, or 0
    pub namespace_id: u32,
    pub value_id: u32,
}

impl XmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        XmlAttribute {
            name_id,
            namespace_id: 0,
            value_id,
        }
    }
}
