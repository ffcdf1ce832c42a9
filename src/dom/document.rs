//! XML Document - Arena-based DOM representation
//!
//! Editable DOM storage with:
//! - Arena allocation for nodes and attributes
//! - NodeId indices for traversal
//! - String interning for names, values and text
//! - ElementTree-style element text (the leading run of text children)

use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use super::{DocumentAccess, DocumentMut};
use crate::core::attributes::split_name;
use crate::core::scanner::is_whitespace;
use crate::error::{FormError, ParseError, Result};
use crate::reader::events::{Declaration, StartElement, XmlEvent};
use crate::reader::slice::SliceReader;
use std::borrow::Cow;

/// Namespace bound to the reserved `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for loading a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject malformed input instead of recovering
    pub strict: bool,
    /// Drop ignorable whitespace-only text between elements
    pub remove_blank_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict: false,
            remove_blank_text: true,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            strict: true,
            ..ParseOptions::default()
        }
    }
}

/// An XML document stored in arena format
///
/// Node 0 is the document node. Fully owned, so it can be cloned per record
/// for batch filling or stored in a NIF resource.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
    attributes: Vec<XmlAttribute>,
    pub strings: StringPool,
    root_element: Option<NodeId>,
    declaration: Option<Declaration>,
    doctype: Option<String>,
}

impl XmlDocument {
    fn empty() -> Self {
        XmlDocument {
            nodes: vec![XmlNode::document()],
            attributes: Vec::new(),
            strings: StringPool::new(),
            root_element: None,
            declaration: None,
            doctype: None,
        }
    }

    /// Parse with default options (lenient, blank text removed)
    pub fn parse(input: &[u8]) -> std::result::Result<Self, ParseError> {
        Self::parse_with(input, &ParseOptions::default())
    }

    pub fn parse_strict(input: &[u8]) -> std::result::Result<Self, ParseError> {
        Self::parse_with(input, &ParseOptions::strict())
    }

    pub fn parse_with(input: &[u8], options: &ParseOptions) -> std::result::Result<Self, ParseError> {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        let mut doc = Self::empty();
        doc.build_from_events(input, options)?;
        Ok(doc)
    }

    /// Build DOM from XML events
    fn build_from_events(&mut self, input: &[u8], options: &ParseOptions) -> std::result::Result<(), ParseError> {
        let strict = options.strict;
        let mut reader = if strict {
            SliceReader::new_strict(input)
        } else {
            SliceReader::new(input)
        };

        let xml_prefix = self.strings.intern(b"xml");
        let xml_uri = self.strings.intern_str(XML_NAMESPACE);

        let mut stack: Vec<NodeId> = vec![0];
        let mut tag_stack: Vec<&[u8]> = Vec::new();
        // (prefix_id, uri_id) pairs per open element; prefix 0 is the default namespace
        let mut ns_scopes: Vec<Vec<(u32, u32)>> = vec![vec![(xml_prefix, xml_uri)]];
        // Whitespace-only text waiting to see whether its element closes right away
        let mut pending_blank: Option<(NodeId, Cow<'_, [u8]>)> = None;

        while let Some(event) = reader.next_event() {
            let parent_id = stack.last().copied().unwrap_or(0);

            if let Some((blank_parent, blank)) = pending_blank.take() {
                let closes_empty = matches!(event, XmlEvent::EndElement(_)) && !self.nodes[blank_parent as usize].has_children();
                if closes_empty || matches!(event, XmlEvent::Text(_)) {
                    self.append_text(blank_parent, &blank, NodeKind::Text);
                }
            }

            if strict && parent_id == 0 && self.root_element.is_some() && event.is_start_element() {
                return Err(ParseError::new("Document has multiple root elements", reader.position()));
            }

            match event {
                XmlEvent::StartElement(elem) => {
                    let name = elem.name;
                    let node_id = self.handle_element(elem, parent_id, &mut ns_scopes, strict, reader.position())?;
                    stack.push(node_id);
                    tag_stack.push(name);
                }

                XmlEvent::EmptyElement(elem) => {
                    self.handle_element(elem, parent_id, &mut ns_scopes, strict, reader.position())?;
                    ns_scopes.pop();
                }

                XmlEvent::EndElement(end_elem) => {
                    let Some(open) = tag_stack.iter().rposition(|name| *name == end_elem.name) else {
                        if strict {
                            return Err(ParseError::new(
                                format!("Unexpected end tag: </{}> without matching start tag", lossy(end_elem.name)),
                                reader.position(),
                            ));
                        }
                        continue;
                    };
                    if strict && open + 1 != tag_stack.len() {
                        let expected = tag_stack.last().copied().unwrap_or_default();
                        return Err(ParseError::new(
                            format!("Tag mismatch: <{}> closed with </{}>", lossy(expected), lossy(end_elem.name)),
                            reader.position(),
                        ));
                    }
                    // Lenient: an end tag closes every element opened after its match
                    tag_stack.truncate(open);
                    stack.truncate(open + 1);
                    ns_scopes.truncate(open + 1);
                }

                XmlEvent::Text(content) => {
                    let blank = content.iter().all(|&b| is_whitespace(b));
                    if parent_id == 0 {
                        if strict && !blank {
                            return Err(ParseError::new("Text content not allowed at document level", reader.position()));
                        }
                    } else if options.remove_blank_text && blank && !self.keeps_blank_text(parent_id) {
                        pending_blank = Some((parent_id, content));
                    } else {
                        self.append_text(parent_id, &content, NodeKind::Text);
                    }
                }

                XmlEvent::CData(content) => {
                    if parent_id == 0 {
                        if strict {
                            return Err(ParseError::new("CDATA section not allowed at document level", reader.position()));
                        }
                    } else {
                        self.append_text(parent_id, &content, NodeKind::CData);
                    }
                }

                XmlEvent::Comment(content) => {
                    let content_id = self.strings.intern(&content);
                    self.append_node(parent_id, XmlNode::comment(content_id, Some(parent_id)));
                }

                XmlEvent::ProcessingInstruction { target, data } => {
                    let target_id = self.strings.intern(target);
                    let data_id = data.map_or(0, |d| self.strings.intern(&d));
                    self.append_node(parent_id, XmlNode::processing_instruction(target_id, data_id, Some(parent_id)));
                }

                XmlEvent::DocType(content) => {
                    if strict && (self.doctype.is_some() || self.root_element.is_some()) {
                        return Err(ParseError::new("DOCTYPE must come once, before the root element", reader.position()));
                    }
                    self.doctype = Some(lossy(&content).into_owned());
                }

                XmlEvent::XmlDeclaration(declaration) => {
                    self.declaration = Some(declaration);
                }

                XmlEvent::EndDocument => break,
            }
        }

        if let Some(err) = reader.error() {
            return Err(err.clone());
        }

        if strict {
            if let Some(unclosed) = tag_stack.first() {
                return Err(ParseError::new(format!("Unclosed tag: <{}>", lossy(unclosed)), input.len()));
            }
            if self.root_element.is_none() {
                return Err(ParseError::new("Document has no root element", input.len()));
            }
        }

        Ok(())
    }

    /// Handle start/empty element; pushes the element's namespace scope
    fn handle_element(
        &mut self,
        elem: StartElement<'_>,
        parent_id: NodeId,
        ns_scopes: &mut Vec<Vec<(u32, u32)>>,
        strict: bool,
        position: usize,
    ) -> std::result::Result<NodeId, ParseError> {
        let name_id = self.strings.intern(elem.name);
        let mut node = XmlNode::element(name_id, Some(parent_id));

        // Declarations on this element are in scope for its own name and attributes
        let mut scope: Vec<(u32, u32)> = Vec::new();
        for attr in elem.attributes.iter().filter(|a| a.is_namespace_decl()) {
            let prefix_id = match attr.prefix() {
                Some(_) => self.strings.intern(attr.local_name()),
                None => 0,
            };
            scope.push((prefix_id, self.strings.intern(&attr.value)));
        }
        ns_scopes.push(scope);

        let element_prefix = elem.prefix().map_or(0, |p| self.strings.intern(p));
        match resolve_prefix(ns_scopes, element_prefix) {
            Some(uri_id) => node.namespace_id = uri_id,
            None if strict && element_prefix != 0 => {
                return Err(ParseError::new(
                    format!("Namespace prefix {} on {} is not defined", lossy(elem.prefix().unwrap_or_default()), lossy(elem.name)),
                    position,
                ));
            }
            None => {}
        }

        node.attr_start = self.attributes.len() as u32;
        node.attr_count = u16::try_from(elem.attributes.len())
            .map_err(|_| ParseError::new("Too many attributes on one element", position))?;
        for attr in &elem.attributes {
            let mut xml_attr = XmlAttribute::new(self.strings.intern(attr.name), self.strings.intern(&attr.value));
            if let (Some(prefix), false) = (attr.prefix(), attr.is_namespace_decl()) {
                let prefix_id = self.strings.intern(prefix);
                xml_attr.namespace_id = resolve_prefix(ns_scopes, prefix_id).unwrap_or(0);
            }
            self.attributes.push(xml_attr);
        }

        let node_id = self.append_node(parent_id, node);
        if parent_id == 0 && self.root_element.is_none() {
            self.root_element = Some(node_id);
        }
        Ok(node_id)
    }

    /// Blank text is significant next to other text in the same element
    fn keeps_blank_text(&self, parent_id: NodeId) -> bool {
        let parent = &self.nodes[parent_id as usize];
        let is_text = |id: Option<NodeId>| id.is_some_and(|id| self.nodes[id as usize].is_text());
        is_text(parent.last_child) || is_text(parent.first_child)
    }

    fn append_text(&mut self, parent_id: NodeId, content: &[u8], kind: NodeKind) -> NodeId {
        let content_id = self.strings.intern(content);
        let node = if kind == NodeKind::CData {
            XmlNode::cdata(content_id, Some(parent_id))
        } else {
            XmlNode::text(content_id, Some(parent_id))
        };
        self.append_node(parent_id, node)
    }

    fn append_node(&mut self, parent_id: NodeId, node: XmlNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.insert_before(parent_id, node_id, None);
        node_id
    }

    /// Link `child` under `parent`, before `before` or at the end
    fn insert_before(&mut self, parent_id: NodeId, child_id: NodeId, before: Option<NodeId>) {
        let prev = match before {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling,
            None => self.nodes[parent_id as usize].last_child,
        };

        {
            let child = &mut self.nodes[child_id as usize];
            child.parent = Some(parent_id);
            child.prev_sibling = prev;
            child.next_sibling = before;
        }
        match prev {
            Some(prev_id) => self.nodes[prev_id as usize].next_sibling = Some(child_id),
            None => self.nodes[parent_id as usize].first_child = Some(child_id),
        }
        match before {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling = Some(child_id),
            None => self.nodes[parent_id as usize].last_child = Some(child_id),
        }
    }

    /// Unlink a node from its parent and siblings; the subtree stays intact
    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id as usize];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent_id) = parent else {
            return;
        };

        match prev {
            Some(prev_id) => self.nodes[prev_id as usize].next_sibling = next,
            None => self.nodes[parent_id as usize].first_child = next,
        }
        match next {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling = prev,
            None => self.nodes[parent_id as usize].last_child = prev,
        }

        let node = &mut self.nodes[id as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    fn element(&self, id: NodeId, what: &str) -> Result<&XmlNode> {
        self.get_node(id)
            .filter(|n| n.is_element())
            .ok_or_else(|| FormError::invalid_node(what, id))
    }

    /// Remove an element (and its subtree) from the tree
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        self.element(id, "detach")?;
        if Some(id) == self.root_element {
            return Err(FormError::InvalidInput("cannot detach the root element".to_string()));
        }
        self.unlink(id);
        Ok(())
    }

    /// Whether the node is still reachable from the document node
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == 0 {
                return true;
            }
            match self.get_node(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// DOCTYPE declaration, verbatim
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    #[inline]
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    /// Element name or PI target
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => self.strings.get_str(node.name_id),
            _ => None,
        }
    }

    pub fn node_local_name(&self, id: NodeId) -> Option<&str> {
        self.node_name(id).map(|name| name.rsplit(':').next().unwrap_or(name))
    }

    /// Resolved namespace URI of an element
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.namespace_id == 0 {
            return None;
        }
        self.strings.get_str(node.namespace_id)
    }

    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Text | NodeKind::CData | NodeKind::Comment => self.strings.get_str(node.name_id),
            _ => None,
        }
    }

    /// Processing instruction data
    pub fn pi_data(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.kind != NodeKind::ProcessingInstruction || node.value_id == 0 {
            return None;
        }
        self.strings.get_str(node.value_id)
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[XmlAttribute] {
        match self.get_node(id) {
            Some(node) if node.is_element() => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or(&[])
            }
            _ => &[],
        }
    }

    /// All attribute names and values in document order
    pub fn attribute_pairs(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(id)
            .iter()
            .filter_map(|a| Some((self.strings.get_str(a.name_id)?, self.strings.get_str(a.value_id)?)))
            .collect()
    }

    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.attributes(node_id)
            .iter()
            .find(|a| self.strings.get(a.name_id) == Some(name.as_bytes()))
            .and_then(|a| self.strings.get_str(a.value_id))
    }

    /// Get an attribute by namespace URI and local name
    pub fn get_attribute_ns(&self, node_id: NodeId, uri: &str, local: &str) -> Option<&str> {
        let uri_id = self.strings.find(uri.as_bytes())?;
        self.attributes(node_id)
            .iter()
            .find(|a| a.namespace_id == uri_id && self.attribute_local_name(a) == Some(local))
            .and_then(|a| self.strings.get_str(a.value_id))
    }

    fn attribute_local_name(&self, attr: &XmlAttribute) -> Option<&str> {
        let name = self.strings.get(attr.name_id)?;
        std::str::from_utf8(split_name(name).1).ok()
    }

    /// Find the URI bound to `prefix` (empty for the default namespace) at `id`
    pub fn lookup_namespace_uri(&self, id: NodeId, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        let decl = if prefix.is_empty() {
            Cow::Borrowed("xmlns")
        } else {
            Cow::Owned(format!("xmlns:{prefix}"))
        };
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(uri) = self.get_attribute(node_id, &decl) {
                return (!uri.is_empty()).then_some(uri);
            }
            current = self.get_node(node_id).and_then(|n| n.parent);
        }
        None
    }

    /// Find a prefix bound to `uri` at `id`
    pub fn lookup_prefix(&self, id: NodeId, uri: &str) -> Option<&str> {
        if uri == XML_NAMESPACE {
            return Some("xml");
        }
        let mut current = Some(id);
        while let Some(node_id) = current {
            for attr in self.attributes(node_id) {
                let Some(name) = self.strings.get_str(attr.name_id) else {
                    continue;
                };
                if let Some(prefix) = name.strip_prefix("xmlns:") {
                    if self.strings.get_str(attr.value_id) == Some(uri)
                        && self.lookup_namespace_uri(id, prefix) == Some(uri)
                    {
                        return Some(prefix);
                    }
                }
            }
            current = self.get_node(node_id).and_then(|n| n.parent);
        }
        None
    }

    /// Set (or add) an attribute by qualified name
    ///
    /// A prefixed name is bound to whatever namespace its prefix resolves to
    /// at this element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let node = self.element(id, "set_attribute")?.clone();
        let value_id = self.strings.intern_str(value);

        let start = node.attr_start as usize;
        let end = start + node.attr_count as usize;
        if let Some(existing) = self.strings.find(name.as_bytes()) {
            if let Some(attr) = self.attributes[start..end].iter_mut().find(|a| a.name_id == existing) {
                attr.value_id = value_id;
                return Ok(());
            }
        }

        let attr_count = node
            .attr_count
            .checked_add(1)
            .ok_or_else(|| FormError::Attribute(format!("too many attributes to add {name}")))?;

        let mut attr = XmlAttribute::new(self.strings.intern_str(name), value_id);
        if let (Some(prefix), false) = (name.split_once(':').map(|(p, _)| p), name.starts_with("xmlns:")) {
            let uri = self.lookup_namespace_uri(id, prefix).map(str::to_string);
            attr.namespace_id = uri.map_or(0, |u| self.strings.intern_str(&u));
        }

        // Keep the node's attributes contiguous: move them to the arena tail unless already there
        if end != self.attributes.len() {
            let relocated: Vec<XmlAttribute> = self.attributes[start..end].to_vec();
            self.nodes[id as usize].attr_start = self.attributes.len() as u32;
            self.attributes.extend(relocated);
        }
        self.attributes.push(attr);
        self.nodes[id as usize].attr_count = attr_count;
        Ok(())
    }

    /// Set an attribute by namespace URI and local name, declaring a prefix
    /// for the URI on this element when none is in scope
    pub fn set_attribute_ns(&mut self, id: NodeId, uri: &str, local: &str, value: &str) -> Result<()> {
        self.element(id, "set_attribute_ns")?;
        if let Some(uri_id) = self.strings.find(uri.as_bytes()) {
            let existing = self
                .attributes(id)
                .iter()
                .find(|a| a.namespace_id == uri_id && self.attribute_local_name(a) == Some(local))
                .map(|a| a.name_id);
            if let Some(name) = existing.and_then(|name_id| self.strings.get_str(name_id)).map(str::to_string) {
                return self.set_attribute(id, &name, value);
            }
        }

        let bound = self.lookup_prefix(id, uri).map(str::to_string);
        let prefix = match bound {
            Some(prefix) => prefix,
            None => {
                let prefix = (0..)
                    .map(|n| format!("ns{n}"))
                    .find(|p| self.lookup_namespace_uri(id, p).is_none())
                    .unwrap_or_else(|| "ns".to_string());
                self.set_attribute(id, &format!("xmlns:{prefix}"), uri)?;
                prefix
            }
        };
        self.set_attribute(id, &format!("{prefix}:{local}"), value)
    }

    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let next = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next }
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&child| self.nodes[child as usize].is_element())
    }

    /// Descendants in document order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let next = self.get_node(id).and_then(|n| n.first_child);
        DescendantIter { doc: self, root: id, next }
    }

    /// Element text (see [`DocumentAccess::text`])
    pub fn text(&self, id: NodeId) -> Option<Cow<'_, str>> {
        let mut run = self.children(id).take_while(|&c| self.nodes[c as usize].is_text());
        let first = run.next()?;
        let first_text = self.text_content(first).unwrap_or_default();
        match run.next() {
            None => Some(Cow::Borrowed(first_text)),
            Some(second) => {
                let mut joined = String::from(first_text);
                joined.push_str(self.text_content(second).unwrap_or_default());
                for more in run {
                    joined.push_str(self.text_content(more).unwrap_or_default());
                }
                Some(Cow::Owned(joined))
            }
        }
    }

    /// Replace the element text with a single text node
    pub fn set_text(&mut self, id: NodeId, value: &str) -> Result<()> {
        self.element(id, "set_text")?;
        let run: Vec<NodeId> = self
            .children(id)
            .take_while(|&c| self.nodes[c as usize].is_text())
            .collect();
        for text_id in run {
            self.unlink(text_id);
        }

        let content_id = self.strings.intern_str(value);
        let text_id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::text(content_id, Some(id)));
        let first = self.nodes[id as usize].first_child;
        self.insert_before(id, text_id, first);
        Ok(())
    }

    /// Number of nodes in the arena (detached ones included)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Find the URI for a prefix in the open scopes, innermost first
fn resolve_prefix(scopes: &[Vec<(u32, u32)>], prefix_id: u32) -> Option<u32> {
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter().rev())
        .find(|&&(p, _)| p == prefix_id)
        .map(|&(_, uri)| uri)
        .filter(|&uri| uri != 0)
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (pre-order, depth-first)
pub struct DescendantIter<'d> {
    doc: &'d XmlDocument,
    root: NodeId,
    next: Option<NodeId>,
}

impl DescendantIter<'_> {
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.doc.get_node(id)?;
        if let Some(child) = node.first_child {
            return Some(child);
        }
        let mut current = id;
        while current != self.root {
            let node = self.doc.get_node(current)?;
            if let Some(sibling) = node.next_sibling {
                return Some(sibling);
            }
            current = node.parent?;
        }
        None
    }
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.successor(current);
        Some(current)
    }
}

// =============================================================================
// DocumentAccess / DocumentMut implementations
// =============================================================================

impl DocumentAccess for XmlDocument {
    fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        XmlDocument::get_node(self, id)
    }

    fn node_name(&self, id: NodeId) -> Option<&str> {
        XmlDocument::node_name(self, id)
    }

    fn node_local_name(&self, id: NodeId) -> Option<&str> {
        XmlDocument::node_local_name(self, id)
    }

    fn text_content(&self, id: NodeId) -> Option<&str> {
        XmlDocument::text_content(self, id)
    }

    fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        XmlDocument::get_attribute(self, node_id, name)
    }

    fn text(&self, id: NodeId) -> Option<Cow<'_, str>> {
        XmlDocument::text(self, id)
    }

    fn children_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    fn descendants_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id).collect()
    }
}

impl DocumentMut for XmlDocument {
    fn set_text(&mut self, id: NodeId, value: &str) -> Result<()> {
        XmlDocument::set_text(self, id, value)
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        XmlDocument::set_attribute(self, id, name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_named(doc: &XmlDocument, name: &str) -> NodeId {
        let root = doc.root_element_id().unwrap();
        std::iter::once(root)
            .chain(doc.descendants(root))
            .find(|&id| doc.node_local_name(id) == Some(name))
            .unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let doc = XmlDocument::parse(b"<root><item id=\"a\">hi</item></root>").unwrap();
        let root = doc.root_element_id().unwrap();
        assert_eq!(doc.node_name(root), Some("root"));
        let item = doc.element_children(root).next().unwrap();
        assert_eq!(doc.get_attribute(item, "id"), Some("a"));
        assert_eq!(doc.text(item).as_deref(), Some("hi"));
    }

    #[test]
    fn test_namespaces_resolved() {
        let xml = br#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:label="Layer 1" inkscape:groupmode="layer"/>
</svg>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let g = first_named(&doc, "g");
        assert_eq!(doc.namespace_uri(g), Some("http://www.w3.org/2000/svg"));
        assert_eq!(
            doc.get_attribute_ns(g, "http://www.inkscape.org/namespaces/inkscape", "label"),
            Some("Layer 1")
        );
        assert_eq!(doc.get_attribute(g, "inkscape:groupmode"), Some("layer"));
    }

    #[test]
    fn test_remove_blank_text() {
        let xml = b"<text>\n  <tspan>   </tspan>\n  <tspan>A</tspan> <tspan/>\n</text>";
        let doc = XmlDocument::parse(xml).unwrap();
        let text = doc.root_element_id().unwrap();
        // Indentation between elements is dropped
        assert_eq!(doc.children(text).count(), 3);
        assert!(doc.text(text).is_none());
        // Whitespace that is an element's only content is kept
        let spaced = doc.element_children(text).next().unwrap();
        assert_eq!(doc.text(spaced).as_deref(), Some("   "));
    }

    #[test]
    fn test_keep_blank_text_option() {
        let xml = b"<text>\n  <tspan>A</tspan>\n</text>";
        let options = ParseOptions {
            remove_blank_text: false,
            ..ParseOptions::default()
        };
        let doc = XmlDocument::parse_with(xml, &options).unwrap();
        let text = doc.root_element_id().unwrap();
        assert_eq!(doc.children(text).count(), 3);
        assert_eq!(doc.text(text).as_deref(), Some("\n  "));
    }

    #[test]
    fn test_text_is_leading_run_only() {
        let doc = XmlDocument::parse(b"<t>a<![CDATA[b]]><b/>tail</t>").unwrap();
        let t = doc.root_element_id().unwrap();
        assert_eq!(doc.text(t).as_deref(), Some("ab"));
        let b = first_named(&doc, "b");
        assert!(doc.text(b).is_none());
    }

    #[test]
    fn test_set_text_replaces_run() {
        let mut doc = XmlDocument::parse(b"<t>a<![CDATA[b]]><b/>tail</t>").unwrap();
        let t = doc.root_element_id().unwrap();
        doc.set_text(t, "17").unwrap();
        assert_eq!(doc.text(t).as_deref(), Some("17"));
        assert_eq!(doc.children(t).count(), 3);

        let b = first_named(&doc, "b");
        doc.set_text(b, "").unwrap();
        assert_eq!(doc.text(b).as_deref(), Some(""));
    }

    #[test]
    fn test_set_text_rejects_non_element() {
        let mut doc = XmlDocument::parse(b"<t>a</t>").unwrap();
        let t = doc.root_element_id().unwrap();
        let text_node = doc.children(t).next().unwrap();
        assert!(matches!(doc.set_text(text_node, "x"), Err(FormError::InvalidInput(_))));
        assert!(matches!(doc.set_text(999, "x"), Err(FormError::InvalidInput(_))));
    }

    #[test]
    fn test_set_attribute_relocates() {
        let mut doc = XmlDocument::parse(b"<svg width=\"210mm\"><g id=\"a\"/><g id=\"b\"/></svg>").unwrap();
        let svg = doc.root_element_id().unwrap();
        doc.set_attribute(svg, "width", "100mm").unwrap();
        doc.set_attribute(svg, "height", "297mm").unwrap();
        assert_eq!(doc.attribute_pairs(svg), vec![("width", "100mm"), ("height", "297mm")]);
        let groups: Vec<NodeId> = doc.element_children(svg).collect();
        assert_eq!(doc.get_attribute(groups[0], "id"), Some("a"));
        assert_eq!(doc.get_attribute(groups[1], "id"), Some("b"));
    }

    #[test]
    fn test_set_attribute_ns_declares_prefix() {
        let mut doc = XmlDocument::parse(b"<svg xmlns:sodipodi=\"urn:sodipodi\"><g/></svg>").unwrap();
        let svg = doc.root_element_id().unwrap();
        let g = first_named(&doc, "g");

        doc.set_attribute_ns(svg, "urn:sodipodi", "docname", "new.svg").unwrap();
        assert_eq!(doc.get_attribute(svg, "sodipodi:docname"), Some("new.svg"));

        doc.set_attribute_ns(g, "urn:other", "role", "line").unwrap();
        assert_eq!(doc.get_attribute(g, "xmlns:ns0"), Some("urn:other"));
        assert_eq!(doc.get_attribute_ns(g, "urn:other", "role"), Some("line"));
    }

    #[test]
    fn test_detach() {
        let mut doc = XmlDocument::parse(b"<svg><g id=\"a\"><text/></g><g id=\"b\"/></svg>").unwrap();
        let svg = doc.root_element_id().unwrap();
        let a = doc.element_children(svg).next().unwrap();
        let inner = doc.element_children(a).next().unwrap();
        doc.detach(a).unwrap();
        assert_eq!(doc.element_children(svg).count(), 1);
        assert!(!doc.is_attached(a));
        assert!(!doc.is_attached(inner));
        assert!(doc.detach(svg).is_err());
    }

    #[test]
    fn test_descendants_stay_in_subtree() {
        let doc = XmlDocument::parse(b"<r><a><b/><c/></a><d/></r>").unwrap();
        let r = doc.root_element_id().unwrap();
        let a = doc.element_children(r).next().unwrap();
        let names: Vec<&str> = doc.descendants(a).filter_map(|id| doc.node_name(id)).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_strict_errors() {
        let err = XmlDocument::parse_strict(b"<a><b></a>").unwrap_err();
        assert!(err.message.contains("Tag mismatch"));
        assert!(XmlDocument::parse_strict(b"<a/><b/>").is_err());
        assert!(XmlDocument::parse_strict(b"<a>").is_err());
        assert!(XmlDocument::parse_strict(b"<svg:a/>").is_err());
        assert!(XmlDocument::parse_strict(b"").is_err());
    }

    #[test]
    fn test_lenient_recovers() {
        let doc = XmlDocument::parse(b"<a><b></a><c/>").unwrap();
        let a = doc.root_element_id().unwrap();
        assert_eq!(doc.node_name(a), Some("a"));
        assert_eq!(doc.element_children(a).count(), 1);
    }

    #[test]
    fn test_bom_and_prolog() {
        let xml = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- made by hand -->\n<svg/>";
        let doc = XmlDocument::parse_strict(xml).unwrap();
        assert_eq!(doc.declaration().map(|d| d.version.as_str()), Some("1.0"));
        assert_eq!(doc.children(0).count(), 2);
    }
}
