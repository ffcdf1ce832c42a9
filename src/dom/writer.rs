//! XML serialization for [`XmlDocument`]
//!
//! Output keeps the document as loaded: attribute order, namespace prefixes,
//! comments and processing instructions. No indentation is added, since
//! Inkscape treats whitespace inside `<text>` as content.

use super::document::XmlDocument;
use super::node::{NodeId, NodeKind};
use crate::core::entities::{escape_attr_to_buf, escape_text_to_buf};

impl XmlDocument {
    /// Serialize the whole document: declaration, DOCTYPE, then the
    /// top-level nodes separated by newlines
    pub fn to_xml(&self) -> String {
        let mut buf = String::with_capacity(self.node_count() * 32);

        if let Some(decl) = self.declaration() {
            buf.push_str("<?xml version=\"");
            escape_attr_to_buf(&decl.version, &mut buf);
            buf.push('"');
            if let Some(encoding) = &decl.encoding {
                buf.push_str(" encoding=\"");
                escape_attr_to_buf(encoding, &mut buf);
                buf.push('"');
            }
            if let Some(standalone) = decl.standalone {
                buf.push_str(if standalone { " standalone=\"yes\"" } else { " standalone=\"no\"" });
            }
            buf.push_str("?>\n");
        }

        if let Some(doctype) = self.doctype() {
            buf.push_str(doctype);
            buf.push('\n');
        }

        for (i, child) in self.children(0).enumerate() {
            if i > 0 {
                buf.push('\n');
            }
            self.write_node(child, &mut buf);
        }

        buf
    }

    /// Serialize one node and its subtree
    pub fn node_to_xml(&self, id: NodeId) -> String {
        let mut buf = String::with_capacity(256);
        self.write_node(id, &mut buf);
        buf
    }

    fn write_node(&self, node_id: NodeId, buf: &mut String) {
        // Stack entries: Either entering a node or need to write closing tag
        enum StackEntry {
            Enter(NodeId),
            Close(NodeId),
        }

        let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
        stack.push(StackEntry::Enter(node_id));

        while let Some(entry) = stack.pop() {
            match entry {
                StackEntry::Close(id) => {
                    buf.push_str("</");
                    buf.push_str(self.node_name(id).unwrap_or_default());
                    buf.push('>');
                }
                StackEntry::Enter(current_id) => {
                    let Some(node) = self.get_node(current_id) else {
                        continue;
                    };

                    match node.kind {
                        NodeKind::Element => {
                            buf.push('<');
                            buf.push_str(self.node_name(current_id).unwrap_or_default());
                            for (name, value) in self.attribute_pairs(current_id) {
                                buf.push(' ');
                                buf.push_str(name);
                                buf.push_str("=\"");
                                escape_attr_to_buf(value, buf);
                                buf.push('"');
                            }

                            if node.first_child.is_none() {
                                buf.push_str("/>");
                            } else {
                                buf.push('>');
                                stack.push(StackEntry::Close(current_id));

                                // Children in reverse so the first is written first
                                let mut child_id = node.last_child;
                                while let Some(cid) = child_id {
                                    stack.push(StackEntry::Enter(cid));
                                    child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
                                }
                            }
                        }
                        NodeKind::Text => {
                            escape_text_to_buf(self.text_content(current_id).unwrap_or_default(), buf);
                        }
                        NodeKind::CData => {
                            buf.push_str("<![CDATA[");
                            buf.push_str(self.text_content(current_id).unwrap_or_default());
                            buf.push_str("]]>");
                        }
                        NodeKind::Comment => {
                            buf.push_str("<!--");
                            buf.push_str(self.text_content(current_id).unwrap_or_default());
                            buf.push_str("-->");
                        }
                        NodeKind::ProcessingInstruction => {
                            buf.push_str("<?");
                            buf.push_str(self.node_name(current_id).unwrap_or_default());
                            if let Some(data) = self.pi_data(current_id) {
                                buf.push(' ');
                                buf.push_str(data);
                            }
                            buf.push_str("?>");
                        }
                        NodeKind::Document => {
                            let mut child_id = node.last_child;
                            while let Some(cid) = child_id {
                                stack.push(StackEntry::Enter(cid));
                                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_structure() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n<!-- Created with Inkscape -->\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"210mm\"><g id=\"layer1\"><text id=\"t\"><tspan>A &amp; B</tspan></text></g></svg>";
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.to_xml(), xml);
    }

    #[test]
    fn test_empty_text_writes_open_and_close() {
        let mut doc = XmlDocument::parse(b"<text><tspan/><tspan>B</tspan></text>").unwrap();
        let root = doc.root_element_id().unwrap();
        let tspans: Vec<NodeId> = doc.element_children(root).collect();
        doc.set_text(tspans[0], "17").unwrap();
        doc.set_text(tspans[1], "").unwrap();
        assert_eq!(doc.to_xml(), "<text><tspan>17</tspan><tspan></tspan></text>");
    }

    #[test]
    fn test_escaping() {
        let mut doc = XmlDocument::parse(b"<t a=\"1\"/>").unwrap();
        let t = doc.root_element_id().unwrap();
        doc.set_attribute(t, "a", "x\"<y>\n").unwrap();
        doc.set_text(t, "1 < 2 & 3").unwrap();
        assert_eq!(doc.to_xml(), "<t a=\"x&quot;&lt;y&gt;&#10;\">1 &lt; 2 &amp; 3</t>");
    }

    #[test]
    fn test_doctype_cdata_and_pi() {
        let xml = "<!DOCTYPE svg>\n<?xml-stylesheet href=\"a.css\"?>\n<svg><style><![CDATA[a>b]]></style></svg>";
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.to_xml(), xml);
    }

    #[test]
    fn test_node_to_xml() {
        let doc = XmlDocument::parse(b"<svg><g id=\"a\"><rect/></g></svg>").unwrap();
        let svg = doc.root_element_id().unwrap();
        let g = doc.element_children(svg).next().unwrap();
        assert_eq!(doc.node_to_xml(g), "<g id=\"a\"><rect/></g>");
    }
}
