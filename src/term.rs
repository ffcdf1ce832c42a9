//! Elixir Term Conversion Utilities
//!
//! Converts canvas elements, groups and metadata to Elixir terms.

use crate::canvas::{CanvasInfo, Group, Resolution};
use crate::dom::{NodeId, NodeKind, XmlDocument};
use crate::error::FormError;
use rustler::{Encoder, Env, NewBinary, NifMap, NifUnitEnum, Term};

rustler::atoms! {
    ok,
    error,
    element,
    comment,
    pi,
}

/// `%{units: ..., width: ..., ...}` for `info/1`
#[derive(NifMap)]
pub struct InfoTerm {
    pub units: String,
    pub width: f64,
    pub height: f64,
    pub view_box: Option<(f64, f64, f64, f64)>,
    pub scale: f64,
    pub version: Option<String>,
    pub inkscape_version: Option<String>,
    pub docname: Option<String>,
}

impl From<CanvasInfo> for InfoTerm {
    fn from(info: CanvasInfo) -> Self {
        InfoTerm {
            units: info.units,
            width: info.width,
            height: info.height,
            view_box: info.view_box.map(|vb| (vb.x, vb.y, vb.width, vb.height)),
            scale: info.scale,
            version: info.version,
            inkscape_version: info.inkscape_version,
            docname: info.docname,
        }
    }
}

/// `%{node: ..., parent: ..., id: ..., label: ...}` group handle
#[derive(NifMap)]
pub struct GroupTerm {
    pub node: NodeId,
    pub parent: Option<NodeId>,
    pub id: Option<String>,
    pub label: Option<String>,
}

impl From<Group> for GroupTerm {
    fn from(group: Group) -> Self {
        GroupTerm {
            node: group.node,
            parent: group.parent,
            id: group.id,
            label: group.label,
        }
    }
}

/// `:exact` / `:speculative`
#[derive(NifUnitEnum)]
pub enum ResolutionTerm {
    Exact,
    Speculative,
}

impl From<Resolution> for ResolutionTerm {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Exact => ResolutionTerm::Exact,
            Resolution::Speculative => ResolutionTerm::Speculative,
        }
    }
}

/// `{:error, message}`
pub fn error_to_term<'a>(env: Env<'a>, err: &FormError) -> Term<'a> {
    (error(), err.to_string()).encode(env)
}

/// Convert a node to an Elixir term
///
/// Elements become `{:element, name, attrs, children}`, text and CDATA
/// become binaries, comments `{:comment, text}` and PIs `{:pi, target}`.
pub fn node_to_term<'a>(env: Env<'a>, doc: &XmlDocument, node_id: NodeId) -> Term<'a> {
    let node = match doc.get_node(node_id) {
        Some(n) => n,
        None => return rustler::types::atom::nil().encode(env),
    };

    match node.kind {
        NodeKind::Element => {
            let name_term = str_to_binary(env, doc.node_name(node_id).unwrap_or(""));

            let mut attrs = Term::list_new_empty(env);
            for (name, value) in doc.attribute_pairs(node_id).into_iter().rev() {
                attrs = attrs.list_prepend((str_to_binary(env, name), str_to_binary(env, value)).encode(env));
            }

            // Build children directly by traversing last_child->prev_sibling chain
            let mut children = Term::list_new_empty(env);
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                children = children.list_prepend(node_to_term(env, doc, cid));
                child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
            }

            (element(), name_term, attrs, children).encode(env)
        }
        NodeKind::Text | NodeKind::CData => str_to_binary(env, doc.text_content(node_id).unwrap_or("")),
        NodeKind::Comment => (comment(), str_to_binary(env, doc.text_content(node_id).unwrap_or(""))).encode(env),
        NodeKind::ProcessingInstruction => (pi(), str_to_binary(env, doc.node_name(node_id).unwrap_or(""))).encode(env),
        NodeKind::Document => match doc.root_element_id() {
            Some(root_id) => node_to_term(env, doc, root_id),
            None => rustler::types::atom::nil().encode(env),
        },
    }
}

/// List of element terms, in order
pub fn nodes_to_term<'a>(env: Env<'a>, doc: &XmlDocument, nodes: &[NodeId]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for &id in nodes.iter().rev() {
        list = list.list_prepend(node_to_term(env, doc, id));
    }
    list
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
