//! Inkform - fill and query text fields in Inkscape SVG drawings
//!
//! Layers:
//! A: Tokenizer and event reader (core, reader)
//! B: Arena DOM with serializer (dom)
//! C: Field resolution: text presence, leaf search, candidate reduction (field)
//! D: Fixed element queries and the Canvas API (query, canvas)
//! E: Parallel batch filling (strategy)

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod canvas;
pub mod core;
pub mod dom;
pub mod error;
pub mod field;
pub mod query;
pub mod reader;
mod resource;
pub mod strategy;
mod term;
#[cfg(test)]
mod testdata;

pub use canvas::Canvas;
pub use error::{FormError, ParseError, Result};
pub use field::PresencePolicy;

use dom::ParseOptions;
use resource::{CanvasRef, CanvasResource};
use term::{error_to_term, node_to_term, nodes_to_term, str_to_binary, GroupTerm, InfoTerm, ResolutionTerm};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Helpers
// ============================================================================

fn resource_error<'a>(env: Env<'a>, reason: &'static str) -> Term<'a> {
    (term::error(), reason).encode(env)
}

fn canvas_result<'a>(env: Env<'a>, result: Result<Canvas>) -> Term<'a> {
    match result {
        Ok(canvas) => (term::ok(), ResourceArc::new(CanvasResource::new(canvas))).encode(env),
        Err(e) => error_to_term(env, &e),
    }
}

fn leaf_policy(skip_empty: bool, spacing: bool) -> PresencePolicy {
    PresencePolicy::new(skip_empty, spacing)
}

// ============================================================================
// Loading and Output
// ============================================================================

/// Parse an SVG document (returns {:ok, canvas} or {:error, reason})
/// Lenient mode - accepts malformed XML
#[rustler::nif]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(canvas_result(env, Canvas::parse(input.as_slice())))
}

/// Parse in strict mode (returns {:ok, canvas} or {:error, reason})
#[rustler::nif]
fn parse_strict<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(canvas_result(env, Canvas::parse_with(input.as_slice(), &ParseOptions::strict())))
}

/// New canvas from the built-in A4 template
#[rustler::nif]
fn blank<'a>(env: Env<'a>) -> NifResult<Term<'a>> {
    Ok(canvas_result(env, Canvas::blank()))
}

/// Label the canvas (usually its file path) for error messages
#[rustler::nif]
fn set_source<'a>(env: Env<'a>, canvas: CanvasRef, source: String) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas_mut(|c| c.set_source(source));
    Ok(match result {
        Ok(()) => term::ok().encode(env),
        Err(reason) => resource_error(env, reason),
    })
}

/// Serialize the canvas back to SVG
#[rustler::nif]
fn to_xml<'a>(env: Env<'a>, canvas: CanvasRef) -> NifResult<Term<'a>> {
    Ok(match canvas.with_canvas(|c| c.to_xml()) {
        Ok(xml) => str_to_binary(env, &xml),
        Err(reason) => resource_error(env, reason),
    })
}

/// Release the document before the resource is garbage collected
#[rustler::nif]
fn close(canvas: CanvasRef) -> bool {
    match canvas.canvas.lock() {
        Ok(mut guard) => guard.take().is_some(),
        Err(_) => false,
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Page size, units and authoring metadata as a map
#[rustler::nif]
fn info<'a>(env: Env<'a>, canvas: CanvasRef) -> NifResult<Term<'a>> {
    Ok(match canvas.with_canvas(|c| InfoTerm::from(c.info())) {
        Ok(info) => info.encode(env),
        Err(reason) => resource_error(env, reason),
    })
}

#[rustler::nif]
fn set_docname<'a>(env: Env<'a>, canvas: CanvasRef, name: &str) -> NifResult<Term<'a>> {
    Ok(match canvas.with_canvas_mut(|c| c.set_docname(name)) {
        Ok(Ok(())) => term::ok().encode(env),
        Ok(Err(e)) => error_to_term(env, &e),
        Err(reason) => resource_error(env, reason),
    })
}

// ============================================================================
// Fields
// ============================================================================

/// Text of a field, nil when the id does not exist
#[rustler::nif]
fn get_field<'a>(env: Env<'a>, canvas: CanvasRef, id: &str) -> NifResult<Term<'a>> {
    Ok(match canvas.with_canvas(|c| c.get_field(id)) {
        Ok(Ok(Some(value))) => str_to_binary(env, &value),
        Ok(Ok(None)) => rustler::types::atom::nil().encode(env),
        Ok(Err(e)) => error_to_term(env, &e),
        Err(reason) => resource_error(env, reason),
    })
}

/// Fill one field (returns {:ok, found?} or {:error, reason})
#[rustler::nif]
fn set_field<'a>(
    env: Env<'a>,
    canvas: CanvasRef,
    id: &str,
    value: &str,
    skip_empty: bool,
    spacing: bool,
) -> NifResult<Term<'a>> {
    Ok(match canvas.with_canvas_mut(|c| c.set_field(id, value, leaf_policy(skip_empty, spacing))) {
        Ok(Ok(found)) => (term::ok(), found).encode(env),
        Ok(Err(e)) => error_to_term(env, &e),
        Err(reason) => resource_error(env, reason),
    })
}

/// Fill many fields (returns {:ok, missing_ids} or {:error, reason})
#[rustler::nif]
fn set_fields<'a>(
    env: Env<'a>,
    canvas: CanvasRef,
    fields: Vec<(String, String)>,
    skip_empty: bool,
    spacing: bool,
) -> NifResult<Term<'a>> {
    Ok(match canvas.with_canvas_mut(|c| c.set_fields(fields, leaf_policy(skip_empty, spacing))) {
        Ok(Ok(missing)) => (term::ok(), missing).encode(env),
        Ok(Err(e)) => error_to_term(env, &e),
        Err(reason) => resource_error(env, reason),
    })
}

/// Read many fields in parallel; nil for ids that do not exist
#[rustler::nif(schedule = "DirtyCpu")]
fn get_fields<'a>(env: Env<'a>, canvas: CanvasRef, ids: Vec<String>) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| {
        let values = strategy::read_fields(c, &ids);
        let mut list = Term::list_new_empty(env);
        for value in values.into_iter().rev() {
            let term = match value {
                Ok(Some(text)) => str_to_binary(env, &text),
                Ok(None) => rustler::types::atom::nil().encode(env),
                Err(e) => error_to_term(env, &e),
            };
            list = list.list_prepend(term);
        }
        list
    });
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

/// Fill one template per record in parallel
/// Returns a list of {:ok, xml, missing_ids} / {:error, reason}, one per record
#[rustler::nif(schedule = "DirtyCpu")]
fn fill_batch<'a>(
    env: Env<'a>,
    template: CanvasRef,
    records: Vec<Vec<(String, String)>>,
    skip_empty: bool,
    spacing: bool,
) -> NifResult<Term<'a>> {
    let result = template.with_canvas(|c| {
        let filled = strategy::fill_batch(c, &records, leaf_policy(skip_empty, spacing));
        let mut list = Term::list_new_empty(env);
        for doc in filled.into_iter().rev() {
            let term = match doc {
                Ok(doc) => (term::ok(), str_to_binary(env, &doc.xml), doc.missing).encode(env),
                Err(e) => error_to_term(env, &e),
            };
            list = list.list_prepend(term);
        }
        list
    });
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

// ============================================================================
// Lookups
// ============================================================================

/// Leaf element of the container `id` (an element term, nil, or {:error, reason})
///
/// `assert_in` names the document in the error raised for a missing id.
#[rustler::nif]
fn get_leaf_by_id<'a>(
    env: Env<'a>,
    canvas: CanvasRef,
    tag: &str,
    id: &str,
    skip_empty: bool,
    spacing: bool,
    assert_in: Option<String>,
) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| {
        match c.leaf_by_id(tag, id, leaf_policy(skip_empty, spacing), assert_in.as_deref()) {
            Ok(Some(leaf)) => node_to_term(env, c.document(), leaf),
            Ok(None) => rustler::types::atom::nil().encode(env),
            Err(e) => error_to_term(env, &e),
        }
    });
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

/// {:exact | :speculative, leaves} or nil
#[rustler::nif]
fn leaves_by_id<'a>(
    env: Env<'a>,
    canvas: CanvasRef,
    id: &str,
    tag: &str,
    leaf_tag: &str,
    skip_empty: bool,
    spacing: bool,
) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| {
        match c.leaves_by_id(id, tag, leaf_tag, leaf_policy(skip_empty, spacing)) {
            Ok(Some(leaves)) => (
                ResolutionTerm::from(leaves.resolution),
                nodes_to_term(env, c.document(), &leaves.nodes),
            )
                .encode(env),
            Ok(None) => rustler::types::atom::nil().encode(env),
            Err(e) => error_to_term(env, &e),
        }
    });
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

/// flowPara elements of a flowRoot (or tspans of a text) with this id
#[rustler::nif]
fn flow_text<'a>(env: Env<'a>, canvas: CanvasRef, id: &str) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| nodes_to_term(env, c.document(), &c.flow_text(id)));
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

// ============================================================================
// Groups and Layers
// ============================================================================

fn groups_to_term<'a>(env: Env<'a>, groups: Vec<canvas::Group>) -> Term<'a> {
    groups.into_iter().map(GroupTerm::from).collect::<Vec<_>>().encode(env)
}

#[rustler::nif]
fn layers<'a>(env: Env<'a>, canvas: CanvasRef) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| groups_to_term(env, c.layers()));
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

#[rustler::nif]
fn groups<'a>(env: Env<'a>, canvas: CanvasRef, layer_only: bool) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| groups_to_term(env, c.groups(layer_only)));
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

/// Find a group by label (or id, for unlabelled groups)
#[rustler::nif]
fn group<'a>(env: Env<'a>, canvas: CanvasRef, name: &str, layer_only: bool) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas(|c| match c.group(name, layer_only) {
        Some(group) => GroupTerm::from(group).encode(env),
        None => rustler::types::atom::nil().encode(env),
    });
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

/// Remove the group with this id (:ok, {:error, :not_found} or {:error, reason})
#[rustler::nif]
fn delete_group<'a>(env: Env<'a>, canvas: CanvasRef, id: &str) -> NifResult<Term<'a>> {
    let result = canvas.with_canvas_mut(|c| match c.group_by_id(id, false) {
        Some(group) => match c.delete_group(&group) {
            Ok(()) => term::ok().encode(env),
            Err(e) => error_to_term(env, &e),
        },
        None => resource_error(env, "not_found"),
    });
    Ok(result.unwrap_or_else(|reason| resource_error(env, reason)))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.Inkform.Native");
