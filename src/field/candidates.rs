//! Candidate-set reduction for elements sharing an identifier
//!
//! Inkscape can leave several transformed copies of one text box in a file.
//! Only copies that carry text are "in use"; when writing, the chosen copy
//! gets the value and every other copy is cleared.

use super::has_text;
use crate::dom::{DocumentAccess, DocumentMut, NodeId};
use crate::error::{FormError, Result};
use tracing::warn;

/// How [`pick_one`] arrived at its element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Exactly one candidate was usable (or there was only one)
    Sole,
    /// This many candidates had text; the first was taken
    FirstOfMany(usize),
    /// No candidate had text; the first was taken anyway
    AllBlank,
}

/// Selected element plus the reason it was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    pub node: NodeId,
    pub outcome: PickOutcome,
}

impl Pick {
    /// Whether other usable candidates were passed over
    pub fn is_ambiguous(&self) -> bool {
        matches!(self.outcome, PickOutcome::FirstOfMany(_))
    }
}

fn check_elements<D: DocumentAccess>(doc: &D, elements: &[NodeId]) -> Result<()> {
    match elements.iter().find(|&&id| !doc.is_element(id)) {
        Some(&bad) => Err(FormError::invalid_node("candidate list", bad)),
        None => Ok(()),
    }
}

/// Keep the elements that have text anywhere below them, in input order
pub fn reduce_candidates<D: DocumentAccess>(doc: &D, elements: &[NodeId], spacing: bool) -> Result<Vec<NodeId>> {
    check_elements(doc, elements)?;
    Ok(elements
        .iter()
        .copied()
        .filter(|&id| has_text(doc, id, spacing, true))
        .collect())
}

/// Choose one element out of `elements`.
///
/// A single element is taken as-is when `fallback` is set. Otherwise the
/// usable ones are taken from [`reduce_candidates`]: none gives the first
/// original when `fallback` is set (else `None`), several give the first of
/// them.
pub fn pick_one<D: DocumentAccess>(doc: &D, elements: &[NodeId], spacing: bool, fallback: bool) -> Result<Option<Pick>> {
    if fallback && elements.len() == 1 {
        check_elements(doc, elements)?;
        return Ok(Some(Pick {
            node: elements[0],
            outcome: PickOutcome::Sole,
        }));
    }

    let used = reduce_candidates(doc, elements, spacing)?;
    let pick = match used.as_slice() {
        [] => {
            if !fallback {
                return Ok(None);
            }
            let Some(&first) = elements.first() else {
                return Ok(None);
            };
            warn!(candidates = ?elements, "all blank, returning first candidate");
            Pick {
                node: first,
                outcome: PickOutcome::AllBlank,
            }
        }
        [only] => Pick {
            node: *only,
            outcome: PickOutcome::Sole,
        },
        [first, ..] => {
            warn!(used = ?used, "multiple non-blank candidates, returning first");
            Pick {
                node: *first,
                outcome: PickOutcome::FirstOfMany(used.len()),
            }
        }
    };
    Ok(Some(pick))
}

/// Set `value` on `selected` and clear every other candidate
pub fn write_candidates<D: DocumentMut>(doc: &mut D, candidates: &[NodeId], selected: NodeId, value: &str) -> Result<()> {
    check_elements(doc, candidates)?;
    if !doc.is_element(selected) {
        return Err(FormError::invalid_node("selected candidate", selected));
    }
    for &id in candidates {
        if id != selected {
            doc.set_text(id, "")?;
        }
    }
    doc.set_text(selected, value)
}
