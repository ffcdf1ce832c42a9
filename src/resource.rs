//! ResourceArc Wrappers
//!
//! Persistent canvas state shared with the BEAM.

use crate::canvas::Canvas;
use rustler::ResourceArc;
use std::sync::Mutex;

/// Wrapper for Canvas that can be stored in a ResourceArc
/// Stores the parsed document so fields are filled without re-parsing.
pub struct CanvasResource {
    pub canvas: Mutex<Option<Canvas>>,
}

impl CanvasResource {
    pub fn new(canvas: Canvas) -> Self {
        CanvasResource {
            canvas: Mutex::new(Some(canvas)),
        }
    }

    /// Run `f` against the canvas.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if the canvas mutex is poisoned,
    /// or `"no_document"` if no canvas is present.
    pub fn with_canvas<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&Canvas) -> R,
    {
        let guard = self.canvas.lock().map_err(|_| "mutex_poisoned")?;
        let canvas = guard.as_ref().ok_or("no_document")?;
        Ok(f(canvas))
    }

    /// Like [`with_canvas`](Self::with_canvas), for edits
    pub fn with_canvas_mut<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&mut Canvas) -> R,
    {
        let mut guard = self.canvas.lock().map_err(|_| "mutex_poisoned")?;
        let canvas = guard.as_mut().ok_or("no_document")?;
        Ok(f(canvas))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for CanvasResource {}

/// Type alias for canvas ResourceArc
pub type CanvasRef = ResourceArc<CanvasResource>;
