//! Batch Strategies
//!
//! - parallel: many records into one template, many field reads at once

pub mod parallel;

pub use parallel::{fill_batch, read_fields, FilledDocument};
