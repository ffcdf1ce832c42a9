//! Parallel form filling
//!
//! Uses Rayon to fill one template with many records, or to read many
//! fields of one canvas at once.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::field::PresencePolicy;
use rayon::prelude::*;

/// One filled copy of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledDocument {
    pub xml: String,
    /// Ids of the record that the template does not contain
    pub missing: Vec<String>,
}

/// Fill a copy of `template` per record, in parallel.
///
/// Results come back in record order; a failing record does not stop the
/// others.
pub fn fill_batch<R>(template: &Canvas, records: &[R], policy: PresencePolicy) -> Vec<Result<FilledDocument>>
where
    R: AsRef<[(String, String)]> + Sync,
{
    records
        .par_iter()
        .map(|record| {
            let mut canvas = template.clone();
            let fields = record.as_ref().iter().map(|(id, value)| (id.as_str(), value.as_str()));
            let missing = canvas.set_fields(fields, policy)?;
            Ok(FilledDocument {
                xml: canvas.to_xml(),
                missing,
            })
        })
        .collect()
}

/// Read several fields in parallel
pub fn read_fields<S: AsRef<str> + Sync>(canvas: &Canvas, ids: &[S]) -> Vec<Result<Option<String>>> {
    ids.par_iter().map(|id| canvas.get_field(id.as_ref())).collect()
}
