//! Merge heterogeneous source collections into one row per entity.

use crate::types::{EntityKey, RawRecord, UnifiedRow};
use log::{debug, warn};
use std::collections::HashMap;

/// One input collection and the field that identifies its entities
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    /// Name used in diagnostics ("exams", "quiz stats", ...)
    pub label: &'a str,
    pub key_field: &'a str,
    pub records: &'a [RawRecord],
}

/// Result of a merge: rows in first-seen key order plus the skip count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub rows: Vec<UnifiedRow>,
    /// Records dropped because they had no usable key
    pub skipped: usize,
}

/// Merge `sources` by key.
///
/// Sources are applied in the order given: a later record overwrites the
/// fields it carries and leaves the others untouched. Records without a
/// usable key are skipped and counted.
pub fn normalize(sources: &[Source<'_>]) -> Normalized {
    let mut rows: Vec<UnifiedRow> = Vec::new();
    let mut index: HashMap<EntityKey, usize> = HashMap::new();
    let mut skipped = 0;

    for source in sources {
        let mut source_skipped = 0;

        for record in source.records {
            let Some(key) = record.get(source.key_field).and_then(EntityKey::from_value) else {
                source_skipped += 1;
                continue;
            };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                rows.push(UnifiedRow::new(key));
                rows.len() - 1
            });
            rows[slot].merge(record);
        }

        if source_skipped > 0 {
            warn!(
                "Skipped {} of {} {} records without a '{}' key",
                source_skipped,
                source.records.len(),
                source.label,
                source.key_field
            );
        }
        debug!("Merged {} {} records ({} entities so far)", source.records.len(), source.label, rows.len());
        skipped += source_skipped;
    }

    Normalized { rows, skipped }
}
