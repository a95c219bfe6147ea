// ============================================================
// Layer 4 — Schema Normalizer
// ============================================================
// Maps heterogeneous raw input columns onto the canonical
// {target, text} schema that every downstream stage assumes.
//
// The rules are explicit rather than implicit:
//   - required columns: source name → canonical name; absence
//     of any required column is a hard SchemaError
//   - droppable columns: export junk that is silently dropped
//     when present and tolerated when missing
//
// The canonical SMS export layout this covers:
//   v1          → target   (class label)
//   v2          → text     (message body)
//   Unnamed: 2..4          (empty columns some exporters emit)
//
// Missing text cells become the empty string — the canonical
// invariant is that `text` is never null.

use std::io;

use crate::domain::dataset::CanonicalRecord;
use crate::domain::error::{PipelineError, Result};

/// Explicit column rules for normalizing a raw delimited file.
#[derive(Debug, Clone)]
pub struct SchemaRules {
    /// (source name, canonical name) — all of these must exist
    required: Vec<(String, String)>,

    /// Columns dropped if present, tolerated if missing
    droppable: Vec<String>,
}

impl Default for SchemaRules {
    /// Rules for the SMS spam export format.
    fn default() -> Self {
        Self {
            required: vec![
                ("v1".to_string(), "target".to_string()),
                ("v2".to_string(), "text".to_string()),
            ],
            droppable: vec![
                "Unnamed: 2".to_string(),
                "Unnamed: 3".to_string(),
                "Unnamed: 4".to_string(),
            ],
        }
    }
}

impl SchemaRules {
    pub fn new(required: Vec<(String, String)>, droppable: Vec<String>) -> Self {
        Self { required, droppable }
    }

    /// Read every row from `reader` and normalize it onto the
    /// canonical {target, text} schema.
    ///
    /// Column lookup is by header name, so column order and any
    /// extra columns in the source are irrelevant. Fails with
    /// SchemaError if a required source column is absent.
    pub fn normalize<R: io::Read>(&self, reader: &mut csv::Reader<R>) -> Result<Vec<CanonicalRecord>> {
        let headers = reader.headers()?.clone();

        // Resolve each required source column to its index up front
        let mut indices = Vec::with_capacity(self.required.len());
        for (source, canonical) in &self.required {
            let idx = headers
                .iter()
                .position(|h| h == source)
                .ok_or_else(|| PipelineError::Schema(source.clone()))?;
            indices.push((idx, canonical.clone()));
        }

        // Droppable columns are dropped by simply never reading them.
        // Log which ones the source actually carried.
        let present: Vec<&str> = self
            .droppable
            .iter()
            .map(String::as_str)
            .filter(|d| headers.iter().any(|h| &h == d))
            .collect();
        if !present.is_empty() {
            tracing::debug!("Dropping columns: {:?}", present);
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;

            let mut target = String::new();
            let mut text   = String::new();
            for (idx, canonical) in &indices {
                // A short row simply has no value for this column —
                // treated the same as an empty cell
                let value = row.get(*idx).unwrap_or("").to_string();
                match canonical.as_str() {
                    "target" => target = value,
                    _        => text = value,
                }
            }

            records.push(CanonicalRecord { target, text });
        }

        tracing::debug!("Normalized {} raw rows onto the canonical schema", records.len());
        Ok(records)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv_text: &str) -> Result<Vec<CanonicalRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv_text.as_bytes());
        SchemaRules::default().normalize(&mut reader)
    }

    #[test]
    fn test_renames_and_drops() {
        let rows = read("v1,v2,Unnamed: 2,Unnamed: 3\nham,hello there,,\nspam,win cash now,,\n")
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], CanonicalRecord::new("ham", "hello there"));
        assert_eq!(rows[1], CanonicalRecord::new("spam", "win cash now"));
    }

    #[test]
    fn test_missing_droppable_columns_are_tolerated() {
        let rows = read("v1,v2\nham,hello\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let err = read("v1,message\nham,hello\n").unwrap_err();
        match err {
            PipelineError::Schema(col) => assert_eq!(col, "v2"),
            other => panic!("expected SchemaError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_text_becomes_empty_string() {
        // Second row is short — no v2 cell at all
        let rows = read("v1,v2\nham,hello\nspam\n").unwrap();
        assert_eq!(rows[1].text, "");
        assert_eq!(rows[1].target, "spam");
    }

    #[test]
    fn test_extra_unknown_columns_are_ignored() {
        let rows = read("id,v1,v2\n7,ham,hello\n").unwrap();
        assert_eq!(rows[0], CanonicalRecord::new("ham", "hello"));
    }
}
