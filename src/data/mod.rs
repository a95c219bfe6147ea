// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw CSV file and the numeric feature
// stage lives here.
//
// The data flows in this order:
//
//   raw CSV (v1/v2 columns)
//       │
//       ▼
//   SchemaRules       → renames to {target, text}, drops junk columns
//       │
//       ▼
//   stratified_split  → seeded, label-stratified train/test partition
//       │
//       ▼
//   dedup_records     → removes exact duplicates per split
//       │
//       ▼
//   LabelEncoder      → string labels → dense integer ids (fit on train)
//       │
//       ▼
//   TextNormalizer    → lowercase, tokenize, filter, stem
//
// Each module is responsible for exactly one step. This makes
// each step independently testable and replaceable.

/// Raw column renaming/dropping onto the canonical schema
pub mod schema;

/// Seeded, stratified train/test splitting
pub mod splitter;

/// Pure text normalization (case folding, stopwords, stemming)
pub mod preprocessor;

/// Per-split deduplication and label encoding
pub mod encoder;
