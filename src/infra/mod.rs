// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by every stage:
//
//   params.rs    — params.yaml loading. Returns the typed
//                  parameter tree with documented defaults for
//                  anything the file leaves out.
//
//   workspace.rs — The artifact store. Owns the fixed directory
//                  layout (data/raw, data/interim,
//                  data/processed, models, reports) under one
//                  root and does all CSV / model-blob / JSON
//                  reading and writing.
//
// No stage opens a file directly; everything goes through the
// workspace so the persistence contract lives in one place.

/// params.yaml loading with per-field defaults
pub mod params;

/// Artifact directory layout and load/save routines
pub mod workspace;
