// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers into the five pipeline stages.
//
// Rules for this layer:
//   - No ML math or text processing here
//   - No CSV/JSON handling here (that's Layer 6)
//   - Only workflow coordination: load the previous stage's
//     artifact, call the stage logic, persist the result
//
// Control flow is strictly linear. Every stage is also an entry
// point of its own, so a failed run can be resumed by fixing
// the cause and re-running the failed stage.

// The five pipeline stages and the full run
pub mod pipeline_use_case;
