// ============================================================
// Layer 4 — Feature Engineering
// ============================================================
// Turns normalized token strings into fixed-width numeric
// vectors. The vocabulary and term statistics are fit on the
// training split only and then frozen — the test split is
// projected into the identical column space and contributes no
// new terms.

/// TF-IDF vectorizer: train-only fit, frozen projection
pub mod tfidf;
