// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Partitions the canonical dataset into disjoint train and test
// sets, preserving the per-class label proportions on both
// sides (a stratified split).
//
// Reproducibility contract: the RNG is a ChaCha8 stream keyed
// by the caller's seed — same input + same seed gives the exact
// same partition on every run and every platform. No ambient
// randomness (thread_rng etc.) is allowed in pipeline code.
//
// Per class:   shuffle its row indices, then carve off
//              round(class_len * test_fraction) rows for test.
// Globally:    the largest class absorbs any rounding drift so
//              the total test size is round(n * test_fraction).
//
// Infeasible requests — a class that would end up with zero
// rows on either side — fail with SplitError before any rows
// are moved.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::dataset::CanonicalRecord;
use crate::domain::error::{PipelineError, Result};

/// Split `records` into (train, test) stratified by `target`.
///
/// `test_fraction` is the share of rows that goes to the test
/// side, e.g. 0.2 for an 80/20 split.
pub fn stratified_split(
    records: Vec<CanonicalRecord>,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<CanonicalRecord>, Vec<CanonicalRecord>)> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset("nothing to split".to_string()));
    }
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(PipelineError::Split(format!(
            "test fraction {test_fraction} is outside (0, 1)"
        )));
    }

    // Group row indices by label. BTreeMap keeps class iteration
    // order deterministic regardless of row order.
    let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        by_class.entry(record.target.as_str()).or_default().push(i);
    }

    // Feasibility check before any shuffling happens
    let mut allocations: Vec<(&str, usize)> = Vec::with_capacity(by_class.len());
    for (label, indices) in &by_class {
        let n_test = ((indices.len() as f64) * test_fraction).round() as usize;
        if n_test == 0 || n_test >= indices.len() {
            return Err(PipelineError::Split(format!(
                "class '{}' has {} samples; test fraction {} leaves one side empty",
                label,
                indices.len(),
                test_fraction
            )));
        }
        allocations.push((label, n_test));
    }

    // Absorb rounding drift in the largest class so the overall
    // test size is round(n * test_fraction)
    let total_test = ((records.len() as f64) * test_fraction).round() as usize;
    let allocated: usize = allocations.iter().map(|(_, n)| n).sum();
    if allocated != total_test {
        let diff = total_test as i64 - allocated as i64;
        let (label, n_test) = allocations
            .iter_mut()
            .max_by_key(|(label, _)| by_class[*label].len())
            .expect("at least one class present");
        let class_len = by_class[*label].len();
        let adjusted  = (*n_test as i64 + diff).clamp(1, class_len as i64 - 1) as usize;
        *n_test = adjusted;
    }

    // One RNG stream for the whole split, consumed class by class
    // in deterministic (sorted-label) order
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut train_idx = Vec::new();
    let mut test_idx  = Vec::new();
    for (label, n_test) in &allocations {
        let mut indices = by_class[*label].clone();
        indices.shuffle(&mut rng);

        test_idx.extend_from_slice(&indices[..*n_test]);
        train_idx.extend_from_slice(&indices[*n_test..]);
    }

    // Shuffle each side once more so the persisted artifacts are
    // not grouped by class
    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    tracing::debug!(
        "Split {} rows into {} train / {} test (stratified, seed {})",
        records.len(),
        train_idx.len(),
        test_idx.len(),
        seed
    );

    let train = train_idx.iter().map(|&i| records[i].clone()).collect();
    let test  = test_idx.iter().map(|&i| records[i].clone()).collect();
    Ok((train, test))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// 80 "ham" rows and 20 "spam" rows, all texts unique.
    fn sample_records() -> Vec<CanonicalRecord> {
        let mut records = Vec::new();
        for i in 0..80 {
            records.push(CanonicalRecord::new("ham", format!("ham message {i}")));
        }
        for i in 0..20 {
            records.push(CanonicalRecord::new("spam", format!("spam message {i}")));
        }
        records
    }

    fn count_label(records: &[CanonicalRecord], label: &str) -> usize {
        records.iter().filter(|r| r.target == label).count()
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = stratified_split(sample_records(), 0.2, 2).unwrap();
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);
    }

    #[test]
    fn test_class_proportions_preserved() {
        let (train, test) = stratified_split(sample_records(), 0.2, 2).unwrap();
        assert_eq!(count_label(&train, "ham"), 64);
        assert_eq!(count_label(&train, "spam"), 16);
        assert_eq!(count_label(&test, "ham"), 16);
        assert_eq!(count_label(&test, "spam"), 4);
    }

    #[test]
    fn test_same_seed_same_partition() {
        let (train_a, test_a) = stratified_split(sample_records(), 0.2, 7).unwrap();
        let (train_b, test_b) = stratified_split(sample_records(), 0.2, 7).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn test_different_seed_different_partition() {
        let (_, test_a) = stratified_split(sample_records(), 0.2, 1).unwrap();
        let (_, test_b) = stratified_split(sample_records(), 0.2, 2).unwrap();
        assert_ne!(test_a, test_b);
    }

    #[test]
    fn test_disjoint_and_union_recovers_input() {
        let records = sample_records();
        let original: HashSet<_> = records.iter().cloned().collect();

        let (train, test) = stratified_split(records, 0.2, 2).unwrap();

        let train_set: HashSet<_> = train.iter().cloned().collect();
        let test_set: HashSet<_>  = test.iter().cloned().collect();
        assert!(train_set.is_disjoint(&test_set));

        let union: HashSet<_> = train_set.union(&test_set).cloned().collect();
        assert_eq!(union, original);
    }

    #[test]
    fn test_infeasible_split_fails() {
        // 2 spam rows * 0.2 rounds to 0 test samples for that class
        let mut records = Vec::new();
        for i in 0..50 {
            records.push(CanonicalRecord::new("ham", format!("ham {i}")));
        }
        records.push(CanonicalRecord::new("spam", "spam a"));
        records.push(CanonicalRecord::new("spam", "spam b"));

        let err = stratified_split(records, 0.2, 2).unwrap_err();
        assert!(matches!(err, PipelineError::Split(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = stratified_split(Vec::new(), 0.2, 2).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset(_)));
    }

    #[test]
    fn test_fraction_out_of_range_fails() {
        let err = stratified_split(sample_records(), 1.0, 2).unwrap_err();
        assert!(matches!(err, PipelineError::Split(_)));
    }
}
