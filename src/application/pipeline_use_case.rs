// ============================================================
// Layer 2 — PipelineUseCase
// ============================================================
// Runs the five pipeline stages in order:
//
//   Step 1: ingest      raw CSV → canonical split   (data/raw)
//   Step 2: preprocess  dedup + encode + normalize  (data/interim)
//   Step 3: features    TF-IDF fit/project          (data/processed)
//   Step 4: train       forest fit                  (models)
//   Step 5: evaluate    test-set metrics            (reports)
//
// Each stage reads only the persisted artifact of the stage
// before it and writes its own before returning, so each stage
// is independently re-runnable. A failure anywhere is logged
// with its stage name and aborts the run unchanged — no retry,
// no partial resume.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::encoder::{dedup_records, LabelEncoder};
use crate::data::preprocessor::TextNormalizer;
use crate::data::schema::SchemaRules;
use crate::data::splitter::stratified_split;
use crate::domain::dataset::{CanonicalRecord, EncodedRecord, FeatureMatrix};
use crate::features::tfidf::TfidfVectorizer;
use crate::infra::workspace::{Split, Workspace};
use crate::ml::evaluator::evaluate_model;
use crate::ml::trainer::{train_model, TrainParams};

// ─── Pipeline Configuration ──────────────────────────────────────────────────
// Everything tunable for one run, resolved from params.yaml
// plus CLI overrides before the use case is constructed.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path of the raw input dataset (delimited, UTF-8)
    pub dataset: PathBuf,

    /// Root directory of the artifact workspace
    pub root: PathBuf,

    /// Share of rows held out for the test split
    pub test_size: f64,

    /// Seed for the stratified split
    pub split_seed: u64,

    /// TF-IDF vocabulary size cap
    pub max_features: usize,

    /// Number of trees in the forest
    pub n_estimators: usize,

    /// Seed for the forest fit
    pub model_seed: u64,
}

// ─── PipelineUseCase ─────────────────────────────────────────────────────────
// Owns the config and the workspace; one method per stage.
pub struct PipelineUseCase {
    config:    PipelineConfig,
    workspace: Workspace,
}

impl PipelineUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        let workspace = Workspace::new(&config.root);
        Self { config, workspace }
    }

    /// Execute all five stages in order.
    pub fn run(&self) -> Result<()> {
        self.ingest()?;
        self.preprocess()?;
        self.engineer_features()?;
        self.train()?;
        self.evaluate()?;
        Ok(())
    }

    // ── Step 1: Ingest ────────────────────────────────────────────────────────

    /// Load the raw dataset, normalize its schema and persist
    /// the stratified train/test split.
    pub fn ingest(&self) -> Result<()> {
        logged("data ingestion", self.ingest_inner())
    }

    fn ingest_inner(&self) -> Result<()> {
        let cfg = &self.config;

        tracing::info!("Loading raw dataset from '{}'", cfg.dataset.display());
        // flexible: exporters sometimes emit short rows when the
        // trailing junk columns are empty
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&cfg.dataset)
            .with_context(|| format!("Cannot open dataset '{}'", cfg.dataset.display()))?;

        let records = SchemaRules::default().normalize(&mut reader)?;
        tracing::info!("Loaded {} rows onto the canonical schema", records.len());

        let (train, test) = stratified_split(records, cfg.test_size, cfg.split_seed)?;
        tracing::info!(
            "Split: {} train, {} test (test fraction {}, seed {})",
            train.len(),
            test.len(),
            cfg.test_size,
            cfg.split_seed
        );

        self.workspace.save_canonical(&train, Split::Train)?;
        self.workspace.save_canonical(&test, Split::Test)?;

        tracing::info!("Data ingestion stage completed");
        Ok(())
    }

    // ── Step 2: Preprocess ────────────────────────────────────────────────────

    /// Deduplicate both splits, encode labels with a mapping fit
    /// on train only, normalize the text column, persist the
    /// interim frames.
    pub fn preprocess(&self) -> Result<()> {
        logged("data preprocessing", self.preprocess_inner())
    }

    fn preprocess_inner(&self) -> Result<()> {
        let train = self
            .workspace
            .load_canonical(Split::Train)
            .context("Cannot read the raw train split. Have you run 'ingest' first?")?;
        let test = self.workspace.load_canonical(Split::Test)?;

        let train = dedup_records(train);
        let test  = dedup_records(test);

        // The encoder sees training targets only; test labels it
        // never saw fail loudly inside encode_split
        let encoder    = LabelEncoder::fit(&train)?;
        let normalizer = TextNormalizer::new();

        let train_encoded = encode_split(&train, &encoder, &normalizer)?;
        let test_encoded  = encode_split(&test, &encoder, &normalizer)?;
        tracing::info!(
            "Preprocessed {} train / {} test rows (classes {:?})",
            train_encoded.len(),
            test_encoded.len(),
            encoder.classes()
        );

        self.workspace.save_encoded(&train_encoded, Split::Train)?;
        self.workspace.save_encoded(&test_encoded, Split::Test)?;

        tracing::info!("Data preprocessing stage completed");
        Ok(())
    }

    // ── Step 3: Feature engineering ───────────────────────────────────────────

    /// Fit the TF-IDF space on training text, project both
    /// splits, persist the matrices and the fitted vectorizer.
    pub fn engineer_features(&self) -> Result<()> {
        logged("feature engineering", self.engineer_features_inner())
    }

    fn engineer_features_inner(&self) -> Result<()> {
        let train = self
            .workspace
            .load_encoded(Split::Train)
            .context("Cannot read the interim train split. Have you run 'preprocess' first?")?;
        let test = self.workspace.load_encoded(Split::Test)?;

        let train_texts: Vec<String> = train.iter().map(|r| r.text.clone()).collect();
        let test_texts:  Vec<String> = test.iter().map(|r| r.text.clone()).collect();

        // Vocabulary is fit on the training text only; the test
        // split is projected into the frozen space
        let mut vectorizer = TfidfVectorizer::new(self.config.max_features);
        let train_rows = vectorizer.fit_transform(&train_texts)?;
        let test_rows  = vectorizer.transform(&test_texts);
        tracing::info!(
            "TF-IDF space: {} terms (cap {})",
            vectorizer.n_terms(),
            self.config.max_features
        );

        let train_matrix =
            FeatureMatrix::new(train_rows, train.iter().map(|r| r.label).collect());
        let test_matrix =
            FeatureMatrix::new(test_rows, test.iter().map(|r| r.label).collect());

        self.workspace.save_features(&train_matrix, Split::Train)?;
        self.workspace.save_features(&test_matrix, Split::Test)?;
        self.workspace.save_vectorizer(&vectorizer)?;

        tracing::info!("Feature engineering stage completed");
        Ok(())
    }

    // ── Step 4: Train ─────────────────────────────────────────────────────────

    /// Fit the forest on the processed training matrix and
    /// persist the model blob.
    pub fn train(&self) -> Result<()> {
        logged("model building", self.train_inner())
    }

    fn train_inner(&self) -> Result<()> {
        let matrix = self
            .workspace
            .load_features(Split::Train)
            .context("Cannot read the processed train matrix. Have you run 'features' first?")?;

        let model = train_model(
            &matrix.features,
            &matrix.labels,
            TrainParams {
                n_estimators: self.config.n_estimators,
                random_state: self.config.model_seed,
            },
        )?;

        self.workspace.save_model(&model)?;
        tracing::info!(
            "Model building stage completed ({} trees)",
            model.n_trees()
        );
        Ok(())
    }

    // ── Step 5: Evaluate ──────────────────────────────────────────────────────

    /// Score the persisted model against the processed test
    /// matrix and write the metrics report.
    pub fn evaluate(&self) -> Result<()> {
        logged("model evaluation", self.evaluate_inner())
    }

    fn evaluate_inner(&self) -> Result<()> {
        let model = self
            .workspace
            .load_model()
            .context("Cannot load the model. Have you run 'train' first?")?;
        let matrix = self.workspace.load_features(Split::Test)?;

        let report = evaluate_model(&model, &matrix.features, &matrix.labels)?;
        self.workspace.save_metrics(&report)?;

        tracing::info!(
            "Model evaluation stage completed: accuracy={:.4} precision={:.4} recall={:.4} auc={:.4}",
            report.accuracy,
            report.precision,
            report.recall,
            report.auc
        );
        Ok(())
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
}

/// Encode one split's labels and normalize its text.
fn encode_split(
    records: &[CanonicalRecord],
    encoder: &LabelEncoder,
    normalizer: &TextNormalizer,
) -> Result<Vec<EncodedRecord>> {
    let mut encoded = Vec::with_capacity(records.len());
    for record in records {
        let label = encoder.encode(&record.target)?;
        encoded.push(EncodedRecord::new(label, normalizer.normalize(&record.text)));
    }
    Ok(encoded)
}

/// Log a stage failure with its originating stage, then
/// re-raise the error unchanged.
fn logged<T>(stage: &str, result: Result<T>) -> Result<T> {
    if let Err(ref e) = result {
        tracing::error!("Failed to complete the {} stage: {:#}", stage, e);
    }
    result
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    /// Temp workspace + synthetic dataset, removed on drop.
    struct Fixture {
        root: PathBuf,
    }

    impl Fixture {
        fn new(tag: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "spam-pipeline-uc-{tag}-{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        /// 100 unique rows: 80 ham, 20 spam, in the raw export
        /// shape (v1/v2 plus a junk column).
        fn write_dataset(&self) -> PathBuf {
            let path = self.root.join("spam.csv");
            let mut file = fs::File::create(&path).unwrap();
            writeln!(file, "v1,v2,Unnamed: 2").unwrap();
            for i in 0..80 {
                writeln!(file, "ham,meeting lunch plan friend note number {i},").unwrap();
            }
            for i in 0..20 {
                writeln!(file, "spam,win free cash prize urgent claim number {i},").unwrap();
            }
            path
        }

        fn config(&self, dataset: PathBuf) -> PipelineConfig {
            PipelineConfig {
                dataset,
                root:         self.root.clone(),
                test_size:    0.2,
                split_seed:   2,
                max_features: 30,
                n_estimators: 22,
                model_seed:   2,
            }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_full_pipeline_end_to_end() {
        let fixture = Fixture::new("e2e");
        let dataset = fixture.write_dataset();
        let use_case = PipelineUseCase::new(fixture.config(dataset));

        use_case.run().unwrap();
        let ws = use_case.workspace();

        // Raw split: 80/20 before dedup
        let raw_train = ws.load_canonical(Split::Train).unwrap();
        let raw_test  = ws.load_canonical(Split::Test).unwrap();
        assert_eq!(raw_train.len(), 80);
        assert_eq!(raw_test.len(), 20);

        // Train/test matrices share the capped column space
        let train_matrix = ws.load_features(Split::Train).unwrap();
        let test_matrix  = ws.load_features(Split::Test).unwrap();
        assert_eq!(train_matrix.n_cols(), test_matrix.n_cols());
        assert!(train_matrix.n_cols() <= 30);

        // A fitted model was persisted
        assert!(ws.model_path().exists());

        // All four metrics present and within [0, 1]
        let report = ws.load_metrics().unwrap();
        for value in [report.accuracy, report.precision, report.recall, report.auc] {
            assert!((0.0..=1.0).contains(&value), "metric out of range: {value}");
        }
    }

    #[test]
    fn test_rerun_is_reproducible() {
        let fixture = Fixture::new("rerun");
        let dataset = fixture.write_dataset();
        let use_case = PipelineUseCase::new(fixture.config(dataset));

        use_case.run().unwrap();
        let first = use_case.workspace().load_metrics().unwrap();

        use_case.run().unwrap();
        let second = use_case.workspace().load_metrics().unwrap();

        // Same data, same seeds — identical report
        assert_eq!(first, second);
    }

    #[test]
    fn test_stage_fails_without_its_input_artifact() {
        let fixture = Fixture::new("missing-input");
        let dataset = fixture.root.join("spam.csv"); // never written
        let use_case = PipelineUseCase::new(fixture.config(dataset));

        // No dataset → ingest fails
        assert!(use_case.ingest().is_err());
        // No raw artifact → preprocess fails
        assert!(use_case.preprocess().is_err());
        // No model → evaluate fails
        assert!(use_case.evaluate().is_err());
    }

    #[test]
    fn test_stages_are_individually_rerunnable() {
        let fixture = Fixture::new("stagewise");
        let dataset = fixture.write_dataset();
        let use_case = PipelineUseCase::new(fixture.config(dataset));

        use_case.ingest().unwrap();
        use_case.preprocess().unwrap();
        use_case.engineer_features().unwrap();
        use_case.train().unwrap();
        use_case.evaluate().unwrap();

        // Re-running a middle stage from its recorded input works
        use_case.engineer_features().unwrap();
        use_case.train().unwrap();
        use_case.evaluate().unwrap();

        assert!(use_case.workspace().metrics_path().exists());
    }
}
