// ============================================================
// Layer 6 — Artifact Workspace
// ============================================================
// Owns the fixed on-disk layout every stage reads from and
// writes to:
//
//   <root>/
//     data/raw/train.csv            ← ingest
//     data/raw/test.csv
//     data/interim/train.csv        ← preprocess
//     data/interim/test.csv
//     data/processed/train_tfidf.csv← features
//     data/processed/test_tfidf.csv
//     models/vectorizer.json        ← features (fitted state)
//     models/model.bin              ← train
//     reports/metrics.json          ← evaluate
//
// File formats:
//   canonical CSV   header `target,text`, string label
//   interim CSV     header `target,text`, integer label,
//                   normalized text
//   processed CSV   headers `0..n-1,label`, f64 features with
//                   the encoded label as the trailing column
//   model blob      bincode-serialized RandomForest
//   metrics         pretty JSON, written once
//
// Each save creates its parent directory; each load returns the
// typed artifact or the underlying Io/Csv/Json error unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::dataset::{CanonicalRecord, EncodedRecord, FeatureMatrix, MetricsReport};
use crate::domain::error::{PipelineError, Result};
use crate::features::tfidf::TfidfVectorizer;
use crate::ml::forest::RandomForest;

/// Which side of the partition an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test  => "test",
        }
    }
}

/// The artifact store rooted at one directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ── Artifact locations ────────────────────────────────────────────────────

    pub fn raw_path(&self, split: Split) -> PathBuf {
        self.root.join("data/raw").join(format!("{}.csv", split.name()))
    }

    pub fn interim_path(&self, split: Split) -> PathBuf {
        self.root.join("data/interim").join(format!("{}.csv", split.name()))
    }

    pub fn processed_path(&self, split: Split) -> PathBuf {
        self.root
            .join("data/processed")
            .join(format!("{}_tfidf.csv", split.name()))
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.root.join("models/vectorizer.json")
    }

    pub fn model_path(&self) -> PathBuf {
        self.root.join("models/model.bin")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.root.join("reports/metrics.json")
    }

    // ── Canonical frames (raw stage) ──────────────────────────────────────────

    pub fn save_canonical(&self, records: &[CanonicalRecord], split: Split) -> Result<()> {
        let path = self.raw_path(split);
        ensure_parent(&path)?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["target", "text"])?;
        for record in records {
            writer.write_record([record.target.as_str(), record.text.as_str()])?;
        }
        writer.flush()?;

        tracing::debug!("Saved {} rows to '{}'", records.len(), path.display());
        Ok(())
    }

    pub fn load_canonical(&self, split: Split) -> Result<Vec<CanonicalRecord>> {
        let path = self.raw_path(split);
        let mut reader = csv::Reader::from_path(&path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(CanonicalRecord::new(
                row.get(0).unwrap_or(""),
                row.get(1).unwrap_or(""),
            ));
        }

        tracing::debug!("Loaded {} rows from '{}'", records.len(), path.display());
        Ok(records)
    }

    // ── Encoded frames (interim stage) ────────────────────────────────────────

    pub fn save_encoded(&self, records: &[EncodedRecord], split: Split) -> Result<()> {
        let path = self.interim_path(split);
        ensure_parent(&path)?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["target", "text"])?;
        for record in records {
            writer.write_record([record.label.to_string().as_str(), record.text.as_str()])?;
        }
        writer.flush()?;

        tracing::debug!("Saved {} rows to '{}'", records.len(), path.display());
        Ok(())
    }

    pub fn load_encoded(&self, split: Split) -> Result<Vec<EncodedRecord>> {
        let path = self.interim_path(split);
        let mut reader = csv::Reader::from_path(&path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let label: u32 = row
                .get(0)
                .unwrap_or("")
                .parse()
                .map_err(|_| bad_cell(&path, row.get(0).unwrap_or("")))?;
            records.push(EncodedRecord::new(label, row.get(1).unwrap_or("")));
        }

        tracing::debug!("Loaded {} rows from '{}'", records.len(), path.display());
        Ok(records)
    }

    // ── Feature matrices (processed stage) ────────────────────────────────────

    pub fn save_features(&self, matrix: &FeatureMatrix, split: Split) -> Result<()> {
        let path = self.processed_path(split);
        ensure_parent(&path)?;

        let mut writer = csv::Writer::from_path(&path)?;

        // Numeric column headers 0..n-1 plus the trailing label
        let mut header: Vec<String> = (0..matrix.n_cols()).map(|i| i.to_string()).collect();
        header.push("label".to_string());
        writer.write_record(&header)?;

        for (row, label) in matrix.features.iter().zip(&matrix.labels) {
            let mut cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            cells.push(label.to_string());
            writer.write_record(&cells)?;
        }
        writer.flush()?;

        tracing::debug!(
            "Saved {}x{} feature matrix to '{}'",
            matrix.n_rows(),
            matrix.n_cols(),
            path.display()
        );
        Ok(())
    }

    pub fn load_features(&self, split: Split) -> Result<FeatureMatrix> {
        let path = self.processed_path(split);
        let mut reader = csv::Reader::from_path(&path)?;

        let mut features = Vec::new();
        let mut labels   = Vec::new();
        for row in reader.records() {
            let row = row?;
            let width = row.len();
            if width == 0 {
                continue;
            }

            let mut values = Vec::with_capacity(width - 1);
            for cell in row.iter().take(width - 1) {
                let value: f64 = cell.parse().map_err(|_| bad_cell(&path, cell))?;
                values.push(value);
            }
            let label_cell = row.get(width - 1).unwrap_or("");
            let label: u32 = label_cell.parse().map_err(|_| bad_cell(&path, label_cell))?;

            features.push(values);
            labels.push(label);
        }

        tracing::debug!(
            "Loaded {} feature rows from '{}'",
            features.len(),
            path.display()
        );
        Ok(FeatureMatrix::new(features, labels))
    }

    // ── Fitted vectorizer state ───────────────────────────────────────────────

    pub fn save_vectorizer(&self, vectorizer: &TfidfVectorizer) -> Result<()> {
        let path = self.vectorizer_path();
        ensure_parent(&path)?;

        fs::write(&path, serde_json::to_string_pretty(vectorizer)?)?;
        tracing::debug!("Saved fitted vectorizer to '{}'", path.display());
        Ok(())
    }

    pub fn load_vectorizer(&self) -> Result<TfidfVectorizer> {
        let path = self.vectorizer_path();
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    // ── Model blob ────────────────────────────────────────────────────────────

    pub fn save_model(&self, model: &RandomForest) -> Result<()> {
        let path = self.model_path();
        ensure_parent(&path)?;

        fs::write(&path, bincode::serialize(model)?)?;
        tracing::debug!("Saved model to '{}'", path.display());
        Ok(())
    }

    pub fn load_model(&self) -> Result<RandomForest> {
        let path = self.model_path();
        let bytes = fs::read(&path)?;
        let model = bincode::deserialize(&bytes)?;
        tracing::debug!("Loaded model from '{}'", path.display());
        Ok(model)
    }

    // ── Metrics report ────────────────────────────────────────────────────────

    /// Write the metrics report. Written exactly once per
    /// evaluation run and never mutated afterwards.
    pub fn save_metrics(&self, metrics: &MetricsReport) -> Result<()> {
        let path = self.metrics_path();
        ensure_parent(&path)?;

        fs::write(&path, serde_json::to_string_pretty(metrics)?)?;
        tracing::debug!("Saved metrics to '{}'", path.display());
        Ok(())
    }

    pub fn load_metrics(&self) -> Result<MetricsReport> {
        let path = self.metrics_path();
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn bad_cell(path: &Path, cell: &str) -> PipelineError {
    PipelineError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("'{}' holds non-numeric cell {:?}", path.display(), cell),
    ))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Classifier;
    use crate::ml::forest::ForestConfig;

    /// A workspace under the OS temp dir, removed on drop.
    struct TempWorkspace(Workspace);

    impl TempWorkspace {
        fn new(tag: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "spam-pipeline-ws-{tag}-{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            Self(Workspace::new(root))
        }
    }

    impl Drop for TempWorkspace {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(self.0.root());
        }
    }

    #[test]
    fn test_canonical_roundtrip() {
        let ws = TempWorkspace::new("canonical");
        let records = vec![
            CanonicalRecord::new("ham", "see you at lunch, maybe 12?"),
            CanonicalRecord::new("spam", "WIN a \"free\" prize now"),
            CanonicalRecord::new("ham", ""),
        ];

        ws.0.save_canonical(&records, Split::Train).unwrap();
        assert_eq!(ws.0.load_canonical(Split::Train).unwrap(), records);
    }

    #[test]
    fn test_encoded_roundtrip() {
        let ws = TempWorkspace::new("encoded");
        let records = vec![
            EncodedRecord::new(0, "see lunch"),
            EncodedRecord::new(1, "win prize"),
        ];

        ws.0.save_encoded(&records, Split::Test).unwrap();
        assert_eq!(ws.0.load_encoded(Split::Test).unwrap(), records);
    }

    #[test]
    fn test_features_roundtrip() {
        let ws = TempWorkspace::new("features");
        let matrix = FeatureMatrix::new(
            vec![vec![0.0, 0.5, 0.25], vec![1.0, 0.0, 0.125]],
            vec![0, 1],
        );

        ws.0.save_features(&matrix, Split::Train).unwrap();
        assert_eq!(ws.0.load_features(Split::Train).unwrap(), matrix);
    }

    #[test]
    fn test_model_roundtrip() {
        let ws = TempWorkspace::new("model");

        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let y: Vec<u32> = (0..20).map(|i| u32::from(i >= 10)).collect();
        let mut model = RandomForest::new(ForestConfig {
            n_estimators: 3,
            random_state: 1,
            ..Default::default()
        });
        model.fit(&x, &y);

        ws.0.save_model(&model).unwrap();
        let restored = ws.0.load_model().unwrap();
        assert_eq!(model.predict(&x), restored.predict(&x));
    }

    #[test]
    fn test_vectorizer_roundtrip() {
        let ws = TempWorkspace::new("vectorizer");

        let docs: Vec<String> = ["win cash now", "cash prize"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut vectorizer = TfidfVectorizer::new(10);
        vectorizer.fit(&docs).unwrap();

        ws.0.save_vectorizer(&vectorizer).unwrap();
        let restored = ws.0.load_vectorizer().unwrap();
        assert_eq!(vectorizer.transform(&docs), restored.transform(&docs));
    }

    #[test]
    fn test_metrics_roundtrip() {
        let ws = TempWorkspace::new("metrics");
        let report = MetricsReport {
            accuracy:  0.95,
            precision: 0.9,
            recall:    0.85,
            auc:       0.97,
        };

        ws.0.save_metrics(&report).unwrap();
        assert_eq!(ws.0.load_metrics().unwrap(), report);
    }

    #[test]
    fn test_loading_missing_artifact_fails() {
        let ws = TempWorkspace::new("missing");
        assert!(ws.0.load_canonical(Split::Train).is_err());
        assert!(ws.0.load_model().is_err());
    }
}
