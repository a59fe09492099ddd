//! JSON-persisted feedback store
//!
//! One process owns the log file at a time; there is no cross-process
//! locking, so concurrent multi-process writers can race and corrupt it.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::FeedbackConfig;
use crate::error::{Error, Result};

/// User rating of an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
}

/// One recorded rating event. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Monotonic 1-based id
    pub id: u64,
    /// Creation time (ISO-8601 in the persisted JSON)
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    pub rating: Rating,
    /// Optional free-text comment
    #[serde(default)]
    pub feedback_text: String,
    /// Label of the document set the answer came from
    #[serde(default)]
    pub pdf_name: String,
}

/// Aggregate statistics over the current log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackStats {
    pub total: usize,
    pub likes: usize,
    pub dislikes: usize,
    /// Like percentage rounded to one decimal place; 0 when the log is empty
    pub like_rate_percent: f64,
}

/// One entry reshaped for external training pipelines
#[derive(Debug, Clone, Serialize)]
pub struct TrainingExample {
    pub input: String,
    pub output: String,
    /// 1 for a liked answer, 0 for a disliked one
    pub rating: u8,
    pub feedback: String,
    pub context: String,
}

/// Durable append-only log of rating events.
///
/// Every mutating call rewrites the whole persisted file. A persist
/// failure is reported through the log but does not roll back the
/// in-memory mutation; memory and disk may diverge until the next
/// successful write.
pub struct FeedbackStore {
    storage_path: PathBuf,
    export_dir: PathBuf,
    entries: RwLock<Vec<FeedbackEntry>>,
}

impl FeedbackStore {
    /// Open the store, loading any existing log.
    ///
    /// A missing file is an empty log; a corrupt or unreadable file is
    /// reported and degraded to an empty log rather than failing.
    pub fn new(config: &FeedbackConfig) -> Self {
        let store = Self {
            storage_path: config.storage_path.clone(),
            export_dir: config.export_dir.clone(),
            entries: RwLock::new(Vec::new()),
        };

        if let Err(e) = store.load() {
            tracing::warn!(
                "could not load feedback log from '{}': {}",
                store.storage_path.display(),
                e
            );
        }

        store
    }

    /// Append one rating event, persist the full log, and return the new
    /// entry's id.
    pub fn add(
        &self,
        question: &str,
        answer: &str,
        rating: Rating,
        feedback_text: &str,
        pdf_name: &str,
    ) -> u64 {
        let id = {
            let mut entries = self.entries.write();
            let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
            entries.push(FeedbackEntry {
                id,
                timestamp: Utc::now(),
                question: question.to_string(),
                answer: answer.to_string(),
                rating,
                feedback_text: feedback_text.to_string(),
                pdf_name: pdf_name.to_string(),
            });
            id
        };

        if let Err(e) = self.save() {
            tracing::error!("failed to persist feedback log: {}", e);
        }

        id
    }

    /// Aggregate statistics over the current log
    pub fn stats(&self) -> FeedbackStats {
        let entries = self.entries.read();
        let total = entries.len();
        let likes = entries.iter().filter(|e| e.rating == Rating::Like).count();
        let dislikes = total - likes;
        let like_rate_percent = if total > 0 {
            (likes as f64 / total as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        FeedbackStats {
            total,
            likes,
            dislikes,
            like_rate_percent,
        }
    }

    /// The `limit` most recent entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<FeedbackEntry> {
        let mut entries = self.entries.read().clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        entries
    }

    /// Export the log as CSV into the configured export directory.
    ///
    /// Returns `None` when the log is empty, otherwise the path of the
    /// written `feedback_export_<YYYYMMDD_HHMMSS>.csv` file.
    pub fn export(&self) -> Result<Option<PathBuf>> {
        let entries = self.entries.read();
        if entries.is_empty() {
            return Ok(None);
        }

        let filename = format!(
            "feedback_export_{}.csv",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.export_dir.join(filename);

        fs::create_dir_all(&self.export_dir)
            .map_err(|e| Error::persistence(format!("cannot create export dir: {}", e)))?;

        let mut writer = csv::Writer::from_path(&path)?;
        for entry in entries.iter() {
            writer.serialize(entry)?;
        }
        writer.flush()?;

        tracing::info!("exported {} feedback entries to '{}'", entries.len(), path.display());
        Ok(Some(path))
    }

    /// Reshape the log for external training pipelines
    pub fn training_examples(&self) -> Vec<TrainingExample> {
        self.entries
            .read()
            .iter()
            .map(|e| TrainingExample {
                input: e.question.clone(),
                output: e.answer.clone(),
                rating: if e.rating == Rating::Like { 1 } else { 0 },
                feedback: e.feedback_text.clone(),
                context: e.pdf_name.clone(),
            })
            .collect()
    }

    /// Empty the log and persist the empty state. Irreversible.
    pub fn clear(&self) {
        self.entries.write().clear();
        if let Err(e) = self.save() {
            tracing::error!("failed to persist cleared feedback log: {}", e);
        }
    }

    /// Number of entries in the current log
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Rewrite the whole persisted log
    fn save(&self) -> Result<()> {
        let entries = self.entries.read();
        let data = serde_json::to_string_pretty(&*entries)?;

        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::persistence(format!("cannot create log dir: {}", e)))?;
        }

        fs::write(&self.storage_path, data)
            .map_err(|e| Error::persistence(format!("cannot write log: {}", e)))
    }

    /// Load the persisted log; a missing file is an empty log
    fn load(&self) -> Result<()> {
        if !self.storage_path.exists() {
            return Ok(());
        }

        let data = fs::read_to_string(&self.storage_path)
            .map_err(|e| Error::persistence(format!("cannot read log: {}", e)))?;
        let loaded: Vec<FeedbackEntry> = serde_json::from_str(&data)
            .map_err(|e| Error::persistence(format!("corrupt log: {}", e)))?;

        tracing::info!("loaded {} feedback entries", loaded.len());
        *self.entries.write() = loaded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> FeedbackConfig {
        FeedbackConfig {
            storage_path: dir.path().join("feedback_data.json"),
            export_dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn add_assigns_sequential_ids_and_persists() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let store = FeedbackStore::new(&config);

        let first = store.add("Q1?", "A1.", Rating::Like, "", "doc.pdf");
        let second = store.add("Q2?", "A2.", Rating::Dislike, "too vague", "doc.pdf");

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert!(config.storage_path.exists());
    }

    #[test]
    fn entries_round_trip_through_the_persisted_log() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let store = FeedbackStore::new(&config);
        store.add("What is X?", "X is Y.", Rating::Like, "clear answer", "x.pdf");
        drop(store);

        let reloaded = FeedbackStore::new(&config);
        assert_eq!(reloaded.len(), 1);

        let entries = reloaded.recent(1);
        let entry = &entries[0];
        assert_eq!(entry.id, 1);
        assert_eq!(entry.question, "What is X?");
        assert_eq!(entry.answer, "X is Y.");
        assert_eq!(entry.rating, Rating::Like);
        assert_eq!(entry.feedback_text, "clear answer");
        assert_eq!(entry.pdf_name, "x.pdf");
    }

    #[test]
    fn ids_continue_after_reload() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let store = FeedbackStore::new(&config);
        store.add("Q1?", "A1.", Rating::Like, "", "");
        store.add("Q2?", "A2.", Rating::Like, "", "");
        drop(store);

        let reloaded = FeedbackStore::new(&config);
        assert_eq!(reloaded.add("Q3?", "A3.", Rating::Dislike, "", ""), 3);
    }

    #[test]
    fn stats_aggregate_ratings() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));

        store.add("Q1?", "A1.", Rating::Like, "", "");
        store.add("Q2?", "A2.", Rating::Dislike, "", "");

        assert_eq!(
            store.stats(),
            FeedbackStats {
                total: 2,
                likes: 1,
                dislikes: 1,
                like_rate_percent: 50.0,
            }
        );
    }

    #[test]
    fn like_rate_rounds_to_one_decimal() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));

        store.add("Q1?", "A1.", Rating::Like, "", "");
        store.add("Q2?", "A2.", Rating::Like, "", "");
        store.add("Q3?", "A3.", Rating::Dislike, "", "");

        assert_eq!(store.stats().like_rate_percent, 66.7);
    }

    #[test]
    fn clear_empties_the_log_and_stats() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let store = FeedbackStore::new(&config);

        store.add("Q1?", "A1.", Rating::Like, "", "");
        store.clear();

        assert_eq!(
            store.stats(),
            FeedbackStats {
                total: 0,
                likes: 0,
                dislikes: 0,
                like_rate_percent: 0.0,
            }
        );

        let reloaded = FeedbackStore::new(&config);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn recent_returns_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));

        store.add("Q1?", "A1.", Rating::Like, "", "");
        store.add("Q2?", "A2.", Rating::Like, "", "");
        store.add("Q3?", "A3.", Rating::Like, "", "");

        let recent = store.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, 3);
        assert_eq!(recent[1].id, 2);
    }

    #[test]
    fn export_returns_none_on_empty_log() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));

        assert!(store.export().unwrap().is_none());
    }

    #[test]
    fn export_writes_a_csv_with_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));

        store.add("What is X?", "X is Y.", Rating::Like, "nice", "x.pdf");
        store.add("What is Z?", "No idea.", Rating::Dislike, "", "z.pdf");

        let path = store.export().unwrap().unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("feedback_export_"));
        assert!(name.ends_with(".csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("id,timestamp,question,answer,rating,feedback_text,pdf_name")
        );
        assert_eq!(lines.count(), 2);
        assert!(content.contains("like"));
        assert!(content.contains("dislike"));
    }

    #[test]
    fn training_examples_map_ratings_to_binary_labels() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));

        store.add("Q1?", "A1.", Rating::Like, "good", "a.pdf");
        store.add("Q2?", "A2.", Rating::Dislike, "", "b.pdf");

        let examples = store.training_examples();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].rating, 1);
        assert_eq!(examples[0].input, "Q1?");
        assert_eq!(examples[1].rating, 0);
        assert_eq!(examples[1].context, "b.pdf");
    }

    #[test]
    fn corrupt_log_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::write(&config.storage_path, "this is not json").unwrap();

        let store = FeedbackStore::new(&config);
        assert!(store.is_empty());

        // The store stays usable after the degraded load.
        assert_eq!(store.add("Q?", "A.", Rating::Like, "", ""), 1);
    }

    #[test]
    fn missing_log_file_is_an_empty_log() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(&test_config(&dir));
        assert_eq!(store.stats().total, 0);
    }
}
