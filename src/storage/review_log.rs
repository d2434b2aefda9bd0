use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, Transaction, params};
use tracing::{debug, info};

use crate::core::{ReviewRecord, Sentiment, format_timestamp};
use crate::error::{Result, SentimentError};

const CREATE_TABLE: &str = "CREATE TABLE review_db (review TEXT, sentiment INTEGER, date TEXT)";
const INSERT: &str = "INSERT INTO review_db (review, sentiment, date) VALUES (?1, ?2, ?3)";
const SELECT_NEWEST_FIRST: &str =
    "SELECT review, sentiment, date FROM review_db ORDER BY date DESC, rowid DESC";

/// Append-only SQLite log of reviews and the label they were resolved to.
pub struct ReviewLog {
    conn: Connection,
    path: PathBuf,
}

impl ReviewLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SentimentError::missing(path));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!("Opened review log at {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Destroys any existing log at `path` and creates an empty table.
    pub fn create_fresh(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path)?;
            info!("Removed existing review log at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute(CREATE_TABLE, [])?;
        info!("Review log initialized at {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_review(&self, text: &str, sentiment: Sentiment, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            INSERT,
            params![text, i64::from(sentiment.label()), format_timestamp(at)],
        )?;
        Ok(())
    }

    /// Inserts a row inside an open transaction. The row is only kept if the
    /// returned handle is committed; dropping it rolls the insert back.
    pub fn stage_review(
        &mut self,
        text: &str,
        sentiment: Sentiment,
        at: DateTime<Utc>,
    ) -> Result<StagedReview<'_>> {
        let tx = self.conn.transaction()?;
        tx.execute(
            INSERT,
            params![text, i64::from(sentiment.label()), format_timestamp(at)],
        )?;
        Ok(StagedReview { tx })
    }

    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM review_db", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Every record, newest first.
    pub fn read_all(&self) -> Result<Vec<ReviewRecord>> {
        let mut out = Vec::new();
        self.for_each_batch(usize::MAX, |batch| {
            out.extend_from_slice(batch);
            Ok(())
        })?;
        Ok(out)
    }

    /// Hands out the records newest first in slices of at most `batch_size`.
    /// Returns the number of batches visited.
    pub fn for_each_batch<F>(&self, batch_size: usize, mut visit: F) -> Result<usize>
    where
        F: FnMut(&[ReviewRecord]) -> Result<()>,
    {
        if batch_size == 0 {
            return Err(SentimentError::invalid("batch_size must be > 0"));
        }

        let mut stmt = self.conn.prepare(SELECT_NEWEST_FIRST)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut batch = Vec::with_capacity(batch_size.min(1024));
        let mut batches = 0;
        for row in rows {
            let (text, label, date) = row?;
            batch.push(ReviewRecord {
                text,
                sentiment: Sentiment::from_label(label)?,
                date,
            });
            if batch.len() == batch_size {
                visit(&batch)?;
                batches += 1;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            visit(&batch)?;
            batches += 1;
        }
        Ok(batches)
    }
}

/// A log row written but not yet committed.
pub struct StagedReview<'a> {
    tx: Transaction<'a>,
}

impl StagedReview<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn fresh() -> (TempDir, ReviewLog) {
        let dir = TempDir::new().unwrap();
        let log = ReviewLog::create_fresh(dir.path().join("reviews.sqlite")).unwrap();
        (dir, log)
    }

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    #[test]
    fn open_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.sqlite");
        match ReviewLog::open(&path) {
            Err(SentimentError::MissingFile { path: p }) => assert_eq!(p, path),
            other => panic!("expected MissingFile, got {:?}", other.err()),
        }
    }

    #[test]
    fn append_then_read_newest_first() {
        let (_dir, log) = fresh();
        log.append_review("first review", Sentiment::Positive, at(0))
            .unwrap();
        log.append_review("second review", Sentiment::Negative, at(5))
            .unwrap();
        log.append_review("third review", Sentiment::Positive, at(2))
            .unwrap();

        let rows = log.read_all().unwrap();
        let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["second review", "third review", "first review"]);
        assert_eq!(rows[0].sentiment, Sentiment::Negative);
        assert_eq!(rows[0].date, "2024-03-01 12:05:00");
        assert_eq!(log.count().unwrap(), 3);
    }

    #[test]
    fn staged_row_is_kept_only_on_commit() {
        let (_dir, mut log) = fresh();

        let staged = log
            .stage_review("rolled back review", Sentiment::Positive, at(0))
            .unwrap();
        drop(staged);
        assert_eq!(log.count().unwrap(), 0);

        log.stage_review("committed review", Sentiment::Negative, at(1))
            .unwrap()
            .commit()
            .unwrap();
        let rows = log.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "committed review");
    }

    #[test]
    fn same_timestamp_ties_break_newest_row_first() {
        let (_dir, log) = fresh();
        log.append_review("older", Sentiment::Positive, at(1)).unwrap();
        log.append_review("newer", Sentiment::Positive, at(1)).unwrap();
        let rows = log.read_all().unwrap();
        assert_eq!(rows[0].text, "newer");
    }

    #[test]
    fn batches_respect_the_size() {
        let (_dir, log) = fresh();
        for i in 0..7 {
            log.append_review(&format!("review {i}"), Sentiment::Positive, at(i))
                .unwrap();
        }

        let mut sizes = Vec::new();
        let batches = log
            .for_each_batch(3, |b| {
                sizes.push(b.len());
                Ok(())
            })
            .unwrap();
        assert_eq!(batches, 3);
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn empty_log_visits_nothing() {
        let (_dir, log) = fresh();
        let batches = log
            .for_each_batch(10, |_| panic!("no batch expected"))
            .unwrap();
        assert_eq!(batches, 0);
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let (_dir, log) = fresh();
        assert!(matches!(
            log.for_each_batch(0, |_| Ok(())),
            Err(SentimentError::InvalidInput(_))
        ));
    }

    #[test]
    fn create_fresh_destroys_previous_contents() {
        let (dir, log) = fresh();
        log.append_review("kept?", Sentiment::Negative, at(0)).unwrap();
        drop(log);

        let log = ReviewLog::create_fresh(dir.path().join("reviews.sqlite")).unwrap();
        assert_eq!(log.count().unwrap(), 0);
    }

    #[test]
    fn foreign_label_values_are_rejected() {
        let (_dir, log) = fresh();
        log.conn
            .execute(
                "INSERT INTO review_db (review, sentiment, date) VALUES ('odd', 3, '2024-01-01 00:00:00')",
                [],
            )
            .unwrap();
        assert!(matches!(
            log.read_all(),
            Err(SentimentError::InvalidInput(_))
        ));
    }

    #[test]
    fn reopen_sees_appended_rows() {
        let (dir, log) = fresh();
        log.append_review("persisted", Sentiment::Positive, at(0))
            .unwrap();
        drop(log);

        let log = ReviewLog::open(dir.path().join("reviews.sqlite")).unwrap();
        assert_eq!(log.read_all().unwrap()[0].text, "persisted");
    }
}
