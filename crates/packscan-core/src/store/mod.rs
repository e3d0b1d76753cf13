//! Pending-insight store: the read/write contract the annotation subsystem
//! relies on, and its SQLite reference implementation.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;

/// A proposed insight awaiting (or past) annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingInsight {
    /// Stable identifier.
    pub id: Uuid,
    /// Product the insight was proposed for.
    pub barcode: String,
    /// Insight category, selects the annotator.
    pub insight_type: String,
    /// Free-form payload (`text`, `correction`, `original`, ...).
    pub data: Value,
    /// Start of the slice of the shared reference text, when the payload
    /// carries one.
    pub start_offset: Option<i64>,
    /// End of that slice, exclusive.
    pub end_offset: Option<i64>,
    /// Annotation verdict; `None` while pending.
    pub annotation: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PendingInsight {
    /// Build a fresh pending insight. Offsets are lifted out of the payload
    /// when present so the store can shift them as plain numeric fields.
    pub fn new(
        barcode: impl Into<String>,
        insight_type: impl Into<String>,
        data: Value,
    ) -> Self {
        let start_offset = data.get("start_offset").and_then(Value::as_i64);
        let end_offset = data.get("end_offset").and_then(Value::as_i64);

        Self {
            id: Uuid::new_v4(),
            barcode: barcode.into(),
            insight_type: insight_type.into(),
            data,
            start_offset,
            end_offset,
            annotation: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the insight still awaits annotation.
    pub fn is_pending(&self) -> bool {
        self.annotation.is_none()
    }
}

/// Read/write contract between the annotation subsystem and persistence.
pub trait InsightStore: Send + Sync {
    /// Persist a new insight.
    fn insert(&self, insight: &PendingInsight) -> Result<(), StoreError>;

    /// Fetch one insight by id.
    fn get(&self, id: Uuid) -> Result<Option<PendingInsight>, StoreError>;

    /// Record an annotation verdict.
    fn mark_annotated(&self, id: Uuid, value: i32) -> Result<(), StoreError>;

    /// Add `delta` to both offsets of every still-pending insight sharing
    /// `(barcode, insight_type)`, excluding `except`. Atomic: either every
    /// matching row is shifted or none is. Returns the number of rows
    /// shifted.
    fn shift_sibling_offsets(
        &self,
        barcode: &str,
        insight_type: &str,
        except: Uuid,
        delta: i64,
    ) -> Result<usize, StoreError>;
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS insight (
    id TEXT PRIMARY KEY,
    barcode TEXT NOT NULL,
    insight_type TEXT NOT NULL,
    data TEXT NOT NULL,
    start_offset INTEGER,
    end_offset INTEGER,
    annotation INTEGER,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_insight_barcode_type
    ON insight (barcode, insight_type);
";

/// SQLite-backed insight store.
///
/// SQLite serializes writers, so the single-statement sibling update below
/// gives the per-(barcode, type) exclusive-access discipline reconciliation
/// requires.
pub struct SqliteInsightStore {
    conn: Mutex<Connection>,
}

impl SqliteInsightStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl InsightStore for SqliteInsightStore {
    fn insert(&self, insight: &PendingInsight) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO insight
                 (id, barcode, insight_type, data, start_offset, end_offset,
                  annotation, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                insight.id.to_string(),
                insight.barcode,
                insight.insight_type,
                insight.data.to_string(),
                insight.start_offset,
                insight.end_offset,
                insight.annotation,
                insight.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<PendingInsight>, StoreError> {
        let conn = self.conn.lock();
        let row: Option<(String, String, String, String, Option<i64>, Option<i64>, Option<i32>, String)> =
            conn.query_row(
                "SELECT id, barcode, insight_type, data, start_offset, end_offset,
                        annotation, created_at
                 FROM insight WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, barcode, insight_type, data, start_offset, end_offset, annotation, created_at)) =
            row
        else {
            return Ok(None);
        };

        let id = Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let data = serde_json::from_str(&data).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Some(PendingInsight {
            id,
            barcode,
            insight_type,
            data,
            start_offset,
            end_offset,
            annotation,
            created_at,
        }))
    }

    fn mark_annotated(&self, id: Uuid, value: i32) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE insight SET annotation = ?1 WHERE id = ?2",
            params![value, id.to_string()],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn shift_sibling_offsets(
        &self,
        barcode: &str,
        insight_type: &str,
        except: Uuid,
        delta: i64,
    ) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE insight
             SET start_offset = start_offset + ?1,
                 end_offset = end_offset + ?1
             WHERE barcode = ?2
               AND insight_type = ?3
               AND id != ?4
               AND annotation IS NULL
               AND start_offset IS NOT NULL
               AND end_offset IS NOT NULL",
            params![delta, barcode, insight_type, except.to_string()],
        )?;

        tx.commit()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spellcheck_insight(barcode: &str, start: i64, end: i64) -> PendingInsight {
        PendingInsight::new(
            barcode,
            "ingredient_spellcheck",
            json!({
                "original": "tomate",
                "correction": "tomates",
                "start_offset": start,
                "end_offset": end,
            }),
        )
    }

    #[test]
    fn test_new_lifts_offsets_from_payload() {
        let insight = spellcheck_insight("3014532003101", 4, 10);
        assert_eq!(insight.start_offset, Some(4));
        assert_eq!(insight.end_offset, Some(10));
        assert!(insight.is_pending());

        let insight = PendingInsight::new("3014532003101", "packager_code", json!({"text": "x"}));
        assert_eq!(insight.start_offset, None);
        assert_eq!(insight.end_offset, None);
    }

    #[test]
    fn test_insert_get_round_trip() {
        let store = SqliteInsightStore::open_in_memory().unwrap();
        let insight = spellcheck_insight("3014532003101", 0, 5);

        store.insert(&insight).unwrap();
        let loaded = store.get(insight.id).unwrap().unwrap();

        assert_eq!(loaded.barcode, insight.barcode);
        assert_eq!(loaded.insight_type, insight.insight_type);
        assert_eq!(loaded.data, insight.data);
        assert_eq!(loaded.start_offset, Some(0));
        assert_eq!(loaded.end_offset, Some(5));
        assert_eq!(loaded.annotation, None);
    }

    #[test]
    fn test_get_missing() {
        let store = SqliteInsightStore::open_in_memory().unwrap();
        assert!(store.get(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_mark_annotated() {
        let store = SqliteInsightStore::open_in_memory().unwrap();
        let insight = spellcheck_insight("3014532003101", 0, 5);
        store.insert(&insight).unwrap();

        store.mark_annotated(insight.id, 1).unwrap();
        let loaded = store.get(insight.id).unwrap().unwrap();
        assert_eq!(loaded.annotation, Some(1));
        assert!(!loaded.is_pending());

        assert!(matches!(
            store.mark_annotated(Uuid::new_v4(), 1),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_shift_sibling_offsets() {
        let store = SqliteInsightStore::open_in_memory().unwrap();
        let a = spellcheck_insight("3014532003101", 0, 5);
        let b = spellcheck_insight("3014532003101", 20, 26);
        let c = spellcheck_insight("3014532003101", 10, 13);
        // Different product and different type: out of scope.
        let other_product = spellcheck_insight("20065034", 0, 5);
        let other_type = PendingInsight::new("3014532003101", "packager_code", json!({"text": "x"}));

        for insight in [&a, &b, &c, &other_product, &other_type] {
            store.insert(insight).unwrap();
        }

        let shifted = store
            .shift_sibling_offsets("3014532003101", "ingredient_spellcheck", c.id, 3)
            .unwrap();
        assert_eq!(shifted, 2);

        let a = store.get(a.id).unwrap().unwrap();
        let b = store.get(b.id).unwrap().unwrap();
        let c = store.get(c.id).unwrap().unwrap();
        assert_eq!((a.start_offset, a.end_offset), (Some(3), Some(8)));
        assert_eq!((b.start_offset, b.end_offset), (Some(23), Some(29)));
        assert_eq!((c.start_offset, c.end_offset), (Some(10), Some(13)));

        let other = store.get(other_product.id).unwrap().unwrap();
        assert_eq!(other.start_offset, Some(0));
    }

    #[test]
    fn test_shift_skips_already_annotated_siblings() {
        let store = SqliteInsightStore::open_in_memory().unwrap();
        let pending = spellcheck_insight("3014532003101", 0, 5);
        let annotated = spellcheck_insight("3014532003101", 8, 12);
        let accepted = spellcheck_insight("3014532003101", 30, 34);

        for insight in [&pending, &annotated, &accepted] {
            store.insert(insight).unwrap();
        }
        store.mark_annotated(annotated.id, 1).unwrap();

        let shifted = store
            .shift_sibling_offsets("3014532003101", "ingredient_spellcheck", accepted.id, -2)
            .unwrap();
        assert_eq!(shifted, 1);

        let pending = store.get(pending.id).unwrap().unwrap();
        assert_eq!((pending.start_offset, pending.end_offset), (Some(-2), Some(3)));

        let annotated = store.get(annotated.id).unwrap().unwrap();
        assert_eq!((annotated.start_offset, annotated.end_offset), (Some(8), Some(12)));
    }
}
