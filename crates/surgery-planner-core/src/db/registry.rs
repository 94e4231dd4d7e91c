//! Non-operable case database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Case;
use crate::registry::{NonOperableEntry, RegistryStore};

/// Raw row before the case JSON is decoded.
struct EntryRow {
    case_json: String,
    reason: String,
    registered_at: String,
}

impl EntryRow {
    fn into_entry(self) -> DbResult<NonOperableEntry> {
        let case: Case = serde_json::from_str(&self.case_json)?;
        Ok(NonOperableEntry {
            case,
            reason: self.reason,
            registered_at: self.registered_at,
        })
    }
}

impl Database {
    /// Insert or replace a non-operable entry.
    pub fn upsert_non_operable(&self, entry: &NonOperableEntry) -> DbResult<()> {
        let case_json = serde_json::to_string(&entry.case)?;

        self.conn.execute(
            r#"
            INSERT INTO non_operable_cases (case_id, case_json, reason, registered_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            ON CONFLICT(case_id) DO UPDATE SET
                case_json = excluded.case_json,
                reason = excluded.reason,
                registered_at = excluded.registered_at,
                updated_at = datetime('now')
            "#,
            params![entry.case.id, case_json, entry.reason, entry.registered_at],
        )?;
        Ok(())
    }

    /// Get a non-operable entry by case ID.
    pub fn get_non_operable(&self, case_id: i64) -> DbResult<Option<NonOperableEntry>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT case_json, reason, registered_at
                FROM non_operable_cases
                WHERE case_id = ?
                "#,
                [case_id],
                |row| {
                    Ok(EntryRow {
                        case_json: row.get(0)?,
                        reason: row.get(1)?,
                        registered_at: row.get(2)?,
                    })
                },
            )
            .optional()?;

        row.map(EntryRow::into_entry).transpose()
    }

    /// Delete a non-operable entry. Returns whether a row was removed.
    pub fn delete_non_operable(&self, case_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM non_operable_cases WHERE case_id = ?", [case_id])?;
        Ok(rows_affected > 0)
    }

    /// List all non-operable entries ordered by case ID.
    pub fn list_non_operable(&self) -> DbResult<Vec<NonOperableEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT case_json, reason, registered_at
            FROM non_operable_cases
            ORDER BY case_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(EntryRow {
                case_json: row.get(0)?,
                reason: row.get(1)?,
                registered_at: row.get(2)?,
            })
        })?;

        rows.map(|row| row?.into_entry()).collect()
    }
}

impl RegistryStore for Database {
    fn upsert(&mut self, entry: NonOperableEntry) -> DbResult<()> {
        self.upsert_non_operable(&entry)
    }

    fn get(&self, case_id: i64) -> DbResult<Option<NonOperableEntry>> {
        self.get_non_operable(case_id)
    }

    fn remove(&mut self, case_id: i64) -> DbResult<Option<NonOperableEntry>> {
        let tx = self.conn.transaction()?;
        let row = tx
            .query_row(
                "SELECT case_json, reason, registered_at FROM non_operable_cases WHERE case_id = ?",
                [case_id],
                |row| {
                    Ok(EntryRow {
                        case_json: row.get(0)?,
                        reason: row.get(1)?,
                        registered_at: row.get(2)?,
                    })
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };
        let entry = row.into_entry()?;

        tx.execute("DELETE FROM non_operable_cases WHERE case_id = ?", [case_id])?;
        tx.commit()?;
        Ok(Some(entry))
    }

    fn list(&self) -> DbResult<Vec<NonOperableEntry>> {
        self.list_non_operable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Medication;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn entry(id: i64, reason: &str) -> NonOperableEntry {
        NonOperableEntry {
            case: Case {
                id,
                urgency: 2,
                time_since_injury: 1,
                functional_impact: 1,
                patient_condition: 0,
                medication: Medication::Warfarina,
                last_medication_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                delay_days: 1,
                surgery_type: 1,
                operating_room: 0,
                condition_reason: Some(reason.to_string()),
            },
            reason: reason.to_string(),
            registered_at: "2024-01-06T08:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let db = setup_db();
        db.upsert_non_operable(&entry(7, "INR elevado")).unwrap();

        let retrieved = db.get_non_operable(7).unwrap().unwrap();
        assert_eq!(retrieved.reason, "INR elevado");
        assert_eq!(retrieved.case.medication, Medication::Warfarina);
        assert_eq!(retrieved, entry(7, "INR elevado"));
    }

    #[test]
    fn test_upsert_overwrites() {
        let db = setup_db();
        db.upsert_non_operable(&entry(7, "first")).unwrap();
        db.upsert_non_operable(&entry(7, "second")).unwrap();

        let all = db.list_non_operable().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].reason, "second");
    }

    #[test]
    fn test_delete() {
        let db = setup_db();
        db.upsert_non_operable(&entry(3, "fiebre")).unwrap();

        assert!(db.delete_non_operable(3).unwrap());
        assert!(!db.delete_non_operable(3).unwrap());
        assert!(db.get_non_operable(3).unwrap().is_none());
    }

    #[test]
    fn test_list_ordered_by_id() {
        let db = setup_db();
        for id in [12, 4, 8] {
            db.upsert_non_operable(&entry(id, "hold")).unwrap();
        }

        let ids: Vec<i64> = db
            .list_non_operable()
            .unwrap()
            .iter()
            .map(|e| e.case.id)
            .collect();
        assert_eq!(ids, vec![4, 8, 12]);
    }

    #[test]
    fn test_store_remove_returns_entry() {
        let mut db = setup_db();
        RegistryStore::upsert(&mut db, entry(5, "anemia")).unwrap();

        let removed = RegistryStore::remove(&mut db, 5).unwrap().unwrap();
        assert_eq!(removed.case.id, 5);
        assert!(RegistryStore::remove(&mut db, 5).unwrap().is_none());
    }
}
