//! Offline sync reconciler: health records queued on devices while offline.
//!
//! Each draft carries a client-local offline id. A draft whose offline id is
//! already stored is skipped, so re-submitting a batch is harmless. Drafts
//! with no usable offline id cannot be deduplicated and are rejected.
//!
//! The whole batch runs in one transaction: either every new record of the
//! batch is persisted or none is.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError, Store};
use crate::models::{HealthRecord, HealthRecordCreate};

/// Result of reconciling one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub synced_count: usize,
    /// Newly stored records, in batch order.
    pub records: Vec<HealthRecord>,
    /// Offline ids that were already on the server.
    pub already_synced: Vec<String>,
    /// Batch indices of drafts without an offline id.
    pub rejected: Vec<usize>,
}

/// Reconcile a batch against the store inside a single transaction.
pub fn sync_health_records(
    store: &Store,
    drafts: Vec<HealthRecordCreate>,
) -> Result<SyncOutcome, DatabaseError> {
    store.with_transaction(|conn| reconcile(conn, drafts))
}

fn reconcile(
    conn: &Connection,
    drafts: Vec<HealthRecordCreate>,
) -> Result<SyncOutcome, DatabaseError> {
    let mut outcome = SyncOutcome::default();

    for (index, draft) in drafts.into_iter().enumerate() {
        let Some(offline_id) = draft.offline_key().map(str::to_string) else {
            outcome.rejected.push(index);
            continue;
        };

        let mut record = HealthRecord::from_create(draft);
        record.is_synced = true;

        // INSERT OR IGNORE against the unique offline_id index
        if db::insert_health_record_if_absent(conn, &record)? {
            outcome.records.push(record);
        } else {
            outcome.already_synced.push(offline_id);
        }
    }

    outcome.synced_count = outcome.records.len();

    if !outcome.rejected.is_empty() {
        tracing::warn!(
            rejected = outcome.rejected.len(),
            "Sync batch contained drafts without an offline id"
        );
    }
    tracing::info!(
        synced = outcome.synced_count,
        skipped = outcome.already_synced.len(),
        "Health record sync complete"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordType;

    fn draft(offline_id: Option<&str>) -> HealthRecordCreate {
        HealthRecordCreate {
            user_id: "u1".into(),
            record_type: RecordType::Vitals,
            title: "BP reading".into(),
            description: "128/84".into(),
            doctor_name: None,
            medications: vec![],
            attachments: vec![],
            is_synced: false,
            offline_id: offline_id.map(str::to_string),
        }
    }

    fn stored_count(store: &Store) -> usize {
        store
            .with_conn(|conn| db::list_health_records(conn, "u1"))
            .unwrap()
            .len()
    }

    #[test]
    fn new_drafts_are_stored_and_marked_synced() {
        let store = Store::in_memory().unwrap();
        let outcome =
            sync_health_records(&store, vec![draft(Some("dev-1")), draft(Some("dev-2"))]).unwrap();

        assert_eq!(outcome.synced_count, 2);
        assert!(outcome.records.iter().all(|r| r.is_synced));
        assert_eq!(outcome.records[0].offline_id.as_deref(), Some("dev-1"));
        assert!(outcome.already_synced.is_empty());
        assert_eq!(stored_count(&store), 2);
    }

    #[test]
    fn resubmitting_a_batch_is_idempotent() {
        let store = Store::in_memory().unwrap();
        let batch = || vec![draft(Some("dev-1")), draft(Some("dev-2"))];

        sync_health_records(&store, batch()).unwrap();
        let second = sync_health_records(&store, batch()).unwrap();

        assert_eq!(second.synced_count, 0);
        assert!(second.records.is_empty());
        assert_eq!(second.already_synced, vec!["dev-1", "dev-2"]);
        assert_eq!(stored_count(&store), 2);
    }

    #[test]
    fn duplicate_within_one_batch_is_stored_once() {
        let store = Store::in_memory().unwrap();
        let outcome =
            sync_health_records(&store, vec![draft(Some("dev-1")), draft(Some("dev-1"))]).unwrap();

        assert_eq!(outcome.synced_count, 1);
        assert_eq!(outcome.already_synced, vec!["dev-1"]);
        assert_eq!(stored_count(&store), 1);
    }

    #[test]
    fn drafts_without_offline_id_are_rejected_by_index() {
        let store = Store::in_memory().unwrap();
        let outcome = sync_health_records(
            &store,
            vec![draft(None), draft(Some("dev-1")), draft(Some("  "))],
        )
        .unwrap();

        assert_eq!(outcome.rejected, vec![0, 2]);
        assert_eq!(outcome.synced_count, 1);
        assert_eq!(stored_count(&store), 1);
    }

    #[test]
    fn offline_id_is_trimmed_before_dedup() {
        let store = Store::in_memory().unwrap();
        sync_health_records(&store, vec![draft(Some("dev-1"))]).unwrap();
        let outcome = sync_health_records(&store, vec![draft(Some(" dev-1 "))]).unwrap();
        assert_eq!(outcome.synced_count, 0);
        assert_eq!(outcome.already_synced, vec!["dev-1"]);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let store = Store::in_memory().unwrap();
        let outcome = sync_health_records(&store, vec![]).unwrap();
        assert_eq!(outcome, SyncOutcome::default());
    }

    #[test]
    fn store_failure_mid_batch_persists_nothing() {
        let store = Store::in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_bad_draft BEFORE INSERT ON health_records
                     WHEN NEW.offline_id = 'dev-bad'
                     BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                )?;
                Ok(())
            })
            .unwrap();

        let result = sync_health_records(
            &store,
            vec![draft(Some("dev-1")), draft(Some("dev-bad")), draft(Some("dev-3"))],
        );

        assert!(result.is_err());
        assert_eq!(stored_count(&store), 0);

        // the same store keeps working once the bad draft is gone
        let outcome = sync_health_records(&store, vec![draft(Some("dev-1"))]).unwrap();
        assert_eq!(outcome.synced_count, 1);
        assert_eq!(stored_count(&store), 1);
    }
}
