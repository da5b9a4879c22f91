//! Dispatch history repository (read-only).
//!
//! History rows are only ever written by the assignment commit, inside the
//! same transaction as the dispatch update. The schema's triggers reject
//! UPDATE and DELETE.

use dispatch_core::entities::DispatchHistoryEntry;
use dispatch_core::enums::DispatchStatus;
use dispatch_core::history::replay;
use dispatch_core::responses::DispatchHistoryResponse;

use crate::DispatchDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};

pub(crate) const SELECT_COLS: &str = "id, dispatch_id, seq, user_id, previous_status, new_status, \
     officer_id, vehicle_id, created_at";

fn row_to_entry(row: &libsql::Row) -> Result<DispatchHistoryEntry, DatabaseError> {
    Ok(DispatchHistoryEntry {
        id: row.get(0)?,
        dispatch_id: row.get(1)?,
        seq: row.get(2)?,
        user_id: row.get(3)?,
        previous_status: parse_enum(&row.get::<String>(4)?)?,
        new_status: parse_enum(&row.get::<String>(5)?)?,
        officer_id: get_opt_string(row, 6)?,
        vehicle_id: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl DispatchDb {
    /// History for one dispatch, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_history(
        &self,
        dispatch_id: &str,
    ) -> Result<Vec<DispatchHistoryEntry>, DatabaseError> {
        let _gate = self.read_guard().await;
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM dispatch_history
                     WHERE dispatch_id = ?1 ORDER BY seq"
                ),
                [dispatch_id],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// The dispatch's current status alongside its replayed history.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the dispatch does not exist.
    pub async fn history_view(
        &self,
        dispatch_id: &str,
    ) -> Result<DispatchHistoryResponse, DatabaseError> {
        let dispatch = self.get_dispatch(dispatch_id).await?;
        let entries = self.list_history(dispatch_id).await?;
        let replayed_status = replay(DispatchStatus::INITIAL, &entries);

        if replayed_status != Some(dispatch.status) {
            tracing::warn!(
                dispatch_id,
                current = %dispatch.status,
                replayed = ?replayed_status,
                "history does not replay to current status"
            );
        }

        Ok(DispatchHistoryResponse {
            dispatch_id: dispatch.id,
            current_status: dispatch.status,
            replayed_status,
            entries,
        })
    }
}
