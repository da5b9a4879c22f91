//! Dispatch repository: create, import, fetch, list.
//!
//! Dispatches are created `pending`; status only moves through the
//! assignment engine afterwards.

use chrono::Utc;

use dispatch_core::entities::Dispatch;
use dispatch_core::enums::DispatchStatus;
use dispatch_core::ids::PREFIX_DISPATCH;

use crate::DispatchDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};

pub(crate) const SELECT_COLS: &str =
    "id, status, assigned_officer_id, assigned_vehicle_id, version, created_at, updated_at";

fn row_to_dispatch(row: &libsql::Row) -> Result<Dispatch, DatabaseError> {
    Ok(Dispatch {
        id: row.get(0)?,
        status: parse_enum(&row.get::<String>(1)?)?,
        assigned_officer_id: get_opt_string(row, 2)?,
        assigned_vehicle_id: get_opt_string(row, 3)?,
        version: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Fetch a dispatch on a specific connection or transaction.
pub(crate) async fn fetch_dispatch(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Dispatch>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM dispatches WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_dispatch(&row)?)),
        None => Ok(None),
    }
}

impl DispatchDb {
    /// Create a new `pending` dispatch with a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn create_dispatch(&self) -> Result<Dispatch, DatabaseError> {
        let now = Utc::now();
        let dispatch = Dispatch {
            id: self.generate_id(PREFIX_DISPATCH).await?,
            status: DispatchStatus::INITIAL,
            assigned_officer_id: None,
            assigned_vehicle_id: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        self.insert_dispatch(&dispatch).await?;
        Ok(dispatch)
    }

    /// Insert a dispatch created elsewhere, keeping its ID and fields.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the record breaks the
    /// officer invariant, or `DatabaseError` if the INSERT fails (e.g. the ID
    /// already exists).
    pub async fn insert_dispatch(&self, dispatch: &Dispatch) -> Result<(), DatabaseError> {
        if dispatch.status.requires_officer() && dispatch.assigned_officer_id.is_none() {
            return Err(DatabaseError::InvalidState(format!(
                "dispatch {} is {} but has no assigned officer",
                dispatch.id, dispatch.status
            )));
        }

        let _gate = self.write_guard().await;
        self.conn()
            .execute(
                &format!(
                    "INSERT INTO dispatches ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                libsql::params![
                    dispatch.id.as_str(),
                    dispatch.status.as_str(),
                    dispatch.assigned_officer_id.as_deref(),
                    dispatch.assigned_vehicle_id.as_deref(),
                    dispatch.version,
                    dispatch.created_at.to_rfc3339(),
                    dispatch.updated_at.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(dispatch_id = %dispatch.id, status = %dispatch.status, "inserted dispatch");
        Ok(())
    }

    /// Fetch a dispatch by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no dispatch has this ID.
    pub async fn get_dispatch(&self, id: &str) -> Result<Dispatch, DatabaseError> {
        let _gate = self.read_guard().await;
        fetch_dispatch(self.conn(), id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// List dispatches, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_dispatches(
        &self,
        status: Option<DispatchStatus>,
        limit: u32,
    ) -> Result<Vec<Dispatch>, DatabaseError> {
        let _gate = self.read_guard().await;
        let mut rows = match status {
            Some(status) => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM dispatches WHERE status = ?1
                             ORDER BY updated_at DESC LIMIT ?2"
                        ),
                        libsql::params![status.as_str(), limit],
                    )
                    .await?
            }
            None => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM dispatches ORDER BY updated_at DESC LIMIT ?1"
                        ),
                        libsql::params![limit],
                    )
                    .await?
            }
        };

        let mut dispatches = Vec::new();
        while let Some(row) = rows.next().await? {
            dispatches.push(row_to_dispatch(&row)?);
        }
        Ok(dispatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_db;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_dispatch_roundtrip() {
        let db = test_db().await;
        let created = db.create_dispatch().await.unwrap();

        assert!(created.id.starts_with("dsp-"));
        assert_eq!(created.status, DispatchStatus::Pending);
        assert_eq!(created.version, 0);

        let fetched = db.get_dispatch(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_dispatch() {
        let db = test_db().await;
        let result = db.get_dispatch("dsp-nope").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn insert_rejects_in_progress_without_officer() {
        let db = test_db().await;
        let mut dispatch = db.create_dispatch().await.unwrap();
        dispatch.id = "dsp-external".into();
        dispatch.status = DispatchStatus::InProgress;

        let result = db.insert_dispatch(&dispatch).await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn insert_duplicate_fails() {
        let db = test_db().await;
        let dispatch = db.create_dispatch().await.unwrap();
        assert!(db.insert_dispatch(&dispatch).await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let db = test_db().await;
        db.create_dispatch().await.unwrap();
        db.create_dispatch().await.unwrap();

        let now = Utc::now();
        db.insert_dispatch(&Dispatch {
            id: "dsp-closed01".into(),
            status: DispatchStatus::Completed,
            assigned_officer_id: Some("off-1".into()),
            assigned_vehicle_id: None,
            version: 2,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

        assert_eq!(db.list_dispatches(None, 10).await.unwrap().len(), 3);
        let pending = db
            .list_dispatches(Some(DispatchStatus::Pending), 10)
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|d| d.status == DispatchStatus::Pending));
    }
}
