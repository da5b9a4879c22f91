//! The storage seam under the assignment engine.
//!
//! [`AssignmentStore`] is the narrow interface the engine needs: two reads
//! and one atomic commit. [`LibsqlStore`] is the production implementation.
//! Tests substitute counting or racing stores to observe what the engine
//! does without a database in the way.

use std::future::Future;
use std::sync::Arc;

use libsql::TransactionBehavior;

use dispatch_core::assignment::AssignmentPlan;
use dispatch_core::entities::{Dispatch, Vehicle};
use dispatch_core::enums::VehicleStatus;
use dispatch_core::ids::PREFIX_HISTORY;

use crate::error::DatabaseError;
use crate::helpers::is_lock_contention;
use crate::repos::dispatch::fetch_dispatch;
use crate::repos::vehicle::fetch_vehicle;
use crate::{DispatchDb, generate_id};

/// Result of trying to commit an [`AssignmentPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Everything was written; the dispatch as stored after the commit.
    Committed(Dispatch),
    /// The dispatch changed since it was read, or another writer held the
    /// lock. Nothing was written.
    Stale,
    /// The requested vehicle does not exist. Nothing was written.
    VehicleMissing(String),
}

/// Reads and the single atomic write the assignment engine depends on.
pub trait AssignmentStore: Send + Sync {
    fn load_dispatch(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Dispatch>, DatabaseError>> + Send;

    fn load_vehicle(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Vehicle>, DatabaseError>> + Send;

    /// Apply `plan` in full or not at all.
    ///
    /// Implementations must only write if the dispatch version still equals
    /// `plan.expected_version`, and must report [`CommitOutcome::Stale`]
    /// otherwise.
    fn commit_assignment(
        &self,
        plan: &AssignmentPlan,
    ) -> impl Future<Output = Result<CommitOutcome, DatabaseError>> + Send;
}

/// [`AssignmentStore`] backed by a [`DispatchDb`].
///
/// Each commit runs in one `IMMEDIATE` transaction: version-checked dispatch
/// UPDATE, history INSERT, vehicle UPDATEs.
#[derive(Clone)]
pub struct LibsqlStore {
    db: Arc<DispatchDb>,
    #[cfg(test)]
    fail_before_vehicle_write: bool,
}

impl LibsqlStore {
    #[must_use]
    pub const fn new(db: Arc<DispatchDb>) -> Self {
        Self {
            db,
            #[cfg(test)]
            fail_before_vehicle_write: false,
        }
    }

    #[must_use]
    pub fn db(&self) -> &DispatchDb {
        &self.db
    }
}

impl AssignmentStore for LibsqlStore {
    async fn load_dispatch(&self, id: &str) -> Result<Option<Dispatch>, DatabaseError> {
        let _gate = self.db.read_guard().await;
        fetch_dispatch(self.db.conn(), id).await
    }

    async fn load_vehicle(&self, id: &str) -> Result<Option<Vehicle>, DatabaseError> {
        let _gate = self.db.read_guard().await;
        fetch_vehicle(self.db.conn(), id).await
    }

    async fn commit_assignment(
        &self,
        plan: &AssignmentPlan,
    ) -> Result<CommitOutcome, DatabaseError> {
        let _gate = self.db.write_guard().await;
        let conn = self.db.connect_scoped().await?;

        let tx = match conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
        {
            Ok(tx) => tx,
            Err(e) if is_lock_contention(&e) => {
                tracing::debug!(dispatch_id = %plan.dispatch_id, error = %e, "write lock busy");
                return Ok(CommitOutcome::Stale);
            }
            Err(e) => return Err(e.into()),
        };

        match self.apply_plan(&tx, plan).await {
            Ok(CommitOutcome::Committed(dispatch)) => match tx.commit().await {
                Ok(()) => {
                    tracing::debug!(
                        dispatch_id = %dispatch.id,
                        version = dispatch.version,
                        "assignment committed"
                    );
                    Ok(CommitOutcome::Committed(dispatch))
                }
                Err(e) if is_lock_contention(&e) => Ok(CommitOutcome::Stale),
                Err(e) => Err(e.into()),
            },
            Ok(outcome) => {
                tx.rollback().await?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback after failed commit");
                }
                match err {
                    DatabaseError::LibSql(ref e) if is_lock_contention(e) => {
                        Ok(CommitOutcome::Stale)
                    }
                    other => Err(other),
                }
            }
        }
    }
}

impl LibsqlStore {
    async fn apply_plan(
        &self,
        conn: &libsql::Connection,
        plan: &AssignmentPlan,
    ) -> Result<CommitOutcome, DatabaseError> {
        if let Some(vehicle_id) = &plan.vehicle_id
            && fetch_vehicle(conn, vehicle_id).await?.is_none()
        {
            return Ok(CommitOutcome::VehicleMissing(vehicle_id.clone()));
        }

        let at = plan.at.to_rfc3339();

        let updated = conn
            .execute(
                "UPDATE dispatches
                 SET status = ?1, assigned_officer_id = ?2, assigned_vehicle_id = ?3,
                     version = version + 1, updated_at = ?4
                 WHERE id = ?5 AND version = ?6",
                libsql::params![
                    plan.new_status.as_str(),
                    plan.officer_id.as_str(),
                    plan.assigned_vehicle_id.as_deref(),
                    at.as_str(),
                    plan.dispatch_id.as_str(),
                    plan.expected_version
                ],
            )
            .await?;
        if updated == 0 {
            return Ok(CommitOutcome::Stale);
        }

        let entry_id = generate_id(conn, PREFIX_HISTORY).await?;
        conn.execute(
            "INSERT INTO dispatch_history (id, dispatch_id, seq, user_id, previous_status,
                 new_status, officer_id, vehicle_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                entry_id.as_str(),
                plan.dispatch_id.as_str(),
                plan.next_version(),
                plan.actor_user_id.as_str(),
                plan.previous_status.as_str(),
                plan.new_status.as_str(),
                plan.officer_id.as_str(),
                plan.assigned_vehicle_id.as_deref(),
                at.as_str()
            ],
        )
        .await?;

        self.injected_fault()?;

        if let Some(vehicle_id) = &plan.vehicle_id {
            let marked = conn
                .execute(
                    "UPDATE vehicles SET status = ?1, updated_at = ?2 WHERE id = ?3",
                    libsql::params![
                        VehicleStatus::OnRoute.as_str(),
                        at.as_str(),
                        vehicle_id.as_str()
                    ],
                )
                .await?;
            if marked == 0 {
                return Ok(CommitOutcome::VehicleMissing(vehicle_id.clone()));
            }
        }

        if let Some(released) = &plan.released_vehicle_id {
            conn.execute(
                "UPDATE vehicles SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND status = ?4
                   AND NOT EXISTS (
                       SELECT 1 FROM dispatches
                       WHERE assigned_vehicle_id = ?3 AND status = 'in-progress'
                   )",
                libsql::params![
                    VehicleStatus::Available.as_str(),
                    at.as_str(),
                    released.as_str(),
                    VehicleStatus::OnRoute.as_str()
                ],
            )
            .await?;
        }

        let dispatch = fetch_dispatch(conn, &plan.dispatch_id)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        Ok(CommitOutcome::Committed(dispatch))
    }

    #[cfg(test)]
    fn injected_fault(&self) -> Result<(), DatabaseError> {
        if self.fail_before_vehicle_write {
            return Err(DatabaseError::Query(
                "injected failure before vehicle write".into(),
            ));
        }
        Ok(())
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    const fn injected_fault(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
