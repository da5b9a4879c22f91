//! The assignment engine: validate, then read-decide-write with bounded
//! compare-and-swap retry under a request-scoped deadline.

use std::time::Duration;

use chrono::Utc;

use dispatch_config::EngineConfig;
use dispatch_core::assignment::{Decision, decide};
use dispatch_core::entities::Dispatch;
use dispatch_core::errors::AssignError;
use dispatch_core::requests::{AssignCommand, AssignRequest};

use crate::retry::RetryConfig;
use crate::store::{AssignmentStore, CommitOutcome};

/// Runs assignments against an [`AssignmentStore`].
///
/// The engine holds no locks of its own. Concurrent calls for the same
/// dispatch are arbitrated by the store's version check; the losers re-read
/// and re-decide.
pub struct AssignmentEngine<S> {
    store: S,
    retry: RetryConfig,
    request_timeout: Duration,
}

impl<S: AssignmentStore> AssignmentEngine<S> {
    #[must_use]
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            retry: RetryConfig::from(config),
            request_timeout: config.request_timeout(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Assign an officer (and optionally a vehicle) to a dispatch.
    ///
    /// Returns the dispatch as stored after the assignment. Re-issuing an
    /// assignment that is already in effect returns the stored record without
    /// writing anything.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a required identifier is missing or blank; the
    ///   store is not touched.
    /// - `NotFound` if the dispatch or the requested vehicle does not exist.
    /// - `InvalidTransition` if the dispatch is `completed` or `cancelled`.
    /// - `Conflict` if every attempt lost a concurrent write.
    /// - `Timeout` if the whole operation exceeds the configured deadline.
    /// - `Upstream` if the store fails.
    pub async fn assign(&self, request: &AssignRequest) -> Result<Dispatch, AssignError> {
        let cmd = request.validate()?;

        if let Ok(result) = tokio::time::timeout(self.request_timeout, self.run(&cmd)).await {
            result
        } else {
            let timeout_ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(dispatch_id = %cmd.dispatch_id, timeout_ms, "assignment timed out");
            Err(AssignError::Timeout { timeout_ms })
        }
    }

    async fn run(&self, cmd: &AssignCommand) -> Result<Dispatch, AssignError> {
        let mut attempt = 1;
        loop {
            let current = self
                .store
                .load_dispatch(&cmd.dispatch_id)
                .await?
                .ok_or_else(|| AssignError::dispatch_not_found(&cmd.dispatch_id))?;

            let plan = match decide(&current, cmd, Utc::now())? {
                Decision::Unchanged => {
                    tracing::debug!(dispatch_id = %current.id, "assignment already in effect");
                    return Ok(current);
                }
                Decision::Apply(plan) => plan,
            };
            tracing::debug!(
                dispatch_id = %plan.dispatch_id,
                from = %plan.previous_status,
                to = %plan.new_status,
                expected_version = plan.expected_version,
                attempt,
                "decided assignment"
            );

            if let Some(vehicle_id) = &plan.vehicle_id
                && self.store.load_vehicle(vehicle_id).await?.is_none()
            {
                return Err(AssignError::vehicle_not_found(vehicle_id));
            }

            match self.store.commit_assignment(&plan).await? {
                CommitOutcome::Committed(dispatch) => {
                    tracing::info!(
                        dispatch_id = %dispatch.id,
                        officer_id = %plan.officer_id,
                        vehicle_id = ?plan.vehicle_id,
                        actor = %plan.actor_user_id,
                        version = dispatch.version,
                        "dispatch assigned"
                    );
                    return Ok(dispatch);
                }
                CommitOutcome::VehicleMissing(vehicle_id) => {
                    return Err(AssignError::vehicle_not_found(vehicle_id));
                }
                CommitOutcome::Stale => {}
            }

            if !self.retry.has_attempt_after(attempt) {
                tracing::warn!(
                    dispatch_id = %cmd.dispatch_id,
                    attempts = attempt,
                    "giving up after repeated concurrent modification"
                );
                return Err(AssignError::Conflict {
                    id: cmd.dispatch_id.clone(),
                    attempts: attempt,
                });
            }

            let delay = self.retry.delay_after(attempt);
            tracing::warn!(
                dispatch_id = %cmd.dispatch_id,
                attempt,
                max_attempts = self.retry.max_attempts,
                ?delay,
                "dispatch changed concurrently, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
