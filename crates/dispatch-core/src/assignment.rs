//! The assignment decision.
//!
//! `decide` is the pure "decide" step of read-decide-write: given the
//! dispatch as read and a validated command, it either reports that nothing
//! needs writing, produces an `AssignmentPlan` for the store to commit under
//! compare-and-swap, or rejects the transition.

use chrono::{DateTime, Utc};

use crate::entities::Dispatch;
use crate::enums::DispatchStatus;
use crate::errors::AssignError;
use crate::requests::AssignCommand;

/// Everything the store needs to commit one assignment atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub dispatch_id: String,
    /// Version observed at read time. The write only applies if unchanged.
    pub expected_version: i64,
    pub previous_status: DispatchStatus,
    pub new_status: DispatchStatus,
    pub officer_id: String,
    /// Vehicle named by the request. Only this one is marked on-route.
    pub vehicle_id: Option<String>,
    /// Vehicle the dispatch carries after the commit: the requested one, or
    /// the current one when the request names none.
    pub assigned_vehicle_id: Option<String>,
    /// Previously assigned vehicle being replaced by a different one.
    pub released_vehicle_id: Option<String>,
    pub actor_user_id: String,
    pub at: DateTime<Utc>,
}

impl AssignmentPlan {
    /// Version the dispatch will carry once this plan is committed.
    #[must_use]
    pub const fn next_version(&self) -> i64 {
        self.expected_version + 1
    }

    #[must_use]
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.new_status
    }

    /// The dispatch record as it reads after this plan commits.
    #[must_use]
    pub fn applied_to(&self, current: &Dispatch) -> Dispatch {
        Dispatch {
            status: self.new_status,
            assigned_officer_id: Some(self.officer_id.clone()),
            assigned_vehicle_id: self.assigned_vehicle_id.clone(),
            version: self.next_version(),
            updated_at: self.at,
            ..current.clone()
        }
    }
}

/// Outcome of the decision step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Already assigned as requested; nothing to write.
    Unchanged,
    /// Commit this plan.
    Apply(AssignmentPlan),
}

/// Decide what an assignment does to `current`.
///
/// # Errors
///
/// Returns `AssignError::InvalidTransition` if `current` is terminal or
/// otherwise cannot move to `in-progress`.
pub fn decide(
    current: &Dispatch,
    cmd: &AssignCommand,
    now: DateTime<Utc>,
) -> Result<Decision, AssignError> {
    let target = DispatchStatus::InProgress;
    let invalid = || AssignError::InvalidTransition {
        id: current.id.clone(),
        from: current.status,
        to: target,
    };

    if current.status.is_terminal() {
        return Err(invalid());
    }

    if current.status == target {
        if current.has_assignment(&cmd.officer_id, cmd.vehicle_id.as_deref()) {
            return Ok(Decision::Unchanged);
        }
    } else if !current.status.can_transition_to(target) {
        return Err(invalid());
    }

    let released_vehicle_id = current
        .assigned_vehicle_id
        .clone()
        .filter(|prev| cmd.vehicle_id.as_ref().is_some_and(|next| next != prev));
    let assigned_vehicle_id = cmd
        .vehicle_id
        .clone()
        .or_else(|| current.assigned_vehicle_id.clone());

    Ok(Decision::Apply(AssignmentPlan {
        dispatch_id: current.id.clone(),
        expected_version: current.version,
        previous_status: current.status,
        new_status: target,
        officer_id: cmd.officer_id.clone(),
        vehicle_id: cmd.vehicle_id.clone(),
        assigned_vehicle_id,
        released_vehicle_id,
        actor_user_id: cmd.actor_user_id.clone(),
        at: now,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn dispatch(status: DispatchStatus, officer: Option<&str>, vehicle: Option<&str>) -> Dispatch {
        let at = Utc::now();
        Dispatch {
            id: "dsp-00000001".into(),
            status,
            assigned_officer_id: officer.map(String::from),
            assigned_vehicle_id: vehicle.map(String::from),
            version: 3,
            created_at: at,
            updated_at: at,
        }
    }

    fn command(officer: &str, vehicle: Option<&str>) -> AssignCommand {
        AssignCommand {
            dispatch_id: "dsp-00000001".into(),
            officer_id: officer.into(),
            vehicle_id: vehicle.map(String::from),
            actor_user_id: "user_dispatcher".into(),
        }
    }

    #[test]
    fn pending_moves_to_in_progress() {
        let current = dispatch(DispatchStatus::Pending, None, None);
        let now = Utc::now();
        let Decision::Apply(plan) = decide(&current, &command("off-1", Some("veh-1")), now).unwrap()
        else {
            panic!("expected a plan");
        };

        assert_eq!(plan.previous_status, DispatchStatus::Pending);
        assert_eq!(plan.new_status, DispatchStatus::InProgress);
        assert_eq!(plan.expected_version, 3);
        assert_eq!(plan.released_vehicle_id, None);
        assert!(plan.status_changed());

        let after = plan.applied_to(&current);
        assert_eq!(after.status, DispatchStatus::InProgress);
        assert_eq!(after.assigned_officer_id.as_deref(), Some("off-1"));
        assert_eq!(after.assigned_vehicle_id.as_deref(), Some("veh-1"));
        assert_eq!(after.version, 4);
        assert_eq!(after.updated_at, now);
        assert_eq!(after.created_at, current.created_at);
    }

    #[test]
    fn identical_assignment_is_unchanged() {
        let current = dispatch(DispatchStatus::InProgress, Some("off-1"), Some("veh-1"));
        let decision = decide(&current, &command("off-1", Some("veh-1")), Utc::now()).unwrap();
        assert_eq!(decision, Decision::Unchanged);
    }

    #[test]
    fn reassignment_releases_previous_vehicle() {
        let current = dispatch(DispatchStatus::InProgress, Some("off-1"), Some("veh-1"));
        let Decision::Apply(plan) =
            decide(&current, &command("off-2", Some("veh-2")), Utc::now()).unwrap()
        else {
            panic!("expected a plan");
        };
        assert!(!plan.status_changed());
        assert_eq!(plan.released_vehicle_id.as_deref(), Some("veh-1"));
    }

    #[test]
    fn same_officer_without_vehicle_is_unchanged() {
        let current = dispatch(DispatchStatus::InProgress, Some("off-1"), Some("veh-1"));
        let decision = decide(&current, &command("off-1", None), Utc::now()).unwrap();
        assert_eq!(decision, Decision::Unchanged);
    }

    #[test]
    fn same_officer_new_vehicle_is_a_reassignment() {
        let current = dispatch(DispatchStatus::InProgress, Some("off-1"), Some("veh-1"));
        let decision = decide(&current, &command("off-1", Some("veh-2")), Utc::now()).unwrap();
        let Decision::Apply(plan) = decision else {
            panic!("expected a plan");
        };
        assert_eq!(plan.vehicle_id.as_deref(), Some("veh-2"));
        assert_eq!(plan.assigned_vehicle_id.as_deref(), Some("veh-2"));
        assert_eq!(plan.released_vehicle_id.as_deref(), Some("veh-1"));
    }

    #[test]
    fn new_officer_without_vehicle_keeps_current_vehicle() {
        let current = dispatch(DispatchStatus::InProgress, Some("off-1"), Some("veh-1"));
        let Decision::Apply(plan) = decide(&current, &command("off-2", None), Utc::now()).unwrap()
        else {
            panic!("expected a plan");
        };
        assert_eq!(plan.vehicle_id, None);
        assert_eq!(plan.released_vehicle_id, None);
        assert_eq!(
            plan.applied_to(&current).assigned_vehicle_id.as_deref(),
            Some("veh-1")
        );
    }

    #[rstest]
    #[case(DispatchStatus::Completed)]
    #[case(DispatchStatus::Cancelled)]
    fn terminal_dispatch_is_rejected(#[case] status: DispatchStatus) {
        let current = dispatch(status, Some("off-1"), None);
        let err = decide(&current, &command("off-1", None), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            AssignError::InvalidTransition {
                id: "dsp-00000001".into(),
                from: status,
                to: DispatchStatus::InProgress,
            }
        );
    }
}
