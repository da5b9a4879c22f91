//! History replay.

use crate::entities::DispatchHistoryEntry;
use crate::enums::DispatchStatus;

/// Replay history entries (ordered by `seq`) starting from `initial`.
///
/// Returns `None` if an entry's `previous_status` does not match the status
/// reached so far, i.e. the log does not form a chain.
#[must_use]
pub fn replay<'a, I>(initial: DispatchStatus, entries: I) -> Option<DispatchStatus>
where
    I: IntoIterator<Item = &'a DispatchHistoryEntry>,
{
    entries.into_iter().try_fold(initial, |current, entry| {
        (entry.previous_status == current).then_some(entry.new_status)
    })
}
