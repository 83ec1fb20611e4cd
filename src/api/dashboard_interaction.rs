use std::time::Instant;

use crate::core::AttributeId;
use crate::error::{SummaryError, SummaryResult};
use crate::interaction::InteractionCommand;

use super::Dashboard;

impl Dashboard {
    /// Applies a gesture command produced for attribute `id`.
    ///
    /// Returns whether dashboard state changed (scheduled commits count as
    /// unchanged until polled).
    pub fn apply_command(
        &mut self,
        id: AttributeId,
        command: InteractionCommand,
        now: Instant,
    ) -> SummaryResult<bool> {
        self.attribute(id)?;
        match command {
            InteractionCommand::None => Ok(false),
            InteractionCommand::ScheduleRange { min, max } => {
                let outcome = self.schedule_range_filter(id, min, max, now)?;
                Ok(matches!(outcome, super::CommitOutcome::Applied(true)))
            }
            InteractionCommand::SetRange { min, max } => self.set_range_filter(id, min, max),
            InteractionCommand::SetRangeFromAggregate(handle) => {
                if handle.attribute != id {
                    return Err(SummaryError::UnknownAggregate(handle.aggregate));
                }
                self.set_range_filter_from_aggregate(handle)
            }
            InteractionCommand::ClearFilter => self.clear_filter(id),
            InteractionCommand::Highlight(handle) => {
                self.on_aggregate_highlight(handle)?;
                Ok(true)
            }
            InteractionCommand::Leave => {
                let had_highlight = self.highlighted().is_some();
                self.on_aggregate_leave();
                Ok(had_highlight)
            }
            InteractionCommand::LockComparison { slot, min, max } => {
                Ok(self.lock_comparison(slot, id, min, max)?.is_some())
            }
        }
    }
}
