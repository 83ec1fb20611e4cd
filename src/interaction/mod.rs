//! Pointer gestures on one attribute histogram, translated into dashboard commands.
//!
//! The controller is pure state: it never touches the dashboard. Hosts feed
//! it pointer events and hand the returned commands to
//! `Dashboard::apply_command`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{AggregateHandle, ValueScale};

/// Minimum horizontal travel that turns a press into a drag.
pub const DEFAULT_MIN_DRAG_PX: f64 = 3.0;

/// What a drag started with this modifier edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PointerModifier {
    /// Plain drag edits the range filter.
    #[default]
    None,
    /// Modified drag locks a comparison slot.
    Compare { slot: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging {
        modifier: PointerModifier,
        anchor_px: f64,
        current_px: f64,
    },
}

/// Dashboard mutation requested by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionCommand {
    None,
    /// Drag in progress; committed after the idle delay.
    ScheduleRange { min: f64, max: f64 },
    /// Drag released; committed immediately.
    SetRange { min: f64, max: f64 },
    SetRangeFromAggregate(AggregateHandle),
    ClearFilter,
    Highlight(AggregateHandle),
    Leave,
    LockComparison { slot: u8, min: f64, max: f64 },
}

/// Gesture state machine for one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionController {
    mode: InteractionMode,
    scale: Option<ValueScale>,
    min_drag_px: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            scale: None,
            min_drag_px: DEFAULT_MIN_DRAG_PX,
        }
    }
}

impl InteractionController {
    #[must_use]
    pub fn new(scale: ValueScale) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_min_drag_px(mut self, min_drag_px: f64) -> Self {
        self.min_drag_px = min_drag_px.max(0.0);
        self
    }

    /// Scale must follow every rebinning of the attribute.
    pub fn set_scale(&mut self, scale: Option<ValueScale>) {
        self.scale = scale;
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, InteractionMode::Dragging { .. })
    }

    pub fn on_pointer_down(&mut self, x: f64, modifier: PointerModifier) {
        if !x.is_finite() {
            return;
        }
        self.mode = InteractionMode::Dragging {
            modifier,
            anchor_px: x,
            current_px: x,
        };
    }

    #[must_use]
    pub fn on_pointer_move(&mut self, x: f64) -> InteractionCommand {
        let InteractionMode::Dragging {
            modifier,
            anchor_px,
            ..
        } = self.mode
        else {
            return InteractionCommand::None;
        };
        if !x.is_finite() {
            return InteractionCommand::None;
        }
        self.mode = InteractionMode::Dragging {
            modifier,
            anchor_px,
            current_px: x,
        };
        if modifier != PointerModifier::None || (x - anchor_px).abs() < self.min_drag_px {
            return InteractionCommand::None;
        }
        match self.span_values(anchor_px, x) {
            Some((min, max)) => InteractionCommand::ScheduleRange { min, max },
            None => InteractionCommand::None,
        }
    }

    /// Ends a drag. Travel under the drag threshold counts as a click and
    /// yields no command; aggregate clicks arrive via [`Self::on_click_aggregate`].
    #[must_use]
    pub fn on_pointer_up(&mut self, x: f64) -> InteractionCommand {
        let InteractionMode::Dragging {
            modifier,
            anchor_px,
            current_px,
        } = std::mem::replace(&mut self.mode, InteractionMode::Idle)
        else {
            return InteractionCommand::None;
        };
        let end_px = if x.is_finite() { x } else { current_px };
        if (end_px - anchor_px).abs() < self.min_drag_px {
            return InteractionCommand::None;
        }
        let Some((min, max)) = self.span_values(anchor_px, end_px) else {
            return InteractionCommand::None;
        };
        trace!(min, max, ?modifier, "drag released");
        match modifier {
            PointerModifier::None => InteractionCommand::SetRange { min, max },
            PointerModifier::Compare { slot } => InteractionCommand::LockComparison { slot, min, max },
        }
    }

    pub fn cancel_drag(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    #[must_use]
    pub fn on_click_aggregate(&self, handle: AggregateHandle) -> InteractionCommand {
        InteractionCommand::SetRangeFromAggregate(handle)
    }

    #[must_use]
    pub fn on_hover_aggregate(&self, handle: AggregateHandle) -> InteractionCommand {
        if self.is_dragging() {
            return InteractionCommand::None;
        }
        InteractionCommand::Highlight(handle)
    }

    #[must_use]
    pub fn on_leave(&self) -> InteractionCommand {
        InteractionCommand::Leave
    }

    #[must_use]
    pub fn on_double_click(&mut self) -> InteractionCommand {
        self.mode = InteractionMode::Idle;
        InteractionCommand::ClearFilter
    }

    fn span_values(&self, from_px: f64, to_px: f64) -> Option<(f64, f64)> {
        let scale = self.scale?;
        let width = scale.width_px();
        let a = scale.pixel_to_value(from_px.clamp(0.0, width)).ok()?;
        let b = scale.pixel_to_value(to_px.clamp(0.0, width)).ok()?;
        Some((a.min(b), a.max(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionCommand, InteractionController, PointerModifier};
    use crate::core::{ScaleType, ValueScale};

    fn controller() -> InteractionController {
        let scale = ValueScale::new(ScaleType::Linear, (0.0, 100.0), 200.0).expect("scale");
        InteractionController::new(scale)
    }

    #[test]
    fn drag_schedules_then_commits_range() {
        let mut controller = controller();
        controller.on_pointer_down(100.0, PointerModifier::None);
        assert_eq!(
            controller.on_pointer_move(40.0),
            InteractionCommand::ScheduleRange { min: 20.0, max: 50.0 }
        );
        assert_eq!(
            controller.on_pointer_up(20.0),
            InteractionCommand::SetRange { min: 10.0, max: 50.0 }
        );
        assert!(!controller.is_dragging());
    }

    #[test]
    fn short_travel_is_a_click() {
        let mut controller = controller();
        controller.on_pointer_down(50.0, PointerModifier::None);
        assert_eq!(controller.on_pointer_move(51.0), InteractionCommand::None);
        assert_eq!(controller.on_pointer_up(51.0), InteractionCommand::None);
    }

    #[test]
    fn modified_drag_locks_comparison_and_clamps_to_plot() {
        let mut controller = controller();
        controller.on_pointer_down(150.0, PointerModifier::Compare { slot: 2 });
        assert_eq!(controller.on_pointer_move(260.0), InteractionCommand::None);
        assert_eq!(
            controller.on_pointer_up(260.0),
            InteractionCommand::LockComparison {
                slot: 2,
                min: 75.0,
                max: 100.0
            }
        );
    }
}
