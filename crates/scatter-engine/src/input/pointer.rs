use glam::Vec2;

use crate::api::config::POINTER_ABSENT_DISTANCE;

/// Pointer signals the tracker understands, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse/pen moved to (x, y).
    Move { x: f32, y: f32 },
    /// First touch point moved to (x, y).
    TouchMove { x: f32, y: f32 },
    /// All touches lifted.
    TouchEnd,
    /// The pointer left the surface.
    Leave,
}

/// Snapshot of the interaction point read by the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// `None` when no pointer is over the surface.
    pub position: Option<Vec2>,
    pub radius: f32,
}

impl PointerState {
    pub fn absent(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    pub fn at(x: f32, y: f32, radius: f32) -> Self {
        Self {
            position: Some(Vec2::new(x, y)),
            radius,
        }
    }

    /// Offset from `from` to the pointer and its length.
    /// An absent pointer reports a zero offset at [`POINTER_ABSENT_DISTANCE`].
    pub fn offset_from(&self, from: Vec2) -> (f32, f32, f32) {
        match self.position {
            Some(p) => {
                let dx = p.x - from.x;
                let dy = p.y - from.y;
                (dx, dy, (dx * dx + dy * dy).sqrt())
            }
            None => (0.0, 0.0, POINTER_ABSENT_DISTANCE),
        }
    }
}

/// Owns the session's pointer state. Last event wins.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    pub fn new(radius: f32) -> Self {
        Self {
            state: PointerState::absent(radius),
        }
    }

    /// Apply one event. Both coordinates are replaced together.
    pub fn apply(&mut self, event: PointerEvent) {
        self.state.position = match event {
            PointerEvent::Move { x, y } | PointerEvent::TouchMove { x, y } => Some(Vec2::new(x, y)),
            PointerEvent::TouchEnd | PointerEvent::Leave => None,
        };
    }

    pub fn state(&self) -> PointerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_absent() {
        let tracker = PointerTracker::new(100.0);
        assert_eq!(tracker.state(), PointerState::absent(100.0));
    }

    #[test]
    fn last_event_wins() {
        let mut tracker = PointerTracker::new(100.0);
        tracker.apply(PointerEvent::Move { x: 10.0, y: 20.0 });
        tracker.apply(PointerEvent::TouchMove { x: 30.0, y: 40.0 });
        assert_eq!(tracker.state().position, Some(Vec2::new(30.0, 40.0)));

        tracker.apply(PointerEvent::TouchEnd);
        assert_eq!(tracker.state().position, None);

        tracker.apply(PointerEvent::Move { x: 1.0, y: 2.0 });
        tracker.apply(PointerEvent::Leave);
        assert_eq!(tracker.state().position, None);
        assert_eq!(tracker.state().radius, 100.0);
    }

    #[test]
    fn origin_coordinate_counts_as_present() {
        let mut tracker = PointerTracker::new(100.0);
        tracker.apply(PointerEvent::Move { x: 0.0, y: 0.0 });
        let (_, _, distance) = tracker.state().offset_from(Vec2::new(3.0, 4.0));
        assert_eq!(distance, 5.0);
    }

    #[test]
    fn absent_pointer_reports_sentinel_distance() {
        let state = PointerState::absent(100.0);
        let (dx, dy, distance) = state.offset_from(Vec2::new(5.0, 5.0));
        assert_eq!((dx, dy), (0.0, 0.0));
        assert_eq!(distance, POINTER_ABSENT_DISTANCE);
    }
}
