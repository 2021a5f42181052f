use leptos::logging::log;

use crate::pagination::{Advance, Direction, Pagination};

/// Horizontal travel, in pixels, a drag must exceed to page.
pub const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    pub x: f64,
    pub y: f64,
    /// Pagination cursor when the drag was last anchored.
    pub cursor: usize,
}

/// Turns wheel, touch and button input into `Pagination::advance` calls.
///
/// Every handler returns `None` when the input was not recognized as a
/// paging gesture, and the pagination outcome otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureAdapter {
    drag: Option<DragOrigin>,
}

impl GestureAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_origin(&self) -> Option<DragOrigin> {
        self.drag
    }

    /// One wheel event is one full group, whatever its magnitude.
    pub fn on_wheel(&mut self, delta_y: f64, pagination: &mut Pagination) -> Option<Advance> {
        let direction = Direction::from_delta(delta_y)?;
        Some(pagination.advance(direction))
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64, pagination: &Pagination) {
        self.drag = Some(DragOrigin {
            x,
            y,
            cursor: pagination.cursor(),
        });
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64, pagination: &mut Pagination) -> Option<Advance> {
        let origin = self.drag?;
        let dx = origin.x - x;
        let dy = origin.y - y;
        if dx.abs() <= SWIPE_THRESHOLD || dx.abs() <= dy.abs() {
            return None;
        }
        let direction = Direction::from_delta(dx)?;
        let outcome = pagination.advance(direction);
        log!(
            "[GESTURE] Swipe dx={} dy={} from cursor {} -> {:?}",
            dx,
            dy,
            origin.cursor,
            outcome
        );
        // Re-anchor so a sustained drag keeps paging.
        self.drag = Some(DragOrigin {
            x,
            y,
            cursor: pagination.cursor(),
        });
        Some(outcome)
    }

    pub fn on_touch_end(&mut self) {
        self.drag = None;
    }

    pub fn on_prev_click(&mut self, pagination: &mut Pagination) -> Option<Advance> {
        Some(Self::click(Direction::Backward, pagination))
    }

    pub fn on_next_click(&mut self, pagination: &mut Pagination) -> Option<Advance> {
        Some(Self::click(Direction::Forward, pagination))
    }

    fn click(direction: Direction, pagination: &mut Pagination) -> Advance {
        if !pagination.can_advance(direction) {
            log!("[GESTURE] {:?} button disabled at boundary", direction);
            return Advance::AtBoundary;
        }
        pagination.advance(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paged(len: usize) -> Pagination {
        let mut pagination = Pagination::new();
        pagination.on_list_changed(len);
        pagination
    }

    #[test]
    fn wheel_steps_one_group_per_event() {
        let mut pagination = paged(10);
        let mut gestures = GestureAdapter::new();
        assert_eq!(
            gestures.on_wheel(480.0, &mut pagination),
            Some(Advance::Moved { from: 0, to: 3 })
        );
        assert_eq!(
            gestures.on_wheel(1.0, &mut pagination),
            Some(Advance::Moved { from: 3, to: 6 })
        );
        assert_eq!(
            gestures.on_wheel(-3.0, &mut pagination),
            Some(Advance::Moved { from: 6, to: 3 })
        );
        assert_eq!(gestures.on_wheel(0.0, &mut pagination), None);
        assert_eq!(pagination.cursor(), 3);
    }

    #[test]
    fn horizontal_swipe_past_threshold_advances() {
        let mut pagination = paged(9);
        let mut gestures = GestureAdapter::new();
        gestures.on_touch_start(200.0, 100.0, &pagination);
        assert_eq!(
            gestures.on_touch_move(140.0, 90.0, &mut pagination),
            Some(Advance::Moved { from: 0, to: 3 })
        );
        let origin = gestures.drag_origin().unwrap();
        assert_eq!((origin.x, origin.y, origin.cursor), (140.0, 90.0, 3));
    }

    #[test]
    fn short_or_vertical_drags_are_ignored() {
        let mut pagination = paged(9);
        let mut gestures = GestureAdapter::new();
        gestures.on_touch_start(200.0, 100.0, &pagination);
        assert_eq!(gestures.on_touch_move(150.0, 100.0, &mut pagination), None);
        assert_eq!(gestures.on_touch_move(130.0, 20.0, &mut pagination), None);
        assert_eq!(pagination.cursor(), 0);
        assert_eq!(gestures.drag_origin().unwrap().x, 200.0);
    }

    #[test]
    fn sustained_drag_retriggers_from_the_new_origin() {
        let mut pagination = paged(12);
        let mut gestures = GestureAdapter::new();
        gestures.on_touch_start(300.0, 0.0, &pagination);
        assert!(gestures.on_touch_move(240.0, 0.0, &mut pagination).is_some());
        assert_eq!(gestures.on_touch_move(200.0, 0.0, &mut pagination), None);
        assert_eq!(
            gestures.on_touch_move(180.0, 0.0, &mut pagination),
            Some(Advance::Moved { from: 3, to: 6 })
        );
        // Dragging back to the right retreats.
        assert_eq!(
            gestures.on_touch_move(260.0, 0.0, &mut pagination),
            Some(Advance::Moved { from: 6, to: 3 })
        );
    }

    #[test]
    fn moves_without_a_start_or_after_end_do_nothing() {
        let mut pagination = paged(9);
        let mut gestures = GestureAdapter::new();
        assert_eq!(gestures.on_touch_move(0.0, 0.0, &mut pagination), None);
        gestures.on_touch_start(100.0, 0.0, &pagination);
        gestures.on_touch_end();
        assert_eq!(gestures.on_touch_move(0.0, 0.0, &mut pagination), None);
        assert_eq!(pagination.cursor(), 0);
    }

    #[test]
    fn anchor_cursor_tracks_each_swipe_step() {
        let mut pagination = paged(4);
        let mut gestures = GestureAdapter::new();
        gestures.on_touch_start(300.0, 0.0, &pagination);
        assert_eq!(gestures.drag_origin().unwrap().cursor, 0);
        assert_eq!(
            gestures.on_touch_move(240.0, 0.0, &mut pagination),
            Some(Advance::Moved { from: 0, to: 1 })
        );
        assert_eq!(gestures.drag_origin().unwrap().cursor, 1);
        assert_eq!(
            gestures.on_touch_move(180.0, 0.0, &mut pagination),
            Some(Advance::AtBoundary)
        );
        let origin = gestures.drag_origin().unwrap();
        assert_eq!((origin.x, origin.cursor), (180.0, 1));
    }

    #[test]
    fn buttons_are_rejected_at_the_edges() {
        let mut pagination = paged(4);
        let mut gestures = GestureAdapter::new();
        assert_eq!(gestures.on_prev_click(&mut pagination), Some(Advance::AtBoundary));
        assert_eq!(
            gestures.on_next_click(&mut pagination),
            Some(Advance::Moved { from: 0, to: 1 })
        );
        assert_eq!(gestures.on_next_click(&mut pagination), Some(Advance::AtBoundary));
        assert_eq!(pagination.cursor(), 1);
    }
}
