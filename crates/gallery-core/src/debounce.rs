//! Time-window guards shared by input debouncing and drag/click disambiguation.

use instant::Instant;
use std::time::Duration;

/// True when `now` is at most `window` after `earlier`.
///
/// A `now` that precedes `earlier` (clock skew between event sources) counts
/// as inside the window.
#[inline]
pub fn within_window(earlier: Instant, now: Instant, window: Duration) -> bool {
    if now < earlier {
        return true;
    }
    now.duration_since(earlier) <= window
}

/// True once `deadline` has been reached.
#[inline]
pub fn deadline_passed(deadline: Instant, now: Instant) -> bool {
    now >= deadline
}

/// Pointer drag tracking used to tell a look-drag apart from a click.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragState {
    pub pointer_down: bool,
    pub is_dragging: bool,
    pub last_drag_end: Option<Instant>,
}

impl DragState {
    pub fn begin(&mut self) {
        self.pointer_down = true;
        self.is_dragging = false;
    }

    /// Any movement while the pointer is down is a drag. Every move refreshes
    /// the drag timestamp so the guard window is measured from the last move.
    pub fn moved(&mut self, now: Instant) -> bool {
        if !self.pointer_down {
            return false;
        }
        self.is_dragging = true;
        self.last_drag_end = Some(now);
        true
    }

    pub fn end(&mut self, now: Instant) {
        if self.is_dragging {
            self.last_drag_end = Some(now);
        }
        self.pointer_down = false;
        self.is_dragging = false;
    }

    pub fn cancel(&mut self) {
        self.pointer_down = false;
        self.is_dragging = false;
    }

    /// Whether a click at `now` should be interpreted at all.
    pub fn click_allowed(&self, now: Instant, guard: Duration) -> bool {
        if self.is_dragging {
            return false;
        }
        match self.last_drag_end {
            Some(end) => !within_window(end, now, guard),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_inclusive_and_tolerates_skew() {
        let t0 = Instant::now();
        let w = Duration::from_millis(100);
        assert!(within_window(t0, t0 + Duration::from_millis(100), w));
        assert!(!within_window(t0, t0 + Duration::from_millis(101), w));
        assert!(within_window(t0 + Duration::from_millis(5), t0, w));
    }

    #[test]
    fn plain_press_release_is_not_a_drag() {
        let t0 = Instant::now();
        let mut d = DragState::default();
        d.begin();
        d.end(t0);
        assert!(d.last_drag_end.is_none());
        assert!(d.click_allowed(t0, Duration::from_millis(100)));
    }
}
