#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    /// Input unfocused, dropdown hidden.
    Idle,
    /// Input focused, dropdown visible.
    Focused,
    /// Blur received, grace window running; dropdown still visible so a
    /// concurrent click on a row can land before it disappears.
    Closing,
}

/// Focus/visibility state machine for the input + dropdown pair. On top
/// of the grace timer it tracks whether the pointer is currently inside
/// the dropdown: while it is, an expiring grace window does not hide the
/// list, so the timer is a fallback rather than the only defence against
/// the blur-before-click event ordering.
#[derive(Debug, Clone, Copy)]
pub struct DropdownFocus {
    state: FocusState,
    pointer_within: bool,
}

impl DropdownFocus {
    pub fn new() -> Self {
        Self {
            state: FocusState::Idle,
            pointer_within: false,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FocusState::Focused | FocusState::Closing)
    }

    /// Focus from anywhere (pointer focus, or the global shortcut).
    pub fn focus(&mut self) -> bool {
        let changed = self.state != FocusState::Focused;
        self.state = FocusState::Focused;
        changed
    }

    /// Returns true when a grace timer should be started.
    pub fn blur(&mut self) -> bool {
        if self.state != FocusState::Focused {
            return false;
        }
        self.state = FocusState::Closing;
        true
    }

    /// Returns true when the dropdown actually hid.
    pub fn grace_elapsed(&mut self) -> bool {
        if self.state != FocusState::Closing || self.pointer_within {
            return false;
        }
        self.state = FocusState::Idle;
        true
    }

    pub fn pointer_entered(&mut self) {
        self.pointer_within = true;
    }

    /// Returns true when leaving the dropdown hid it (the grace window had
    /// already been spent keeping it open for the pointer).
    pub fn pointer_left(&mut self) -> bool {
        self.pointer_within = false;
        if self.state == FocusState::Closing {
            self.state = FocusState::Idle;
            return true;
        }
        false
    }

    /// Immediate close: explicit selection or Escape, no grace involved.
    pub fn force_idle(&mut self) -> bool {
        let changed = self.state != FocusState::Idle;
        self.state = FocusState::Idle;
        self.pointer_within = false;
        changed
    }
}

impl Default for DropdownFocus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{DropdownFocus, FocusState};

    #[test]
    fn focus_opens_from_any_state() {
        let mut focus = DropdownFocus::new();
        assert!(focus.focus());
        assert_eq!(focus.state(), FocusState::Focused);

        focus.blur();
        assert!(focus.focus());
        assert_eq!(focus.state(), FocusState::Focused);

        focus.force_idle();
        assert!(focus.focus());
        assert_eq!(focus.state(), FocusState::Focused);
    }

    #[test]
    fn blur_then_grace_hides_the_dropdown() {
        let mut focus = DropdownFocus::new();
        focus.focus();
        assert!(focus.blur());
        assert_eq!(focus.state(), FocusState::Closing);
        assert!(focus.is_open());

        assert!(focus.grace_elapsed());
        assert_eq!(focus.state(), FocusState::Idle);
        assert!(!focus.is_open());
    }

    #[test]
    fn blur_outside_focused_starts_no_grace() {
        let mut focus = DropdownFocus::new();
        assert!(!focus.blur());
        assert_eq!(focus.state(), FocusState::Idle);
    }

    #[test]
    fn pointer_within_outlives_the_grace_window() {
        let mut focus = DropdownFocus::new();
        focus.focus();
        focus.pointer_entered();
        focus.blur();

        assert!(!focus.grace_elapsed());
        assert_eq!(focus.state(), FocusState::Closing);

        assert!(focus.pointer_left());
        assert_eq!(focus.state(), FocusState::Idle);
    }

    #[test]
    fn force_idle_bypasses_the_grace_window() {
        let mut focus = DropdownFocus::new();
        focus.focus();
        focus.blur();
        assert!(focus.force_idle());
        assert_eq!(focus.state(), FocusState::Idle);

        // A stale grace emission after the close changes nothing.
        assert!(!focus.grace_elapsed());
        assert_eq!(focus.state(), FocusState::Idle);
    }
}
