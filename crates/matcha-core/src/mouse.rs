/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Press,
    Release,
    Motion,
}

/// Which button the event refers to.
///
/// Wheel events report as presses of the corresponding wheel button.
/// `None` appears on bare motion events and on legacy-protocol releases,
/// which do not encode the button that was let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    /// Additional buttons (back/forward and beyond), numbered from 0.
    Extra(u8),
}

/// A decoded mouse event with 0-based cell coordinates.
///
/// Both the SGR and the legacy X10 wire encodings are 1-based; the decoder
/// normalizes to 0-based so (0, 0) is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub action: MouseAction,
    pub button: MouseButton,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl MouseEvent {
    /// True for wheel-scroll events in any direction.
    pub fn is_wheel(&self) -> bool {
        matches!(
            self.button,
            MouseButton::WheelUp
                | MouseButton::WheelDown
                | MouseButton::WheelLeft
                | MouseButton::WheelRight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_detection() {
        let mut ev = MouseEvent {
            x: 0,
            y: 0,
            action: MouseAction::Press,
            button: MouseButton::WheelUp,
            shift: false,
            alt: false,
            ctrl: false,
        };
        assert!(ev.is_wheel());
        ev.button = MouseButton::Left;
        assert!(!ev.is_wheel());
    }
}
