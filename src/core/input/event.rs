//=========================================================================
// Key Event Types
//=========================================================================
//
// Platform-neutral keyboard representation.
//
// The host reports every key message as a pair of "down" bits: the state
// before the message and the state after it. Only messages where the two
// bits differ are real transitions; the rest are auto-repeat and never
// reach the frame callback.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    HostMessage::Key { code, was_down, is_down }
//         ↓
//    KeyEvent::edge()  (drops repeats)
//         ↓
//    FrameInput.keys  (frame callback)
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyW` is always the same physical key regardless of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys not mapped by the platform layer.
    Unidentified,
}

//=== KeyEvent ============================================================

/// One edge-triggered key transition.
///
/// `was_down != is_down` holds for every value built through
/// [`KeyEvent::edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub was_down: bool,
    pub is_down: bool,
}

impl KeyEvent {
    /// Builds an event from a raw key message, or `None` for a repeat.
    pub fn edge(key: KeyCode, was_down: bool, is_down: bool) -> Option<Self> {
        (was_down != is_down).then_some(Self { key, was_down, is_down })
    }

    /// `true` for an up → down transition.
    pub fn is_press(&self) -> bool {
        self.is_down
    }

    /// `true` for a down → up transition.
    pub fn is_release(&self) -> bool {
        !self.is_down
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_is_not_an_edge() {
        assert_eq!(KeyEvent::edge(KeyCode::KeyW, true, true), None);
    }

    #[test]
    fn idle_up_is_not_an_edge() {
        assert_eq!(KeyEvent::edge(KeyCode::KeyW, false, false), None);
    }

    #[test]
    fn press_is_an_edge() {
        let event = KeyEvent::edge(KeyCode::KeyA, false, true).unwrap();
        assert!(event.is_press());
        assert!(!event.is_release());
        assert_eq!(event.key, KeyCode::KeyA);
    }

    #[test]
    fn release_is_an_edge() {
        let event = KeyEvent::edge(KeyCode::KeyD, true, false).unwrap();
        assert!(event.is_release());
        assert!(event.was_down);
    }
}
