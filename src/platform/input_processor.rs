//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit keyboard events into host key messages.
//
// Architecture:
//   winit KeyEvent → key_message() → HostMessage::Key { was_down, is_down }
//
// winit reports `state` plus a `repeat` flag rather than the previous
// key state, so the "was down" bit is rebuilt here:
//
// ```text
//   Pressed,  repeat = false  →  was_down = false, is_down = true   (edge)
//   Pressed,  repeat = true   →  was_down = true,  is_down = true   (repeat)
//   Released                  →  was_down = true,  is_down = false  (edge)
// ```
//
// Unmapped keys (F13-F24, media keys, ...) are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::KeyCode;
use crate::core::platform_bridge::HostMessage;

//=== Key Translation =====================================================

/// Rebuilds the `(was_down, is_down)` bit pair from a winit key report.
pub(crate) fn key_transition(state: ElementState, repeat: bool) -> (bool, bool) {
    match state {
        ElementState::Pressed => (repeat, true),
        ElementState::Released => (true, false),
    }
}

/// Converts a winit key report into a host message (filters unmapped keys).
pub(crate) fn key_message(key_event: &KeyEvent) -> Option<HostMessage> {
    let key = match key_event.physical_key {
        PhysicalKey::Code(code) => KeyCode::from(code),
        _ => return None,
    };

    if matches!(key, KeyCode::Unidentified) {
        return None;
    }

    let (was_down, is_down) = key_transition(key_event.state, key_event.repeat);
    Some(HostMessage::Key { key, was_down, is_down })
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Everything else
/// returns `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            //--- Unmapped -----------------------------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
