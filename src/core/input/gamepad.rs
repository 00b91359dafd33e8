//=========================================================================
// Gamepad State
//=========================================================================
//
// Decoded controller snapshot and the capability seam every gamepad
// backend implements.
//
// Architecture:
//   RawGamepad (host layout) ──decode()──> GamepadSnapshot (named flags)
//
// The bit layout of the raw button mask is known only here. Everything
// downstream works with `GamepadButtons` flags.
//
//=========================================================================

//=== External Dependencies ===============================================

use bitflags::bitflags;

//=== GamepadButtons ======================================================

bitflags! {
    /// Digital buttons reported by a controller.
    ///
    /// Flag values match the host button mask, so decoding is a truncating
    /// conversion. Thumbstick clicks are not part of the set and are dropped.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GamepadButtons: u16 {
        const DPAD_UP        = 0x0001;
        const DPAD_DOWN      = 0x0002;
        const DPAD_LEFT      = 0x0004;
        const DPAD_RIGHT     = 0x0008;
        const START          = 0x0010;
        const BACK           = 0x0020;
        const LEFT_SHOULDER  = 0x0100;
        const RIGHT_SHOULDER = 0x0200;
        const A              = 0x1000;
        const B              = 0x2000;
        const X              = 0x4000;
        const Y              = 0x8000;
    }
}

//=== RawGamepad ==========================================================

/// Controller report in the host input library's memory layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawGamepad {
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

//=== GamepadSnapshot =====================================================

/// Immutable per-frame view of one connected controller.
///
/// Stick axes are passed through untouched; deadzone handling belongs to
/// the consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamepadSnapshot {
    pub buttons: GamepadButtons,
    pub left_stick_x: i16,
    pub left_stick_y: i16,
}

impl GamepadSnapshot {
    /// Decodes a raw host report.
    pub fn decode(raw: &RawGamepad) -> Self {
        Self {
            buttons: GamepadButtons::from_bits_truncate(raw.buttons),
            left_stick_x: raw.thumb_lx,
            left_stick_y: raw.thumb_ly,
        }
    }

    pub fn is_pressed(&self, button: GamepadButtons) -> bool {
        self.buttons.contains(button)
    }
}

//=== Vibration ===========================================================

/// Motor speeds for a rumble request (0 = off, 65535 = full).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vibration {
    pub left_motor: u16,
    pub right_motor: u16,
}

impl Vibration {
    pub const OFF: Self = Self { left_motor: 0, right_motor: 0 };
    pub const FULL: Self = Self { left_motor: u16::MAX, right_motor: u16::MAX };
}

//=== DeviceUnavailable ===================================================

/// The controller slot has no connected device.
///
/// Recovered locally: the slot is skipped for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceUnavailable {
    pub slot: u32,
}

impl std::fmt::Display for DeviceUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No controller connected in slot {}", self.slot)
    }
}

impl std::error::Error for DeviceUnavailable {}

//=== GamepadSource =======================================================

/// Capability set of a gamepad backend.
pub trait GamepadSource {
    /// Returns the current snapshot for `slot`, or `None` if nothing is
    /// connected there.
    fn get_state(&self, slot: u32) -> Option<GamepadSnapshot>;

    /// Sends a rumble request to `slot`.
    fn set_vibration(&self, slot: u32, vibration: Vibration) -> Result<(), DeviceUnavailable>;
}

//=========================================================================
// Unit Tests
//=========================================================================
