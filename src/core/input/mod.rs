//=========================================================================
// Input
//=========================================================================
//
// Keyboard edges and gamepad polling.
//
// Components:
// - `event`: key codes and edge-triggered key events
// - `gamepad`: decoded controller snapshot, button flags, backend seam
// - `binding`: optional host gamepad library (Bound / Stub)
// - `poller`: per-frame sweep over controller slots
//
//=========================================================================

//=== Module Declarations =================================================

pub mod binding;
pub mod event;
pub mod gamepad;
pub mod poller;

//=== Public API ==========================================================

pub use binding::{BoundLibrary, InputLibraryBinding, DEFAULT_INPUT_LIBRARIES};
pub use event::{KeyCode, KeyEvent};
pub use gamepad::{
    DeviceUnavailable, GamepadButtons, GamepadSnapshot, GamepadSource, RawGamepad, Vibration,
};
pub use poller::{poll_all, GamepadSlot, MAX_GAMEPAD_SLOTS};
