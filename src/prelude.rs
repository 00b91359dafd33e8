//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_platform::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// Frame loop
pub use crate::core::frame_loop::{FrameCallback, FrameInput, LoopExit, QuitPolicy};
pub use crate::core::host::SurfaceSizing;
pub use crate::core::platform_bridge::PlatformError;

// Backbuffer
pub use crate::core::surface::PresentationSurface;

// Input
pub use crate::core::input::{
    GamepadButtons, GamepadSlot, GamepadSnapshot, KeyCode, KeyEvent, Vibration,
};
