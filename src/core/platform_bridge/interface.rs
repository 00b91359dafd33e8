//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Backend-to-core contract: the messages a windowing backend delivers,
// the operations the frame loop needs from it, and the error taxonomy.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::input::KeyCode;
use crate::core::surface::{PresentationSurface, SurfaceError};

//=== HostMessage =========================================================

/// Window/system message, already translated out of the backend's types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage {
    /// The OS window exists and has the given client size.
    Created { width: u32, height: u32 },

    /// User or OS asked the window to close.
    Close,

    /// The window has been destroyed.
    Destroy,

    /// Application gained or lost focus.
    Activate(bool),

    /// Client area changed size.
    Resized { width: u32, height: u32 },

    /// Raw key message with the before/after "down" bits.
    Key {
        key: KeyCode,
        was_down: bool,
        is_down: bool,
    },

    /// The OS wants the client area repainted.
    Paint,
}

//=== PumpOutcome =========================================================

/// Result of draining the backend's pending messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// Queue drained; keep going.
    Continue,

    /// The host delivered a quit signal distinct from window close.
    Quit(i32),
}

//=== Presenter ===========================================================

/// Presentation target of the window's client area.
pub trait Presenter {
    /// Current client size in physical pixels.
    fn client_size(&self) -> (u32, u32);

    /// Blits `surface` into a `width x height` client region.
    fn present(
        &mut self,
        surface: &PresentationSurface,
        width: u32,
        height: u32,
    ) -> Result<(), PlatformError>;
}

//=== HostPump ============================================================

/// Windowing backend as seen by the frame loop.
pub trait HostPump {
    /// Dispatches every message already queued, without blocking.
    ///
    /// Message handlers mutate `ctx` synchronously during the call.
    fn pump(&mut self, ctx: &mut AppContext) -> PumpOutcome;

    /// Presents `surface` at the window's current client size.
    ///
    /// A backend with no window yet presents nothing and returns `Ok`.
    fn present(&mut self, surface: &PresentationSurface) -> Result<(), PlatformError>;
}

//=== PlatformError =======================================================

/// Fatal platform errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Event loop, window or presentation target could not be created.
    PlatformInit(String),

    /// Backbuffer allocation rejected by the host allocator.
    OutOfMemory { width: u32, height: u32 },

    /// The presentation target refused a frame.
    Present(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlatformInit(e) => write!(f, "Platform initialization failed: {}", e),
            Self::OutOfMemory { width, height } => {
                write!(f, "Out of memory allocating {}x{} backbuffer", width, height)
            }
            Self::Present(e) => write!(f, "Present failed: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<SurfaceError> for PlatformError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::OutOfMemory { width, height } => Self::OutOfMemory { width, height },
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
