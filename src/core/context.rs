//=========================================================================
// Application Context
//=========================================================================
//
// The single piece of state shared between the window host's message
// handler and the frame loop.
//
// Contains:
// - host state: Uninitialized → Created → Running → Closed
// - the presentation surface
// - the first fatal error raised inside a message handler
//
// Owned by the engine and lent by `&mut` to whichever side is running:
// the message handler while messages are being drained, the frame loop
// otherwise. There is never a second borrower.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformError;
use crate::core::surface::PresentationSurface;

//=== HostState ===========================================================

/// Lifecycle of the single window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// No window yet.
    Uninitialized,

    /// Window exists, backbuffer not yet allocated.
    Created,

    /// Window and backbuffer ready; the frame loop runs.
    Running,

    /// Terminal.
    Closed,
}

//=== AppContext ==========================================================

/// Shared run state, surface and fatal-error slot.
#[derive(Debug)]
pub struct AppContext {
    state: HostState,

    /// Backbuffer written by the frame callback and presented by the host.
    pub surface: PresentationSurface,

    fatal: Option<PlatformError>,
}

impl AppContext {
    /// Creates a context with an empty heap-backed surface.
    pub fn new() -> Self {
        Self::with_surface(PresentationSurface::new())
    }

    pub fn with_surface(surface: PresentationSurface) -> Self {
        Self {
            state: HostState::Uninitialized,
            surface,
            fatal: None,
        }
    }

    //--- Run State --------------------------------------------------------

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == HostState::Running
    }

    pub(crate) fn set_state(&mut self, state: HostState) {
        self.state = state;
    }

    //--- Fatal Errors -----------------------------------------------------

    /// Records a fatal error and closes the host. The first error wins.
    pub fn fail(&mut self, error: PlatformError) {
        self.state = HostState::Closed;
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
    }

    pub fn fatal(&self) -> Option<&PlatformError> {
        self.fatal.as_ref()
    }

    pub fn take_fatal(&mut self) -> Option<PlatformError> {
        self.fatal.take()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
