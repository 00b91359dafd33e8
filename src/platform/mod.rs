//=========================================================================
// Platform Subsystem
//
// Winit + softbuffer backend for the window host and the frame loop.
//
// Architecture:
// ```text
//  Main Thread (one frame):
//  ┌────────────────────────────────────────────────────────────┐
//  │  FrameLoop::run                                            │
//  │   ↓ HostPump::pump                                         │
//  │  pump_app_events(timeout = 0)                              │
//  │   ├─ resumed()      → create window → HostMessage::Created │
//  │   └─ window_event() → event_mapper  → WindowHost::handle   │
//  │                                         ├─ AppContext      │
//  │                                         └─ key channel ────┼──→ EventCollector
//  │   ↓ poll gamepads, frame callback                          │
//  │   ↓ HostPump::present                                      │
//  │  WindowSurface (softbuffer) ← stretch backbuffer           │
//  └────────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Non-blocking drain**: `pump_app_events` with a zero timeout drains
//   pending OS messages and returns, so the loop spins at full rate.
// - **Borrowed dispatcher**: each pump builds a short-lived handler that
//   borrows the context, host and window; no state is global.
// - **Main thread requirement**: winit mandates the main thread on macOS,
//   so everything here runs on the thread that called `Engine::run()`.
// - **Quit signal**: `PumpStatus::Exit` is the host quit request and maps
//   to `PumpOutcome::Quit`. winit only reports it after
//   `ActiveEventLoop::exit()` has been called, and nothing in this backend
//   calls it (close requests arrive as `WindowEvent::CloseRequested` and
//   become `HostMessage::Close`). The quit path is therefore reachable only
//   when winit ends the loop on its own, e.g. a platform backend that
//   terminates the event loop itself.
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;
mod input_processor;
mod presenter;

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::context::AppContext;
use crate::core::debug::LogSink;
use crate::core::host::WindowHost;
use crate::core::platform_bridge::{HostMessage, HostPump, PlatformError, Presenter, PumpOutcome};
use crate::core::surface::PresentationSurface;
use presenter::WindowSurface;

//=== WindowConfig ========================================================

/// Initial window attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Owns the OS event loop and (once created) the window.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new()` creates the event loop only
/// 2. **Startup**: the first pumps deliver `resumed()`, which creates the
///    window and sends `Created` to the host
/// 3. **Frames**: `pump()` / `present()` once per frame
/// 4. **Shutdown**: dropping the platform destroys the window, then the loop
///
/// This type is NOT Send/Sync; it must remain on the main thread.
pub(crate) struct Platform {
    /// OS window + presentation target (None until `resumed()`).
    /// Declared first so it drops before the event loop.
    window: Option<WindowSurface>,

    window_host: WindowHost<LogSink>,
    config: WindowConfig,
    event_loop: EventLoop<()>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates the OS event loop. The window is created lazily on the
    /// first pump.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::PlatformInit`] if the event loop cannot be
    /// created (no display, or a loop already exists on this thread).
    pub fn new(config: WindowConfig, window_host: WindowHost<LogSink>) -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new()
            .map_err(|e| PlatformError::PlatformInit(format!("event loop creation failed: {}", e)))?;

        info!(target: "platform", "Platform subsystem initialized");
        Ok(Self {
            window: None,
            window_host,
            config,
            event_loop,
        })
    }
}

//=== HostPump ============================================================

impl HostPump for Platform {
    fn pump(&mut self, ctx: &mut AppContext) -> PumpOutcome {
        let mut dispatcher = Dispatcher {
            ctx,
            window_host: &mut self.window_host,
            window: &mut self.window,
            config: &self.config,
        };

        match self.event_loop.pump_app_events(Some(Duration::ZERO), &mut dispatcher) {
            PumpStatus::Continue => PumpOutcome::Continue,
            PumpStatus::Exit(code) => {
                warn!(target: "platform", "Event loop exited (code {})", code);
                PumpOutcome::Quit(code)
            }
        }
    }

    fn present(&mut self, surface: &PresentationSurface) -> Result<(), PlatformError> {
        let Some(window) = self.window.as_mut() else {
            trace!(target: "platform", "Present before window creation skipped");
            return Ok(());
        };

        let (width, height) = window.client_size();
        window.present(surface, width, height)
    }
}

//=== Winit Integration ===================================================

/// Per-pump view over the platform and the application context.
struct Dispatcher<'a> {
    ctx: &'a mut AppContext,
    window_host: &'a mut WindowHost<LogSink>,
    window: &'a mut Option<WindowSurface>,
    config: &'a WindowConfig,
}

impl ApplicationHandler for Dispatcher<'_> {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.ctx.fail(PlatformError::PlatformInit(format!("window creation failed: {}", e)));
                return;
            }
        };

        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            window.inner_size().width,
            window.inner_size().height,
            window.scale_factor()
        );

        let mut surface = match WindowSurface::new(window) {
            Ok(surface) => surface,
            Err(e) => {
                error!(target: "platform", "{}", e);
                self.ctx.fail(e);
                return;
            }
        };

        let (width, height) = surface.client_size();
        self.window_host
            .handle(self.ctx, HostMessage::Created { width, height }, &mut surface);
        surface.window().request_redraw();
        *self.window = Some(surface);
    }

    /// Handles per-window events.
    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(message) = event_mapper::map_window_event(&event) else {
            return;
        };

        let Some(surface) = self.window.as_mut() else {
            trace!(target: "platform", "{:?} before window creation ignored", message);
            return;
        };

        self.window_host.handle(self.ctx, message, surface);
    }
}
