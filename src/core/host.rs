//=========================================================================
// Window Host
//=========================================================================
//
// Message handler for the single application window.
//
// The backend calls `handle()` synchronously for every message targeted
// at the window. It is the only code outside the frame loop that mutates
// the run state or the surface.
//
// State machine:
// ```text
//   Uninitialized ──Created──> Created ──surface ok──> Running
//                                 │ ↺ zero-sized client (FollowWindow):
//                                 │   wait for a non-empty Resized
//         │                       │                       │
//         └──────── Close / Destroy / fatal error ────────┴──> Closed
// ```
//
// - Close/Destroy are idempotent: only the first one transitions and emits.
// - Paint while Running presents the current surface at the current client
//   size. Messages are handled on one thread, so a paint never observes a
//   half-finished resize.
// - Key messages are forwarded only on edges (`was_down != is_down`).
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::{AppContext, HostState};
use crate::core::debug::{DebugSink, LogSink};
use crate::core::input::{KeyCode, KeyEvent};
use crate::core::platform_bridge::{HostMessage, Presenter};

//=== SurfaceSizing =======================================================

/// How the backbuffer size relates to the window's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSizing {
    /// Constant backbuffer, stretched to the client area on present.
    Fixed { width: u32, height: u32 },

    /// Backbuffer reallocated to every reported client size.
    FollowWindow,
}

impl Default for SurfaceSizing {
    fn default() -> Self {
        Self::FollowWindow
    }
}

//=== WindowHost ==========================================================

/// Translates host messages into state transitions and key edges.
pub struct WindowHost<S: DebugSink = LogSink> {
    sink: S,
    sizing: SurfaceSizing,
    key_sender: Sender<KeyEvent>,
}

impl<S: DebugSink> WindowHost<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(sink: S, sizing: SurfaceSizing, key_sender: Sender<KeyEvent>) -> Self {
        Self {
            sink,
            sizing,
            key_sender,
        }
    }

    pub fn sizing(&self) -> SurfaceSizing {
        self.sizing
    }

    //--- Dispatch ---------------------------------------------------------

    /// Handles one message. Called by the backend, never re-entered from
    /// inside itself.
    pub fn handle(
        &mut self,
        ctx: &mut AppContext,
        message: HostMessage,
        presenter: &mut dyn Presenter,
    ) {
        match message {
            HostMessage::Created { width, height } => self.on_created(ctx, width, height),
            HostMessage::Close => self.on_close(ctx, "close"),
            HostMessage::Destroy => self.on_close(ctx, "destroy"),
            HostMessage::Activate(active) => {
                debug!(target: "platform::host", "Window activation changed: {}", active);
                self.sink.emit("activate");
            }
            HostMessage::Resized { width, height } => self.on_resized(ctx, width, height),
            HostMessage::Key { key, was_down, is_down } => self.on_key(key, was_down, is_down),
            HostMessage::Paint => self.on_paint(ctx, presenter),
        }
    }

    //--- Handlers ---------------------------------------------------------

    fn on_created(&mut self, ctx: &mut AppContext, client_width: u32, client_height: u32) {
        if ctx.state() != HostState::Uninitialized {
            debug!(target: "platform::host", "Duplicate create ignored ({:?})", ctx.state());
            return;
        }

        ctx.set_state(HostState::Created);
        self.sink.emit("created");

        let (width, height) = match self.sizing {
            SurfaceSizing::Fixed { width, height } => (width, height),
            SurfaceSizing::FollowWindow => (client_width, client_height),
        };

        self.start_running(ctx, width, height);
    }

    /// Created → Running on the first non-empty backbuffer allocation.
    fn start_running(&mut self, ctx: &mut AppContext, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!(target: "platform::host", "Backbuffer deferred until client area is non-empty");
            return;
        }

        match ctx.surface.resize(width, height) {
            Ok(()) => {
                ctx.set_state(HostState::Running);
                self.sink.emit("running");
                info!(target: "platform::host", "Host running: backbuffer {}x{}", width, height);
            }
            Err(e) => {
                error!(target: "platform::host", "Initial backbuffer failed: {}", e);
                self.sink.emit("out of memory");
                ctx.fail(e.into());
            }
        }
    }

    fn on_close(&mut self, ctx: &mut AppContext, tag: &str) {
        if ctx.state() == HostState::Closed {
            trace!(target: "platform::host", "Duplicate {} ignored", tag);
            return;
        }

        ctx.set_state(HostState::Closed);
        self.sink.emit(tag);
        info!(target: "platform::host", "Window closed ({})", tag);
    }

    fn on_resized(&mut self, ctx: &mut AppContext, width: u32, height: u32) {
        self.sink.emit("resized");

        if self.sizing != SurfaceSizing::FollowWindow {
            debug!(target: "platform::host", "Client resized to {}x{}", width, height);
            return;
        }

        match ctx.state() {
            HostState::Created => self.start_running(ctx, width, height),
            HostState::Running => {
                if let Err(e) = ctx.surface.resize(width, height) {
                    error!(target: "platform::host", "Backbuffer resize failed: {}", e);
                    self.sink.emit("out of memory");
                    ctx.fail(e.into());
                }
            }
            HostState::Uninitialized | HostState::Closed => {
                trace!(target: "platform::host", "Resize ignored ({:?})", ctx.state());
            }
        }
    }

    fn on_key(&mut self, key: KeyCode, was_down: bool, is_down: bool) {
        let Some(event) = KeyEvent::edge(key, was_down, is_down) else {
            return;
        };

        let edge = if event.is_press() { "down" } else { "up" };
        self.sink.emit(&format!("key {:?} {}", key, edge));

        match self.key_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "platform::input", "Key channel full, dropping {:?}", event);
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(target: "platform::input", "Key channel disconnected, dropping {:?}", event);
            }
        }
    }

    fn on_paint(&mut self, ctx: &AppContext, presenter: &mut dyn Presenter) {
        if !ctx.is_running() {
            trace!(target: "platform::host", "Paint ignored ({:?})", ctx.state());
            return;
        }

        let (width, height) = presenter.client_size();
        if let Err(e) = presenter.present(&ctx.surface, width, height) {
            warn!(target: "platform::host", "Paint present failed: {}", e);
        }
    }
}

//=========================================================================
// Test Doubles
//=========================================================================


//=========================================================================
// Unit Tests
//=========================================================================
