//=========================================================================
// Core
//
// Platform-neutral half of the runtime. Nothing here touches winit or
// softbuffer; the backend in `platform` drives it through the
// `HostPump` / `Presenter` seams.
//
// Responsibilities:
// - Own the per-application state (`AppContext`) and backbuffer
// - Translate host messages into state transitions and key edges
// - Bind and poll gamepads
// - Run the per-frame sequence: drain → poll → callback → present
//
//=========================================================================

pub mod context;
pub mod debug;
pub mod frame_loop;
pub mod host;
pub mod input;
pub mod pattern;
pub mod platform_bridge;
pub mod surface;
