//=========================================================================
// Aetheric Platform — Library Root
//
// Window host, CPU backbuffer, gamepad binding and frame loop for
// software-rendered applications.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder` / `Engine`)
// - Keep the OS backend (`platform`) hidden from end users
// - Expose `core` for callers that drive the loop with their own host
//
// Typical usage:
// ```no_run
// use aetheric_platform::{EngineBuilder, GradientPattern};
//
// fn main() {
//     let _ = EngineBuilder::new().build().run(GradientPattern::new());
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the platform-neutral runtime: application context,
// backbuffer, window host, input and frame loop.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit/softbuffer backend and is kept private.
// `engine` wires everything together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::frame_loop::{FrameCallback, FrameInput, LoopExit, QuitPolicy};
pub use crate::core::host::SurfaceSizing;
pub use crate::core::pattern::GradientPattern;
pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder};
