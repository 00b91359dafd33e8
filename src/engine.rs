//=========================================================================
// Aetheric Platform
//
// Main entry point: wires the window host, gamepad binding, key channel
// and frame loop together.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(callback)──>  LoopExit
//         │                          │
//         ├─ with_title()            ├─ resolves gamepad library
//         ├─ with_window_size()      ├─ creates event loop + key channel
//         ├─ with_surface_sizing()   ├─ waits for the window
//         ├─ with_quit_policy()      └─ runs frames until closed
//         ├─ with_max_slots()
//         ├─ with_input_libraries()
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::bounded;
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::debug::LogSink;
use crate::core::frame_loop::{FrameCallback, FrameLoop, LoopExit, QuitPolicy};
use crate::core::host::{SurfaceSizing, WindowHost};
use crate::core::input::{InputLibraryBinding, DEFAULT_INPUT_LIBRARIES, MAX_GAMEPAD_SLOTS};
use crate::core::platform_bridge::{EventCollector, PlatformError};
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Aetheric"
/// - **Window**: 1280x720 (logical)
/// - **Backbuffer**: follows the client size ([`SurfaceSizing::FollowWindow`])
/// - **Quit policy**: [`QuitPolicy::Abort`]
/// - **Gamepad slots**: 4
/// - **Input libraries**: `xinput1_4.dll`, `xinput9_1_0.dll`, `xinput1_3.dll`
/// - **Channel capacity**: 128 key events
///
/// # Examples
///
/// ```no_run
/// use aetheric_platform::{EngineBuilder, GradientPattern, QuitPolicy};
///
/// let exit = EngineBuilder::new()
///     .with_title("Demo")
///     .with_quit_policy(QuitPolicy::Graceful)
///     .build()
///     .run(GradientPattern::new());
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    title: String,
    window_width: u32,
    window_height: u32,
    sizing: SurfaceSizing,
    quit_policy: QuitPolicy,
    max_slots: u32,
    input_libraries: Vec<String>,
    channel_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Aetheric".to_string(),
            window_width: 1280,
            window_height: 720,
            sizing: SurfaceSizing::default(),
            quit_policy: QuitPolicy::default(),
            max_slots: MAX_GAMEPAD_SLOTS,
            input_libraries: DEFAULT_INPUT_LIBRARIES.iter().map(|s| s.to_string()).collect(),
            channel_capacity: 128,
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial client size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero, got {}x{}", width, height);
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Chooses between a backbuffer that follows the window (default) and
    /// a fixed one stretched to the client area.
    ///
    /// # Panics
    ///
    /// Panics if a fixed size has a zero dimension.
    pub fn with_surface_sizing(mut self, sizing: SurfaceSizing) -> Self {
        if let SurfaceSizing::Fixed { width, height } = sizing {
            assert!(width > 0 && height > 0, "Backbuffer size must be non-zero, got {}x{}", width, height);
        }
        self.sizing = sizing;
        self
    }

    /// Sets what happens when the OS asks the application to quit.
    ///
    /// Default: [`QuitPolicy::Abort`]
    pub fn with_quit_policy(mut self, policy: QuitPolicy) -> Self {
        self.quit_policy = policy;
        self
    }

    /// Sets how many gamepad slots are polled per frame.
    ///
    /// Default: 4
    ///
    /// # Panics
    ///
    /// Panics if `slots` is outside `1..=4`.
    pub fn with_max_slots(mut self, slots: u32) -> Self {
        assert!(
            (1..=MAX_GAMEPAD_SLOTS).contains(&slots),
            "Gamepad slots must be in 1..={}, got {}",
            MAX_GAMEPAD_SLOTS,
            slots
        );
        self.max_slots = slots;
        self
    }

    /// Replaces the gamepad library search list (first match wins).
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn with_input_libraries<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert!(!names.is_empty(), "Input library list must not be empty");
        self.input_libraries = names;
        self
    }

    /// Sets the key channel capacity (host → frame loop).
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (window: {}x{}, sizing: {:?}, quit: {:?}, channel: {})",
            self.window_width, self.window_height, self.sizing, self.quit_policy, self.channel_capacity
        );

        Engine {
            window: WindowConfig {
                title: self.title,
                width: self.window_width,
                height: self.window_height,
            },
            sizing: self.sizing,
            quit_policy: self.quit_policy,
            max_slots: self.max_slots,
            input_libraries: self.input_libraries,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Aetheric platform runtime.
///
/// Create via [`EngineBuilder`]. Everything runs on the calling thread,
/// which must be the main thread.
#[derive(Debug)]
pub struct Engine {
    window: WindowConfig,
    sizing: SurfaceSizing,
    quit_policy: QuitPolicy,
    max_slots: u32,
    input_libraries: Vec<String>,
    channel_capacity: usize,
}

impl Engine {
    /// Runs the frame loop until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Resolves the gamepad library (falls back to a stub)
    /// 2. Creates the key channel and the OS event loop
    /// 3. Pumps until the window is created and the backbuffer allocated
    /// 4. Runs frames: drain messages → poll pads → `callback` → present
    ///
    /// Under [`QuitPolicy::Abort`] an OS quit request terminates the
    /// process from inside this call.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::PlatformInit`] if the event loop or window
    /// cannot be created, and [`PlatformError::OutOfMemory`] if a backbuffer
    /// allocation fails.
    pub fn run<F: FrameCallback>(self, mut callback: F) -> Result<LoopExit, PlatformError> {
        info!("Starting engine runtime");

        //--- 1. Bind gamepad library -------------------------------------
        let pads = InputLibraryBinding::resolve(self.input_libraries.as_slice(), &LogSink);

        //--- 2. Create key channel ---------------------------------------
        let (tx, rx) = bounded(self.channel_capacity);
        let mut events = EventCollector::new(rx);
        info!("Key channel created (capacity: {})", self.channel_capacity);

        //--- 3. Launch the platform subsystem ----------------------------
        let window_host = WindowHost::new(LogSink, self.sizing, tx);
        let mut platform = Platform::new(self.window, window_host)?;
        let mut ctx = AppContext::new();

        //--- 4. Frame loop -----------------------------------------------
        let mut frame_loop = FrameLoop::new(self.max_slots, self.quit_policy);
        frame_loop.wait_for_window(&mut platform, &mut ctx)?;
        let exit = frame_loop.run(&mut platform, &mut ctx, &pads, &mut events, &mut callback)?;

        info!("Engine shutdown complete ({} frames)", exit.frames());
        Ok(exit)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.title, "Aetheric");
        assert_eq!((builder.window_width, builder.window_height), (1280, 720));
        assert_eq!(builder.sizing, SurfaceSizing::FollowWindow);
        assert_eq!(builder.quit_policy, QuitPolicy::Abort);
        assert_eq!(builder.max_slots, 4);
        assert_eq!(builder.input_libraries, ["xinput1_4.dll", "xinput9_1_0.dll", "xinput1_3.dll"]);
        assert_eq!(builder.channel_capacity, 128);
    }

    #[test]
    fn builder_with_window_size() {
        let builder = EngineBuilder::new().with_window_size(640, 480);
        assert_eq!((builder.window_width, builder.window_height), (640, 480));
    }

    #[test]
    #[should_panic(expected = "Window size must be non-zero")]
    fn builder_with_window_size_panics_on_zero() {
        EngineBuilder::new().with_window_size(0, 480);
    }

    #[test]
    #[should_panic(expected = "Backbuffer size must be non-zero")]
    fn builder_with_fixed_sizing_panics_on_zero() {
        EngineBuilder::new().with_surface_sizing(SurfaceSizing::Fixed { width: 1280, height: 0 });
    }

    #[test]
    fn builder_with_fixed_sizing() {
        let fixed = SurfaceSizing::Fixed { width: 1280, height: 720 };
        let builder = EngineBuilder::new().with_surface_sizing(fixed);
        assert_eq!(builder.sizing, fixed);
    }

    #[test]
    #[should_panic(expected = "Gamepad slots must be in 1..=4")]
    fn builder_with_max_slots_panics_on_zero() {
        EngineBuilder::new().with_max_slots(0);
    }

    #[test]
    #[should_panic(expected = "Gamepad slots must be in 1..=4")]
    fn builder_with_max_slots_panics_above_four() {
        EngineBuilder::new().with_max_slots(5);
    }

    #[test]
    fn builder_with_input_libraries_replaces_list() {
        let builder = EngineBuilder::new().with_input_libraries(["libgamepad.so"]);
        assert_eq!(builder.input_libraries, ["libgamepad.so"]);
    }

    #[test]
    #[should_panic(expected = "Input library list must not be empty")]
    fn builder_with_input_libraries_panics_on_empty() {
        EngineBuilder::new().with_input_libraries(Vec::<String>::new());
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_title("Demo")
            .with_window_size(800, 600)
            .with_quit_policy(QuitPolicy::Graceful)
            .with_max_slots(2)
            .with_channel_capacity(256)
            .build();

        assert_eq!(
            engine.window,
            WindowConfig { title: "Demo".into(), width: 800, height: 600 }
        );
        assert_eq!(engine.quit_policy, QuitPolicy::Graceful);
        assert_eq!(engine.max_slots, 2);
        assert_eq!(engine.channel_capacity, 256);
    }
}
