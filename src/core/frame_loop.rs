//=========================================================================
// Frame Loop
//=========================================================================
//
// Top-level per-frame driver.
//
// Each iteration:
// ```text
//   1. host.pump()          drain queued window messages (non-blocking)
//   2. poll_all()           sweep controller slots
//   3. callback.frame()     write the backbuffer in place
//   4. host.present()       blit to the current client area
//   5. frame_index += 1
// ```
//
// No pacing: no sleep, no vsync wait. The loop runs until the window host
// leaves the Running state or a fatal error is recorded.
//
// A host quit signal (distinct from window close) follows `QuitPolicy`.
// Under `Abort` the process terminates on the spot with
// `FATAL_QUIT_EXIT_CODE`; destructors and flushes do not run.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::{AppContext, HostState};
use crate::core::input::{
    poll_all, DeviceUnavailable, GamepadSlot, GamepadSource, KeyEvent, Vibration,
    MAX_GAMEPAD_SLOTS,
};
use crate::core::platform_bridge::{EventCollector, HostPump, PlatformError, PumpOutcome};
use crate::core::surface::PresentationSurface;

//=== Constants ===========================================================

/// Process exit code for the fatal quit path.
pub const FATAL_QUIT_EXIT_CODE: i32 = -1;

/// Pumps allowed for the window to appear before startup gives up.
pub const DEFAULT_STARTUP_PUMPS: u32 = 256;

//=== QuitPolicy ==========================================================

/// Reaction to a host quit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuitPolicy {
    /// Terminate the process immediately, skipping all cleanup.
    #[default]
    Abort,

    /// Return [`LoopExit::Quit`] and let the caller unwind.
    Graceful,
}

//=== LoopExit ============================================================

/// Why [`FrameLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Window closed normally.
    Closed { frames: u64 },

    /// Host quit signal under [`QuitPolicy::Graceful`].
    Quit { code: i32, frames: u64 },
}

impl LoopExit {
    pub fn frames(&self) -> u64 {
        match *self {
            Self::Closed { frames } | Self::Quit { frames, .. } => frames,
        }
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Self::Closed { .. } => 0,
            Self::Quit { code, .. } => code,
        }
    }
}

//=== FrameInput ==========================================================

/// Input handed to the frame callback for one frame.
pub struct FrameInput<'a> {
    /// Connected controllers, ascending slot order.
    pub gamepads: &'a [GamepadSlot],

    /// Key edges since the previous frame, in arrival order.
    pub keys: &'a [KeyEvent],

    pads: &'a dyn GamepadSource,
}

impl<'a> FrameInput<'a> {
    pub fn new(
        gamepads: &'a [GamepadSlot],
        keys: &'a [KeyEvent],
        pads: &'a dyn GamepadSource,
    ) -> Self {
        Self { gamepads, keys, pads }
    }

    /// Forwards a rumble request to the gamepad backend.
    pub fn set_vibration(&self, slot: u32, vibration: Vibration) -> Result<(), DeviceUnavailable> {
        self.pads.set_vibration(slot, vibration)
    }
}

//=== FrameCallback =======================================================

/// Per-frame render/simulation hook.
///
/// Mutates the backbuffer in place; the loop never inspects the result.
pub trait FrameCallback {
    fn frame(&mut self, surface: &mut PresentationSurface, input: &FrameInput<'_>, frame_index: u64);
}

impl<F> FrameCallback for F
where
    F: FnMut(&mut PresentationSurface, &FrameInput<'_>, u64),
{
    fn frame(&mut self, surface: &mut PresentationSurface, input: &FrameInput<'_>, frame_index: u64) {
        self(surface, input, frame_index)
    }
}

//=== FrameLoop ===========================================================

/// Drives pump → poll → frame → present until the host stops running.
pub struct FrameLoop {
    max_slots: u32,
    quit_policy: QuitPolicy,
    startup_pumps: u32,
    terminate: fn(i32) -> !,
    frame_index: u64,
}

impl FrameLoop {
    //--- Construction -----------------------------------------------------

    pub fn new(max_slots: u32, quit_policy: QuitPolicy) -> Self {
        Self {
            max_slots,
            quit_policy,
            startup_pumps: DEFAULT_STARTUP_PUMPS,
            terminate: terminate_process,
            frame_index: 0,
        }
    }

    /// Replaces the function used by [`QuitPolicy::Abort`].
    pub fn with_terminate(mut self, terminate: fn(i32) -> !) -> Self {
        self.terminate = terminate;
        self
    }

    pub fn with_startup_pumps(mut self, pumps: u32) -> Self {
        self.startup_pumps = pumps;
        self
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    //--- Startup ----------------------------------------------------------

    /// Pumps messages until the window host reaches Running.
    ///
    /// # Errors
    ///
    /// Returns the fatal error recorded by the host, or
    /// [`PlatformError::PlatformInit`] if the window closes, the host quits,
    /// or no window appears within the pump budget.
    pub fn wait_for_window<H>(&self, host: &mut H, ctx: &mut AppContext) -> Result<(), PlatformError>
    where
        H: HostPump + ?Sized,
    {
        debug!(target: "core::frame_loop", "Waiting for window ({} pumps max)", self.startup_pumps);

        for _ in 0..self.startup_pumps {
            if let PumpOutcome::Quit(code) = host.pump(ctx) {
                return Err(PlatformError::PlatformInit(format!(
                    "host quit during startup (code {})",
                    code
                )));
            }

            if let Some(e) = ctx.take_fatal() {
                return Err(e);
            }

            match ctx.state() {
                HostState::Running => return Ok(()),
                HostState::Closed => {
                    return Err(PlatformError::PlatformInit("window closed during startup".into()))
                }
                HostState::Uninitialized | HostState::Created => {}
            }
        }

        Err(PlatformError::PlatformInit("window was not created".into()))
    }

    //--- Execution --------------------------------------------------------

    /// Runs frames until the host stops running.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error recorded by a message handler, such as
    /// [`PlatformError::OutOfMemory`] from a backbuffer resize.
    pub fn run<H, G, F>(
        &mut self,
        host: &mut H,
        ctx: &mut AppContext,
        pads: &G,
        events: &mut EventCollector,
        callback: &mut F,
    ) -> Result<LoopExit, PlatformError>
    where
        H: HostPump + ?Sized,
        G: GamepadSource,
        F: FrameCallback + ?Sized,
    {
        info!(target: "core::frame_loop", "Frame loop started ({} gamepad slots)", self.max_slots);

        let mut gamepads: Vec<GamepadSlot> = Vec::with_capacity(MAX_GAMEPAD_SLOTS as usize);

        while ctx.is_running() {
            //--- 1. Drain window messages ------------------------------
            if let PumpOutcome::Quit(code) = host.pump(ctx) {
                return Ok(self.quit(code));
            }

            if let Some(e) = ctx.take_fatal() {
                error!(target: "core::frame_loop", "Fatal error, stopping loop: {}", e);
                return Err(e);
            }

            if !ctx.is_running() {
                break;
            }

            //--- 2. Poll gamepads --------------------------------------
            gamepads.clear();
            gamepads.extend(poll_all(pads, self.max_slots));

            //--- 3. Frame callback -------------------------------------
            let input = FrameInput::new(&gamepads, events.collect_frame(), pads);
            callback.frame(&mut ctx.surface, &input, self.frame_index);

            //--- 4. Present --------------------------------------------
            if let Err(e) = host.present(&ctx.surface) {
                warn!(target: "core::frame_loop", "Frame {} not presented: {}", self.frame_index, e);
            }

            //--- 5. Advance --------------------------------------------
            self.frame_index += 1;
        }

        info!(target: "core::frame_loop", "Frame loop stopped after {} frames", self.frame_index);
        Ok(LoopExit::Closed { frames: self.frame_index })
    }

    //--- Internal Helpers -------------------------------------------------

    fn quit(&self, host_code: i32) -> LoopExit {
        warn!(target: "core::frame_loop", "Host quit signal received (code {})", host_code);

        match self.quit_policy {
            QuitPolicy::Abort => {
                error!(target: "core::frame_loop", "Terminating without cleanup");
                (self.terminate)(FATAL_QUIT_EXIT_CODE)
            }
            QuitPolicy::Graceful => LoopExit::Quit {
                code: FATAL_QUIT_EXIT_CODE,
                frames: self.frame_index,
            },
        }
    }
}

fn terminate_process(code: i32) -> ! {
    std::process::exit(code)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debug::testing::RecordingSink;
    use crate::core::host::testing::RecordingPresenter;
    use crate::core::host::{SurfaceSizing, WindowHost};
    use crate::core::input::{GamepadButtons, GamepadSnapshot, InputLibraryBinding, KeyCode};
    use crate::core::platform_bridge::{HostMessage, Presenter};
    use crate::core::surface::RasterAllocator;
    use crossbeam_channel::unbounded;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Trace = Rc<RefCell<Vec<String>>>;

    const FIXED: SurfaceSizing = SurfaceSizing::Fixed { width: 1280, height: 720 };

    /// Delivers a scripted batch of messages per pump.
    struct ScriptedHost {
        window_host: WindowHost<RecordingSink>,
        presenter: RecordingPresenter,
        script: VecDeque<Vec<HostMessage>>,
        quit_on_pump: Option<usize>,
        pumps: usize,
        trace: Trace,
    }

    impl ScriptedHost {
        fn new(trace: Trace, events: &mut Option<EventCollector>, sizing: SurfaceSizing) -> Self {
            let (tx, rx) = unbounded();
            *events = Some(EventCollector::new(rx));
            Self {
                window_host: WindowHost::new(RecordingSink::default(), sizing, tx),
                presenter: RecordingPresenter::new(640, 360),
                script: VecDeque::new(),
                quit_on_pump: None,
                pumps: 0,
                trace,
            }
        }

        fn then(mut self, batch: Vec<HostMessage>) -> Self {
            self.script.push_back(batch);
            self
        }
    }

    impl HostPump for ScriptedHost {
        fn pump(&mut self, ctx: &mut AppContext) -> PumpOutcome {
            self.trace.borrow_mut().push("pump".into());
            self.pumps += 1;
            if self.quit_on_pump == Some(self.pumps) {
                return PumpOutcome::Quit(0);
            }
            for message in self.script.pop_front().unwrap_or_default() {
                self.window_host.handle(ctx, message, &mut self.presenter);
            }
            PumpOutcome::Continue
        }

        fn present(&mut self, surface: &PresentationSurface) -> Result<(), PlatformError> {
            self.trace.borrow_mut().push("present".into());
            let (width, height) = self.presenter.client_size();
            self.presenter.present(surface, width, height)
        }
    }

    /// Reports slot 1 connected and traces every poll.
    struct TracedPads {
        trace: Trace,
        vibrations: RefCell<Vec<(u32, Vibration)>>,
    }

    impl GamepadSource for TracedPads {
        fn get_state(&self, slot: u32) -> Option<GamepadSnapshot> {
            self.trace.borrow_mut().push(format!("poll {}", slot));
            (slot == 1).then(|| GamepadSnapshot {
                buttons: GamepadButtons::START,
                ..Default::default()
            })
        }

        fn set_vibration(&self, slot: u32, vibration: Vibration) -> Result<(), DeviceUnavailable> {
            self.vibrations.borrow_mut().push((slot, vibration));
            Ok(())
        }
    }

    struct ShrinkingAllocator {
        limit: usize,
    }

    impl RasterAllocator for ShrinkingAllocator {
        fn reserve(&mut self, pixels: usize) -> Option<Box<[u32]>> {
            (pixels <= self.limit).then(|| vec![0; pixels].into_boxed_slice())
        }

        fn release(&mut self, _region: Box<[u32]>) {}
    }

    fn created() -> HostMessage {
        HostMessage::Created { width: 640, height: 360 }
    }

    fn started(host: &mut ScriptedHost, ctx: &mut AppContext) {
        FrameLoop::new(4, QuitPolicy::Graceful)
            .wait_for_window(host, ctx)
            .unwrap();
    }

    fn panic_terminate(code: i32) -> ! {
        panic!("terminated with {}", code)
    }

    //=====================================================================
    // Startup Tests
    //=====================================================================

    #[test]
    fn wait_for_window_returns_once_running() {
        let trace = Trace::default();
        let mut events = None;
        let mut host = ScriptedHost::new(trace.clone(), &mut events, FIXED)
            .then(vec![])
            .then(vec![created()]);
        let mut ctx = AppContext::new();

        FrameLoop::new(4, QuitPolicy::Graceful)
            .wait_for_window(&mut host, &mut ctx)
            .unwrap();

        assert!(ctx.is_running());
        assert_eq!(host.pumps, 2);
    }

    #[test]
    fn wait_for_window_gives_up_after_budget() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED);
        let mut ctx = AppContext::new();

        let result = FrameLoop::new(4, QuitPolicy::Graceful)
            .with_startup_pumps(3)
            .wait_for_window(&mut host, &mut ctx);

        assert!(matches!(result, Err(PlatformError::PlatformInit(_))));
        assert_eq!(host.pumps, 3);
    }

    #[test]
    fn wait_for_window_reports_startup_out_of_memory() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![created()]);
        let mut ctx = AppContext::with_surface(PresentationSurface::with_allocator(Box::new(
            ShrinkingAllocator { limit: 0 },
        )));

        let result = FrameLoop::new(4, QuitPolicy::Graceful).wait_for_window(&mut host, &mut ctx);

        assert_eq!(result, Err(PlatformError::OutOfMemory { width: 1280, height: 720 }));
    }

    #[test]
    fn wait_for_window_rejects_close_during_startup() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![HostMessage::Close]);
        let mut ctx = AppContext::new();

        let result = FrameLoop::new(4, QuitPolicy::Graceful).wait_for_window(&mut host, &mut ctx);

        assert!(matches!(result, Err(PlatformError::PlatformInit(_))));
    }

    //=====================================================================
    // Run Tests
    //=====================================================================

    #[test]
    fn iteration_order_is_pump_poll_frame_present() {
        let trace = Trace::default();
        let mut events = None;
        let mut host = ScriptedHost::new(trace.clone(), &mut events, FIXED)
            .then(vec![created()])
            .then(vec![])
            .then(vec![HostMessage::Close]);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();
        started(&mut host, &mut ctx);
        trace.borrow_mut().clear();

        let pads = TracedPads { trace: trace.clone(), vibrations: RefCell::default() };
        let frame_trace = trace.clone();
        let mut callback = move |_: &mut PresentationSurface, _: &FrameInput<'_>, index: u64| {
            frame_trace.borrow_mut().push(format!("frame {}", index));
        };

        let exit = FrameLoop::new(2, QuitPolicy::Graceful)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback)
            .unwrap();

        assert_eq!(exit, LoopExit::Closed { frames: 1 });
        assert_eq!(
            *trace.borrow(),
            vec!["pump", "poll 0", "poll 1", "frame 0", "present", "pump"]
        );
    }

    #[test]
    fn frame_index_advances_and_input_is_delivered() {
        let mut events = None;
        let key = |is_down: bool| HostMessage::Key { key: KeyCode::KeyW, was_down: !is_down, is_down };
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![created()])
            .then(vec![key(true), HostMessage::Key { key: KeyCode::KeyW, was_down: true, is_down: true }])
            .then(vec![])
            .then(vec![key(false)])
            .then(vec![HostMessage::Close]);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();
        started(&mut host, &mut ctx);

        let pads = TracedPads { trace: Trace::default(), vibrations: RefCell::default() };
        let mut seen: Vec<(u64, usize, Vec<KeyEvent>)> = Vec::new();
        let mut callback = |_: &mut PresentationSurface, input: &FrameInput<'_>, index: u64| {
            seen.push((index, input.gamepads.len(), input.keys.to_vec()));
        };

        let mut frame_loop = FrameLoop::new(4, QuitPolicy::Graceful);
        let exit = frame_loop
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback)
            .unwrap();

        assert_eq!(exit.frames(), 3);
        assert_eq!(frame_loop.frame_index(), 3);
        assert_eq!(exit.exit_code(), 0);
        assert_eq!(seen.iter().map(|s| s.0).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(seen.iter().all(|s| s.1 == 1), "Only slot 1 is connected");
        assert_eq!(seen[0].2.len(), 1, "Repeat suppressed");
        assert!(seen[1].2.is_empty());
        assert!(seen[2].2[0].is_release());
    }

    #[test]
    fn callback_writes_are_presented() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![created()])
            .then(vec![])
            .then(vec![HostMessage::Close]);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();
        started(&mut host, &mut ctx);

        let pads = InputLibraryBinding::Stub;
        let mut callback = |surface: &mut PresentationSurface, _: &FrameInput<'_>, index: u64| {
            surface.put_pixel(0, 0, index as u32 + 10);
        };

        FrameLoop::new(4, QuitPolicy::Graceful)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback)
            .unwrap();

        let firsts: Vec<Option<u32>> = host.presenter.calls.iter().map(|c| c.first_pixel).collect();
        assert_eq!(firsts, vec![Some(10)]);
        assert_eq!(host.presenter.calls[0].source, (1280, 720));
        assert_eq!(host.presenter.calls[0].target, (640, 360));
    }

    #[test]
    fn vibration_reaches_backend() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![created()])
            .then(vec![])
            .then(vec![HostMessage::Close]);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();
        started(&mut host, &mut ctx);

        let pads = TracedPads { trace: Trace::default(), vibrations: RefCell::default() };
        let mut callback = |_: &mut PresentationSurface, input: &FrameInput<'_>, _: u64| {
            for pad in input.gamepads {
                input.set_vibration(pad.slot, Vibration::FULL).unwrap();
            }
        };

        FrameLoop::new(4, QuitPolicy::Graceful)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback)
            .unwrap();

        assert_eq!(*pads.vibrations.borrow(), vec![(1, Vibration::FULL)]);
    }

    #[test]
    fn resize_out_of_memory_stops_loop() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, SurfaceSizing::FollowWindow)
            .then(vec![created()])
            .then(vec![])
            .then(vec![HostMessage::Resized { width: 4000, height: 4000 }]);
        let mut events = events.unwrap();
        let mut ctx = AppContext::with_surface(PresentationSurface::with_allocator(Box::new(
            ShrinkingAllocator { limit: 640 * 360 },
        )));
        started(&mut host, &mut ctx);

        let pads = InputLibraryBinding::Stub;
        let mut frames = 0;
        let mut callback = |_: &mut PresentationSurface, _: &FrameInput<'_>, _: u64| frames += 1;

        let result = FrameLoop::new(4, QuitPolicy::Graceful)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback);

        assert_eq!(result, Err(PlatformError::OutOfMemory { width: 4000, height: 4000 }));
        assert_eq!(frames, 1, "No frame after the fatal resize");
    }

    #[test]
    fn not_running_returns_immediately() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();

        let pads = InputLibraryBinding::Stub;
        let mut callback = |_: &mut PresentationSurface, _: &FrameInput<'_>, _: u64| {};

        let exit = FrameLoop::new(4, QuitPolicy::Graceful)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback)
            .unwrap();

        assert_eq!(exit, LoopExit::Closed { frames: 0 });
        assert_eq!(host.pumps, 0);
    }

    //=====================================================================
    // Quit Tests
    //=====================================================================

    #[test]
    fn graceful_quit_returns_sentinel() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![created()]);
        host.quit_on_pump = Some(3);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();
        started(&mut host, &mut ctx);

        let pads = InputLibraryBinding::Stub;
        let mut callback = |_: &mut PresentationSurface, _: &FrameInput<'_>, _: u64| {};

        let exit = FrameLoop::new(4, QuitPolicy::Graceful)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback)
            .unwrap();

        assert_eq!(exit, LoopExit::Quit { code: FATAL_QUIT_EXIT_CODE, frames: 1 });
        assert!(exit.exit_code() < 0);
    }

    #[test]
    #[should_panic(expected = "terminated with -1")]
    fn abort_quit_terminates() {
        let mut events = None;
        let mut host = ScriptedHost::new(Trace::default(), &mut events, FIXED)
            .then(vec![created()]);
        host.quit_on_pump = Some(2);
        let mut events = events.unwrap();
        let mut ctx = AppContext::new();
        started(&mut host, &mut ctx);

        let pads = InputLibraryBinding::Stub;
        let mut callback = |_: &mut PresentationSurface, _: &FrameInput<'_>, _: u64| {};

        let _ = FrameLoop::new(4, QuitPolicy::Abort)
            .with_terminate(panic_terminate)
            .run(&mut host, &mut ctx, &pads, &mut events, &mut callback);
    }

    #[test]
    fn quit_policy_defaults_to_abort() {
        assert_eq!(QuitPolicy::default(), QuitPolicy::Abort);
    }
}
