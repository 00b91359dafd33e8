//=========================================================================
// Dynamic Input Binding
//=========================================================================
//
// Resolves the optional host gamepad library once at startup.
//
// Resolution:
// ```text
//   names[0] ─load?─┐
//   names[1] ─load?─┼─ first hit ──> Bound { get_state?, set_state? }
//   ...             │
//   none loaded ────┴──────────────> Stub
// ```
//
// A missing library or a missing entry point is a normal condition. Each
// missing entry point falls back to stub behaviour on its own, so a
// library exporting only one of the two symbols still serves that one.
// Nothing is retried after startup.
//
//=========================================================================

//=== External Dependencies ===============================================

use libloading::Library;
use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::gamepad::{DeviceUnavailable, GamepadSnapshot, GamepadSource, RawGamepad, Vibration};
use crate::core::debug::DebugSink;

//=== Host ABI ============================================================

const ERROR_SUCCESS: u32 = 0;

const GET_STATE_SYMBOL: &[u8] = b"XInputGetState\0";
const SET_STATE_SYMBOL: &[u8] = b"XInputSetState\0";

/// Well-known library names, newest first.
pub const DEFAULT_INPUT_LIBRARIES: &[&str] = &["xinput1_4.dll", "xinput9_1_0.dll", "xinput1_3.dll"];

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct RawState {
    packet_number: u32,
    gamepad: RawGamepad,
}

type GetStateFn = unsafe extern "system" fn(slot: u32, state: *mut RawState) -> u32;
type SetStateFn = unsafe extern "system" fn(slot: u32, vibration: *mut Vibration) -> u32;

//=== BoundLibrary ========================================================

/// Entry points resolved from a loaded library.
///
/// The function pointers are only valid while `_library` is loaded; both
/// live and die together in this struct.
pub struct BoundLibrary {
    name: String,
    get_state: Option<GetStateFn>,
    set_state: Option<SetStateFn>,
    _library: Library,
}

impl BoundLibrary {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_get_state(&self) -> bool {
        self.get_state.is_some()
    }

    pub fn has_set_state(&self) -> bool {
        self.set_state.is_some()
    }
}

impl std::fmt::Debug for BoundLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundLibrary")
            .field("name", &self.name)
            .field("get_state", &self.get_state.is_some())
            .field("set_state", &self.set_state.is_some())
            .finish()
    }
}

//=== InputLibraryBinding =================================================

/// The gamepad backend chosen at startup.
///
/// Exactly one variant is active for the lifetime of the engine.
#[derive(Debug)]
pub enum InputLibraryBinding {
    /// Resolved from a host library (possibly partially).
    Bound(BoundLibrary),

    /// No library: every slot is absent, vibration is accepted and ignored.
    Stub,
}

impl InputLibraryBinding {
    //--- Resolution -------------------------------------------------------

    /// Tries each library name in order and binds the first that loads.
    ///
    /// Never fails. Falls back to [`InputLibraryBinding::Stub`] and emits a
    /// single diagnostic when no library is available.
    pub fn resolve(names: &[impl AsRef<str>], sink: &dyn DebugSink) -> Self {
        for name in names {
            let name = name.as_ref();

            // SAFETY: loading a system input library runs only its standard
            // initialisation routine.
            let library = match unsafe { Library::new(name) } {
                Ok(library) => library,
                Err(_) => continue,
            };

            // SAFETY: the symbol types match the host ABI declared above.
            let get_state = unsafe { library.get::<GetStateFn>(GET_STATE_SYMBOL) }
                .ok()
                .map(|symbol| *symbol);
            let set_state = unsafe { library.get::<SetStateFn>(SET_STATE_SYMBOL) }
                .ok()
                .map(|symbol| *symbol);

            if get_state.is_none() {
                warn!(target: "platform::input", "{}: XInputGetState missing, using stub", name);
                sink.emit("input library: get_state stubbed");
            }
            if set_state.is_none() {
                warn!(target: "platform::input", "{}: XInputSetState missing, using stub", name);
                sink.emit("input library: set_state stubbed");
            }

            info!(target: "platform::input", "Gamepad library bound: {}", name);
            return Self::Bound(BoundLibrary {
                name: name.to_string(),
                get_state,
                set_state,
                _library: library,
            });
        }

        info!(target: "platform::input", "No gamepad library available, gamepad input disabled");
        sink.emit("input library unavailable");
        Self::Stub
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

impl GamepadSource for InputLibraryBinding {
    fn get_state(&self, slot: u32) -> Option<GamepadSnapshot> {
        let Self::Bound(BoundLibrary { get_state: Some(get_state), .. }) = self else {
            return None;
        };

        let mut state = RawState::default();
        // SAFETY: `state` is a valid, writable RawState for the call.
        let status = unsafe { (*get_state)(slot, &mut state) };

        (status == ERROR_SUCCESS).then(|| GamepadSnapshot::decode(&state.gamepad))
    }

    fn set_vibration(&self, slot: u32, vibration: Vibration) -> Result<(), DeviceUnavailable> {
        let Self::Bound(BoundLibrary { set_state: Some(set_state), .. }) = self else {
            return Ok(());
        };

        let mut vibration = vibration;
        // SAFETY: `vibration` is a valid, readable Vibration for the call.
        let status = unsafe { (*set_state)(slot, &mut vibration) };

        if status == ERROR_SUCCESS {
            Ok(())
        } else {
            Err(DeviceUnavailable { slot })
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
