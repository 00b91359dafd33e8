//=========================================================================
// Input Poller
//=========================================================================
//
// Per-frame sweep over the controller slots.
//
// Every slot in `[0, max_slots)` is queried, in ascending order. An absent
// slot is skipped and polling carries on with the next one, so one
// disconnected pad never hides the others.
//
//=========================================================================

use super::gamepad::{GamepadSnapshot, GamepadSource};

/// Number of controller slots the host input library exposes.
pub const MAX_GAMEPAD_SLOTS: u32 = 4;

/// One connected controller in this frame's sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadSlot {
    pub slot: u32,
    pub snapshot: GamepadSnapshot,
}

/// Lazily polls every slot in `[0, max_slots)`.
///
/// Nothing is cached: each call queries the source afresh, and the returned
/// iterator is finite and consumed once.
pub fn poll_all<G>(source: &G, max_slots: u32) -> impl Iterator<Item = GamepadSlot> + '_
where
    G: GamepadSource + ?Sized,
{
    (0..max_slots).filter_map(move |slot| {
        source
            .get_state(slot)
            .map(|snapshot| GamepadSlot { slot, snapshot })
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
