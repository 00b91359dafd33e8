//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges a windowing backend (winit today) with the core frame loop.
//
// This module defines the contract between platform implementations and
// core logic, so the backend can be swapped without touching the loop.
//
// Components:
// - `interface`: host messages, pump/presenter traits, error definitions
// - `event_collector`: frame-side collection of forwarded key edges
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub use event_collector::EventCollector;
pub use interface::{HostMessage, HostPump, PlatformError, Presenter, PumpOutcome};
