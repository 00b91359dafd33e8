//=========================================================================
// Platform Event Mapper
//
// Converts winit window events into core `HostMessage`s, keeping the
// window host free of winit types.
//
// Notes:
// - `KeyboardInput` goes through the input processor (edge bits).
// - `RedrawRequested` is the paint signal.
// - `Focused` stands in for application activation.
// - Everything else (cursor, IME, theme, ...) is ignored.
//
//=========================================================================

use winit::event::WindowEvent;

use super::input_processor;
use crate::core::platform_bridge::HostMessage;

/// Maps a winit window event, or `None` if the host does not care.
pub(crate) fn map_window_event(event: &WindowEvent) -> Option<HostMessage> {
    match event {
        WindowEvent::CloseRequested => Some(HostMessage::Close),
        WindowEvent::Destroyed => Some(HostMessage::Destroy),
        WindowEvent::Focused(focused) => Some(HostMessage::Activate(*focused)),
        WindowEvent::Resized(size) => Some(HostMessage::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput { event, .. } => input_processor::key_message(event),
        WindowEvent::RedrawRequested => Some(HostMessage::Paint),
        _ => None,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
