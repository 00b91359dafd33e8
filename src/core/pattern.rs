//=========================================================================
// Gradient Pattern
//=========================================================================
//
// Placeholder frame callback standing in for real rendering.
//
// Writes a scrolling blue/green gradient:
//   pixel(x, y) = (green << 8) | blue
//   blue  = (x + blue_offset)  mod 256
//   green = (y + green_offset) mod 256
//
// `blue_offset` follows the frame index. Gamepad left stick Y and the W/S
// keys nudge `green_offset`. Holding A on a pad rumbles that pad.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::frame_loop::{FrameCallback, FrameInput};
use crate::core::input::{GamepadButtons, KeyCode, Vibration};
use crate::core::surface::PresentationSurface;

//=== GradientPattern =====================================================

/// Scrolling two-channel gradient.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GradientPattern {
    blue_offset: u32,
    green_offset: u32,
    green_velocity: i32,
}

impl GradientPattern {
    /// Stick values are divided by this before nudging the green offset.
    const STICK_SCALE: i32 = 4096;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn offsets(&self) -> (u32, u32) {
        (self.blue_offset, self.green_offset)
    }

    /// Packs the gradient colour for `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> u32 {
        let blue = x.wrapping_add(self.blue_offset) as u8;
        let green = y.wrapping_add(self.green_offset) as u8;
        (u32::from(green) << 8) | u32::from(blue)
    }

    /// Writes the gradient over the whole surface.
    pub fn render(&self, surface: &mut PresentationSurface) {
        for (y, row) in surface.rows_mut().enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = self.color_at(x as u32, y as u32);
            }
        }
    }

    //--- Input ------------------------------------------------------------

    fn apply_input(&mut self, input: &FrameInput<'_>) {
        for key in input.keys {
            let delta = match key.key {
                KeyCode::KeyW => -1,
                KeyCode::KeyS => 1,
                _ => continue,
            };
            self.green_velocity += if key.is_press() { delta } else { -delta };
            debug!(target: "core::pattern", "{:?} {}", key.key, if key.is_press() { "down" } else { "up" });
        }

        let mut stick = 0;
        for pad in input.gamepads {
            stick += i32::from(pad.snapshot.left_stick_y) / Self::STICK_SCALE;

            let rumble = if pad.snapshot.is_pressed(GamepadButtons::A) {
                Vibration::FULL
            } else {
                Vibration::OFF
            };
            if let Err(e) = input.set_vibration(pad.slot, rumble) {
                trace!(target: "core::pattern", "{}", e);
            }
        }

        let step = self.green_velocity - stick;
        self.green_offset = self.green_offset.wrapping_add_signed(step);
    }
}

impl FrameCallback for GradientPattern {
    fn frame(&mut self, surface: &mut PresentationSurface, input: &FrameInput<'_>, frame_index: u64) {
        self.apply_input(input);
        self.blue_offset = frame_index as u32;
        self.render(surface);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
