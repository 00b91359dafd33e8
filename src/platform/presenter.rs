//=========================================================================
// Window Surface
//=========================================================================
//
// The OS window plus the softbuffer target its client area is blitted to.
//
// softbuffer hands out a `u32`-per-pixel `0x00RRGGBB` frame, the same
// packing as the backbuffer, so presenting is a straight nearest-neighbour
// stretch with no format conversion. The softbuffer frame is resized
// lazily to the client size on the first present after a change.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::num::NonZeroU32;
use std::rc::Rc;

//=== External Dependencies ===============================================

use log::{debug, trace};
use softbuffer::{Context, Surface};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{PlatformError, Presenter};
use crate::core::surface::PresentationSurface;

//=== WindowSurface =======================================================

pub(crate) struct WindowSurface {
    surface: Surface<Rc<Window>, Rc<Window>>,
    _context: Context<Rc<Window>>,
    window: Rc<Window>,
    target_size: (u32, u32),
}

impl WindowSurface {
    /// Wraps a freshly created window in a presentation target.
    pub(crate) fn new(window: Window) -> Result<Self, PlatformError> {
        let window = Rc::new(window);

        let context = Context::new(window.clone())
            .map_err(|e| PlatformError::PlatformInit(format!("presentation context: {}", e)))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| PlatformError::PlatformInit(format!("presentation surface: {}", e)))?;

        debug!(target: "platform", "Presentation target created");
        Ok(Self {
            surface,
            _context: context,
            window,
            target_size: (0, 0),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }
}

impl Presenter for WindowSurface {
    fn client_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn present(
        &mut self,
        surface: &PresentationSurface,
        width: u32,
        height: u32,
    ) -> Result<(), PlatformError> {
        let (Some(nz_width), Some(nz_height)) = (NonZeroU32::new(width), NonZeroU32::new(height))
        else {
            trace!(target: "platform", "Skipping present to {}x{} client area", width, height);
            return Ok(());
        };

        if self.target_size != (width, height) {
            self.surface
                .resize(nz_width, nz_height)
                .map_err(|e| PlatformError::Present(e.to_string()))?;
            self.target_size = (width, height);
        }

        let mut frame = self
            .surface
            .buffer_mut()
            .map_err(|e| PlatformError::Present(e.to_string()))?;

        surface.present(&mut frame, width, height);

        frame
            .present()
            .map_err(|e| PlatformError::Present(e.to_string()))
    }
}
