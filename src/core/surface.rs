//=========================================================================
// Presentation Surface
//=========================================================================
//
// CPU-addressable backbuffer the frame callback draws into and the host
// blits to the window.
//
// Architecture:
//   RasterAllocator ──reserve()──> PresentationSurface ──present()──> target
//                   <─release()──
//
// Memory layout:
// - 4 bytes per pixel, packed `0x00RRGGBB` (little-endian BGRX)
// - top-down rows: row 0 is the topmost scanline
// - no row padding: pitch == width * 4
//
// A resize never touches the old region in place. The previous allocation
// is handed back to the allocator first, then a fresh one is reserved, so
// there is at most one live region per surface at any time.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, trace};

//=== Constants ===========================================================

/// Bytes used by one packed pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Bits used by one packed pixel, as recorded in the format descriptor.
pub const BITS_PER_PIXEL: u16 = 32;

//=== SurfaceError ========================================================

/// Errors raised while (re)allocating the backbuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The allocator rejected the request, or the size cannot be described.
    OutOfMemory { width: u32, height: u32 },
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfMemory { width, height } => {
                write!(f, "Backbuffer allocation failed for {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

//=== RasterAllocator =====================================================

/// Host memory seam for backbuffer regions.
///
/// `reserve` returns a zeroed region of exactly `pixels` packed pixels, or
/// `None` when the host refuses. `release` takes back a region previously
/// returned by `reserve`.
pub trait RasterAllocator {
    fn reserve(&mut self, pixels: usize) -> Option<Box<[u32]>>;
    fn release(&mut self, region: Box<[u32]>);
}

/// Default allocator backed by the global heap.
///
/// Uses `try_reserve_exact` so an oversized request reports failure instead
/// of aborting the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl RasterAllocator for HeapAllocator {
    fn reserve(&mut self, pixels: usize) -> Option<Box<[u32]>> {
        let mut region = Vec::new();
        region.try_reserve_exact(pixels).ok()?;
        region.resize(pixels, 0);
        Some(region.into_boxed_slice())
    }

    fn release(&mut self, region: Box<[u32]>) {
        drop(region);
    }
}

//=== PixelFormat =========================================================

/// Row ordering of the backbuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    TopDown,
    BottomUp,
}

/// Pixel compression declared to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Uncompressed packed RGB.
    Rgb,
}

/// Descriptor handed to the host alongside the raw pixels.
///
/// The declared height is negative for top-down rasters, so
/// `height == -(logical height)` for every surface this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: Compression,
}

impl PixelFormat {
    /// Describes a top-down 32-bit uncompressed raster.
    pub fn top_down(width: i32, height: i32) -> Self {
        Self {
            width,
            height: -height,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: Compression::Rgb,
        }
    }

    pub fn scan_order(&self) -> ScanOrder {
        if self.height <= 0 {
            ScanOrder::TopDown
        } else {
            ScanOrder::BottomUp
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::top_down(0, 0)
    }
}

//=== PresentationSurface =================================================

/// Resizable, exclusively owned backbuffer.
///
/// Invariants:
/// - `buffer` is `None` iff `width == 0 || height == 0`
/// - otherwise `buffer.len() == width * height`
/// - `format.width == width` and `format.height == -height`
pub struct PresentationSurface {
    format: PixelFormat,
    buffer: Option<Box<[u32]>>,
    width: u32,
    height: u32,
    allocator: Box<dyn RasterAllocator>,
}

impl PresentationSurface {
    //--- Construction -----------------------------------------------------

    /// Creates an empty 0x0 surface backed by the heap.
    pub fn new() -> Self {
        Self::with_allocator(Box::new(HeapAllocator))
    }

    /// Creates an empty 0x0 surface backed by a custom allocator.
    pub fn with_allocator(allocator: Box<dyn RasterAllocator>) -> Self {
        Self {
            format: PixelFormat::default(),
            buffer: None,
            width: 0,
            height: 0,
            allocator,
        }
    }

    //--- Resize -----------------------------------------------------------

    /// Releases the current region and allocates a fresh `width x height`
    /// raster.
    ///
    /// On failure the surface is left empty (0x0, no region) and the error
    /// is returned to the caller, which treats it as fatal.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if let Some(region) = self.buffer.take() {
            trace!(target: "platform::surface", "Releasing {}x{} backbuffer", self.width, self.height);
            self.allocator.release(region);
        }

        self.width = 0;
        self.height = 0;
        self.format = PixelFormat::default();

        if width == 0 || height == 0 {
            debug!(target: "platform::surface", "Backbuffer cleared ({}x{})", width, height);
            return Ok(());
        }

        let oom = SurfaceError::OutOfMemory { width, height };

        let (Ok(format_width), Ok(format_height)) = (i32::try_from(width), i32::try_from(height))
        else {
            error!(target: "platform::surface", "{}", oom);
            return Err(oom);
        };

        let Some(pixels) = (width as usize).checked_mul(height as usize) else {
            error!(target: "platform::surface", "{}", oom);
            return Err(oom);
        };
        if pixels.checked_mul(BYTES_PER_PIXEL).is_none() {
            error!(target: "platform::surface", "{}", oom);
            return Err(oom);
        }

        let Some(region) = self.allocator.reserve(pixels) else {
            error!(target: "platform::surface", "{}", oom);
            return Err(oom);
        };

        self.buffer = Some(region);
        self.width = width;
        self.height = height;
        self.format = PixelFormat::top_down(format_width, format_height);

        debug!(
            target: "platform::surface",
            "Backbuffer allocated: {}x{} ({} bytes)",
            width,
            height,
            self.byte_len()
        );
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Size of the owned region in bytes (0 when empty).
    pub fn byte_len(&self) -> usize {
        self.pixels().len() * BYTES_PER_PIXEL
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    /// Packed pixels in top-down row order.
    pub fn pixels(&self) -> &[u32] {
        self.buffer.as_deref().unwrap_or(&[])
    }

    //--- Indexed Writes ---------------------------------------------------

    /// Mutable view of row `y` (top-down), or `None` if out of range.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        if y >= self.height {
            return None;
        }
        let width = self.width as usize;
        let start = y as usize * width;
        self.buffer
            .as_deref_mut()
            .map(|pixels| &mut pixels[start..start + width])
    }

    /// Iterates over all rows, top to bottom. Yields nothing when empty.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u32]> {
        let width = (self.width as usize).max(1);
        self.buffer
            .as_deref_mut()
            .unwrap_or(&mut [])
            .chunks_exact_mut(width)
    }

    /// Writes one pixel. Returns `false` if `(x, y)` is outside the raster.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: u32) -> bool {
        if x >= self.width {
            return false;
        }
        match self.row_mut(y) {
            Some(row) => {
                row[x as usize] = color;
                true
            }
            None => false,
        }
    }

    //--- Presentation -----------------------------------------------------

    /// Stretches the backbuffer into a `target_width x target_height`
    /// destination using nearest-neighbour sampling.
    ///
    /// Source reads stay inside `[0, width) x [0, height)`. Destination rows
    /// beyond `target.len()` are skipped. An empty surface paints black.
    pub fn present(&self, target: &mut [u32], target_width: u32, target_height: u32) {
        if target_width == 0 || target_height == 0 {
            return;
        }

        let dst_width = target_width as usize;
        let dst_rows = target.chunks_exact_mut(dst_width).take(target_height as usize);

        let Some(source) = self.buffer.as_deref() else {
            for row in dst_rows {
                row.fill(0);
            }
            return;
        };

        let src_width = self.width as usize;
        let src_height = self.height as usize;
        let dst_height = target_height as usize;

        for (dy, row) in dst_rows.enumerate() {
            let sy = dy * src_height / dst_height;
            let src_row = &source[sy * src_width..(sy + 1) * src_width];
            for (dx, pixel) in row.iter_mut().enumerate() {
                let sx = dx * src_width / dst_width;
                *pixel = src_row[sx];
            }
        }
    }
}

impl Default for PresentationSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PresentationSurface {
    fn drop(&mut self) {
        if let Some(region) = self.buffer.take() {
            self.allocator.release(region);
        }
    }
}

impl std::fmt::Debug for PresentationSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("byte_len", &self.byte_len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
