//! Pixel buffer and immutable snapshots.
//!
//! A `Bitmap` is the whole drawing: `width × height` RGBA pixels, row-major,
//! 4 bytes per pixel. A `Snapshot` is a frozen copy of one, shared through an
//! `Arc` so the undo history and the live preview can hold the same capture
//! without copying it again.

use crate::color::Color;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap with every pixel set to `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let px = fill.to_rgba();
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap raw RGBA bytes. Returns `None` when the length does not match
    /// the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.offset(x, y)?;
        let px = &self.pixels[i..i + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Overwrite one pixel. Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_rgba());
        }
    }

    /// Source-over composite `color` onto one pixel.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        if color.is_opaque() {
            self.set_pixel(x, y, color);
            return;
        }
        if color.a == 0 {
            return;
        }
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let dst = &mut self.pixels[i..i + 4];
        let sa = color.a as u32;
        let da = dst[3] as u32;
        // out_a = sa + da * (1 - sa), all in 0..=255 fixed point
        let out_a = sa + da * (255 - sa) / 255;
        if out_a == 0 {
            dst.copy_from_slice(&[0, 0, 0, 0]);
            return;
        }
        let src = [color.r, color.g, color.b];
        for c in 0..3 {
            let s = src[c] as u32 * sa;
            let d = dst[c] as u32 * da * (255 - sa) / 255;
            dst[c] = ((s + d) / out_a).min(255) as u8;
        }
        dst[3] = out_a as u8;
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let px = color.to_rgba();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Stretch into `width × height` with nearest-neighbour sampling.
    ///
    /// Aspect ratio is not preserved: the source rectangle maps onto the
    /// whole target rectangle.
    pub fn scaled(&self, width: u32, height: u32) -> Bitmap {
        if (width, height) == self.dimensions() {
            return self.clone();
        }
        if self.width == 0 || self.height == 0 {
            return Bitmap::new(width, height, Color::TRANSPARENT);
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                let i = (sy as usize * self.width as usize + sx as usize) * 4;
                pixels.extend_from_slice(&self.pixels[i..i + 4]);
            }
        }
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    /// Freeze a copy of the current pixels.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::new(self.clone()))
    }

    /// Count pixels equal to `color`. Mostly useful in tests and diagnostics.
    pub fn count_color(&self, color: Color) -> usize {
        let px = color.to_rgba();
        self.pixels.chunks_exact(4).filter(|c| *c == px).count()
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// An immutable capture of a `Bitmap`.
///
/// Cloning a snapshot is a reference-count bump.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<Bitmap>);

impl Snapshot {
    /// Copy the captured pixels back out into a mutable bitmap.
    pub fn to_bitmap(&self) -> Bitmap {
        (*self.0).clone()
    }

    /// Whether both snapshots share the same capture.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Snapshot {
    type Target = Bitmap;

    fn deref(&self) -> &Bitmap {
        &self.0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot({}x{})", self.0.width, self.0.height)
    }
}

impl From<Bitmap> for Snapshot {
    fn from(bitmap: Bitmap) -> Self {
        Snapshot(Arc::new(bitmap))
    }
}
