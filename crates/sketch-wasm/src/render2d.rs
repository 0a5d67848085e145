//! Canvas2D presentation of the surface bitmap.
//!
//! The bitmap is already composited, so presenting it is a single
//! `putImageData` of the RGBA buffer at the origin.

use sketch_core::Bitmap;
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

/// Copy `bitmap` onto `ctx`, replacing whatever was drawn there.
pub fn blit(ctx: &CanvasRenderingContext2d, bitmap: &Bitmap) -> Result<(), JsValue> {
    let (width, height) = bitmap.dimensions();
    // ImageData rejects zero-sized buffers
    if width == 0 || height == 0 {
        return Ok(());
    }
    let data =
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(bitmap.as_rgba()), width, height)?;
    ctx.put_image_data(&data, 0.0, 0.0)
}
