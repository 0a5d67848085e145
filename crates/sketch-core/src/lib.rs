pub mod bitmap;
pub mod codec;
pub mod color;
pub mod figure;
pub mod raster;

pub use bitmap::{Bitmap, Snapshot};
pub use codec::{CodecError, ImageFormat, decode_data_url, encode_data_url};
pub use color::Color;
pub use figure::{Figure, Pen};
pub use raster::draw_figure;

// Re-export kurbo's point type so downstream crates don't need a direct dependency
pub use kurbo::Point;
