//! commitment-signature: the drawing surface behind the signature field.
//!
//! [`SignaturePad`] turns mouse and touch events into strokes on a
//! [`Canvas`] and emits a PNG data URI whenever a stroke is finalized (or
//! an empty string when the pad is cleared). [`render_strokes`] replays a
//! recorded [`StrokeSet`] through the same path in one call.

mod canvas;
mod encode;
mod error;
mod pad;

pub use canvas::{Canvas, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use encode::{decode_data_uri, encode_png_data_uri, strip_data_uri_prefix, PNG_DATA_URI_PREFIX};
pub use error::SignatureError;
pub use pad::{
    is_touch_device, render_strokes, PadLayout, Point, PointerEvent, SignaturePad, StrokeSet,
    MAX_STROKE_POINTS,
};
