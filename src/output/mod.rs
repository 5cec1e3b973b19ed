//! Output encoders.

pub mod png_encoder;

pub use png_encoder::PngEncoder;
