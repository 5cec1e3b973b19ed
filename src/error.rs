//! Error types for raster2d operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in raster2d operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer, grid or raster.
    #[error("Invalid dimensions: {nrows}x{ncols}")]
    InvalidDimensions {
        /// Row count.
        nrows: usize,
        /// Column count.
        ncols: usize,
    },

    /// A window whose derived pixel step vectors are degenerate.
    #[error("Degenerate window: {0}")]
    DegenerateWindow(String),

    /// Geometry that cannot be constructed (collinear triangle, empty ring, ...).
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Grid cell access outside the grid extent.
    #[error("Grid cell ({row}, {col}) outside {nrows}x{ncols} grid")]
    GridCellOutOfRange {
        /// Requested cell row.
        row: usize,
        /// Requested cell column.
        col: usize,
        /// Grid row count.
        nrows: usize,
        /// Grid column count.
        ncols: usize,
    },

    /// Malformed shoreline record that prevents further decoding.
    #[error("Malformed shoreline record (ring id {id}): {message}")]
    MalformedRecord {
        /// Source ring id from the stream.
        id: i32,
        /// What was wrong with the record.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { nrows: 0, ncols: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_grid_cell_out_of_range_display() {
        let err = Error::GridCellOutOfRange { row: 7, col: 3, nrows: 5, ncols: 5 };
        assert!(err.to_string().contains("(7, 3)"));
        assert!(err.to_string().contains("5x5"));
    }
}
