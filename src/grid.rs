//! Scalar grids: rectangular rasters of f64 cell values with world-space
//! extents, painted through a [`crate::colormap::ColorMap`].

use crate::error::{Error, Result};
use crate::geom::{Aabb, Point};
use crate::precision::{Precision, Scalar};

/// A row/col addressed scalar raster positioned in world space.
///
/// Row 0 is the southern (minimum-y) row, matching the renderer's bottom-up
/// row convention.
#[derive(Debug, Clone)]
pub struct ScalarGrid<S> {
    nrows: usize,
    ncols: usize,
    bounds: Aabb<S>,
    cell_width: S,
    cell_height: S,
    values: Vec<f64>,
}

impl<S: Scalar> ScalarGrid<S> {
    /// Create a grid of `nrows` x `ncols` cells spanning `bounds`, all
    /// values zero.
    pub fn new<P: Precision<Scalar = S>>(
        nrows: usize,
        ncols: usize,
        bounds: Aabb<S>,
        ctx: &P,
    ) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::InvalidDimensions { nrows, ncols });
        }
        let cell_width =
            (bounds.max_x.clone() - bounds.min_x.clone()) / ctx.from_i64(ncols as i64);
        let cell_height =
            (bounds.max_y.clone() - bounds.min_y.clone()) / ctx.from_i64(nrows as i64);
        if ctx.is_zero(&cell_width) || ctx.is_zero(&cell_height) {
            return Err(Error::DegenerateWindow(
                "grid bounds collapse to zero-size cells".to_string(),
            ));
        }
        Ok(Self {
            nrows,
            ncols,
            bounds,
            cell_width,
            cell_height,
            values: vec![0.0; nrows * ncols],
        })
    }

    /// Row count.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Column count.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// World-space extent.
    pub fn bounds(&self) -> &Aabb<S> {
        &self.bounds
    }

    /// World x of the centre of column `col`.
    pub fn cell_x<P: Precision<Scalar = S>>(&self, col: usize, ctx: &P) -> S {
        self.bounds.min_x.clone()
            + self.cell_width.clone() * (ctx.from_i64(col as i64) + ctx.ratio(1, 2))
    }

    /// World y of the centre of row `row`.
    pub fn cell_y<P: Precision<Scalar = S>>(&self, row: usize, ctx: &P) -> S {
        self.bounds.min_y.clone()
            + self.cell_height.clone() * (ctx.from_i64(row as i64) + ctx.ratio(1, 2))
    }

    /// World-space centre of cell `(row, col)`.
    pub fn cell_centre<P: Precision<Scalar = S>>(&self, row: usize, col: usize, ctx: &P) -> Point<S> {
        Point::new(self.cell_x(col, ctx), self.cell_y(row, ctx))
    }

    /// The value of cell `(row, col)`.
    pub fn value(&self, row: usize, col: usize) -> Result<f64> {
        self.index(row, col).map(|i| self.values[i])
    }

    /// Set the value of cell `(row, col)`.
    pub fn set_value(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let i = self.index(row, col)?;
        self.values[i] = value;
        Ok(())
    }

    /// Add to the value of cell `(row, col)`.
    pub fn add_to_value(&mut self, row: usize, col: usize, delta: f64) -> Result<()> {
        let i = self.index(row, col)?;
        self.values[i] += delta;
        Ok(())
    }

    /// Fill every cell from `f(row, col)`.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize) -> f64) {
        for row in 0..self.nrows {
            for col in 0..self.ncols {
                self.values[row * self.ncols + col] = f(row, col);
            }
        }
    }

    /// Whether a world point falls inside the grid extent.
    pub fn contains(&self, p: &Point<S>) -> bool {
        self.bounds.contains(p)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.nrows || col >= self.ncols {
            return Err(Error::GridCellOutOfRange {
                row,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        Ok(row * self.ncols + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::FloatPrecision;

    fn bounds(min: f64, max: f64) -> Aabb<f64> {
        Aabb {
            min_x: min,
            min_y: min,
            max_x: max,
            max_y: max,
        }
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        let ctx = FloatPrecision::default();
        assert!(ScalarGrid::new(0, 10, bounds(0.0, 10.0), &ctx).is_err());
        assert!(ScalarGrid::new(10, 0, bounds(0.0, 10.0), &ctx).is_err());
    }

    #[test]
    fn test_cell_centres() {
        let ctx = FloatPrecision::default();
        let grid = ScalarGrid::new(10, 10, bounds(-5.0, 5.0), &ctx).expect("valid grid");
        assert!((grid.cell_x(0, &ctx) + 4.5).abs() < 1e-12);
        assert!((grid.cell_x(9, &ctx) - 4.5).abs() < 1e-12);
        assert!((grid.cell_y(5, &ctx) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_value_round_trip_and_range_check() {
        let ctx = FloatPrecision::default();
        let mut grid = ScalarGrid::new(4, 3, bounds(0.0, 12.0), &ctx).expect("valid grid");
        grid.set_value(2, 1, 7.5).expect("in range");
        assert_eq!(grid.value(2, 1).expect("in range"), 7.5);
        assert!(grid.value(4, 0).is_err());
        assert!(grid.set_value(0, 3, 1.0).is_err());
    }

    #[test]
    fn test_fill_with() {
        let ctx = FloatPrecision::default();
        let mut grid = ScalarGrid::new(2, 3, bounds(0.0, 6.0), &ctx).expect("valid grid");
        grid.fill_with(|row, col| (row * 3 + col) as f64);
        assert_eq!(grid.value(1, 2).expect("in range"), 5.0);
    }
}
