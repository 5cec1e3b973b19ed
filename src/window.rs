//! The viewing window and the world/pixel coordinate mapper.

use crate::error::{Error, Result};
use crate::geom::{Aabb, Point, Segment, Vector};
use crate::precision::{Precision, Scalar};

/// A world-space viewing window given by its four corner points.
///
/// Opposite edges must be parallel and equal (a parallelogram); the derived
/// pixel grid is rectangular only when the edges are orthogonal.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<S> {
    /// Lower-left corner.
    pub lb: Point<S>,
    /// Upper-left corner.
    pub lt: Point<S>,
    /// Upper-right corner.
    pub rt: Point<S>,
    /// Lower-right corner.
    pub rb: Point<S>,
}

impl<S: Scalar> Window<S> {
    /// Create a window from its corners, validating shape.
    pub fn new<P: Precision<Scalar = S>>(
        lb: Point<S>,
        lt: Point<S>,
        rt: Point<S>,
        rb: Point<S>,
        ctx: &P,
    ) -> Result<Self> {
        let left = lb.vector_to(&lt);
        let bottom = lb.vector_to(&rb);
        if ctx.is_zero(&left.length_squared()) || ctx.is_zero(&bottom.length_squared()) {
            return Err(Error::DegenerateWindow("zero-length window edge".to_string()));
        }
        if ctx.is_zero(&left.cross(&bottom)) {
            return Err(Error::DegenerateWindow(
                "window edges are parallel".to_string(),
            ));
        }
        let top = lt.vector_to(&rt);
        if !ctx.is_zero(&(top.dx.clone() - bottom.dx.clone()))
            || !ctx.is_zero(&(top.dy.clone() - bottom.dy.clone()))
        {
            return Err(Error::DegenerateWindow(
                "opposite window edges differ".to_string(),
            ));
        }
        Ok(Self { lb, lt, rt, rb })
    }

    /// An axis-aligned window from its minimum and maximum corners.
    pub fn axis_aligned<P: Precision<Scalar = S>>(
        min: Point<S>,
        max: Point<S>,
        ctx: &P,
    ) -> Result<Self> {
        let lt = Point::new(min.x.clone(), max.y.clone());
        let rb = Point::new(max.x.clone(), min.y.clone());
        Self::new(min, lt, max, rb, ctx)
    }

    /// The window's bounding box.
    pub fn aabb(&self) -> Aabb<S> {
        Aabb::from_points(&[
            self.lb.clone(),
            self.lt.clone(),
            self.rt.clone(),
            self.rb.clone(),
        ])
        .unwrap_or_else(|| Aabb::from_point(&self.lb))
    }
}

/// Maps between world coordinates and the pixel grid of a window.
///
/// Row 0 sits at the window's bottom edge; rows increase toward the top.
/// The mapper never fails on out-of-window points: they map to out-of-range
/// indices (negative or beyond the canvas) that callers clamp or a paint
/// bounds-check filters.
#[derive(Debug, Clone)]
pub struct PixelMapper<P: Precision> {
    ctx: P,
    origin: Point<P::Scalar>,
    row_step: Vector<P::Scalar>,
    col_step: Vector<P::Scalar>,
    bottom: Segment<P::Scalar>,
    left: Segment<P::Scalar>,
    row_sign: P::Scalar,
    col_sign: P::Scalar,
    pixel_size: P::Scalar,
    nrows: usize,
    ncols: usize,
}

impl<P: Precision> PixelMapper<P> {
    /// Derive the per-pixel step vectors and pixel size for an
    /// `nrows` x `ncols` raster of `window`.
    pub fn new(window: &Window<P::Scalar>, nrows: usize, ncols: usize, ctx: P) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::InvalidDimensions { nrows, ncols });
        }
        let row_step = window.lb.vector_to(&window.lt).divide(&ctx.from_i64(nrows as i64));
        let col_step = window.lb.vector_to(&window.rb).divide(&ctx.from_i64(ncols as i64));
        if ctx.is_zero(&row_step.length_squared()) || ctx.is_zero(&col_step.length_squared()) {
            return Err(Error::DegenerateWindow(
                "window too small for requested raster".to_string(),
            ));
        }
        let bottom = Segment::new(window.lb.clone(), window.rb.clone());
        let left = Segment::new(window.lb.clone(), window.lt.clone());
        let pixel_size = bottom.length(&ctx) / ctx.from_i64(ncols as i64);

        // Orient the edge distances so the window interior is positive.
        let row_sign = interior_sign(&bottom, &window.lt, &ctx);
        let col_sign = interior_sign(&left, &window.rb, &ctx);

        Ok(Self {
            ctx,
            origin: window.lb.clone(),
            row_step,
            col_step,
            bottom,
            left,
            row_sign,
            col_sign,
            pixel_size,
            nrows,
            ncols,
        })
    }

    /// Raster row count.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Raster column count.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// World-space size of one pixel along the bottom edge.
    pub fn pixel_size(&self) -> &P::Scalar {
        &self.pixel_size
    }

    /// The row index containing `p`: signed distance from the bottom edge in
    /// pixel units, truncated. Negative below the window.
    pub fn row_of(&self, p: &Point<P::Scalar>) -> i64 {
        let d = self.bottom.signed_line_distance(p, &self.ctx) * self.row_sign.clone();
        self.ctx.trunc(&(d / self.pixel_size.clone()))
    }

    /// The column index containing `p`: signed distance from the left edge
    /// in pixel units, truncated. Negative left of the window.
    pub fn col_of(&self, p: &Point<P::Scalar>) -> i64 {
        let d = self.left.signed_line_distance(p, &self.ctx) * self.col_sign.clone();
        self.ctx.trunc(&(d / self.pixel_size.clone()))
    }

    /// The world-space parallelogram covered by pixel `(row, col)`, corners
    /// in ring order. Out-of-range indices give off-canvas parallelograms.
    pub fn pixel_rect(&self, row: i64, col: i64) -> [Point<P::Scalar>; 4] {
        let corner = |r: i64, c: i64| {
            self.origin.translate(
                &self
                    .row_step
                    .scale(&self.ctx.from_i64(r))
                    .add(&self.col_step.scale(&self.ctx.from_i64(c))),
            )
        };
        [
            corner(row, col),
            corner(row + 1, col),
            corner(row + 1, col + 1),
            corner(row, col + 1),
        ]
    }

    /// The world-space centre of pixel `(row, col)`.
    pub fn pixel_centre(&self, row: i64, col: i64) -> Point<P::Scalar> {
        let half = self.ctx.ratio(1, 2);
        self.origin.translate(
            &self
                .row_step
                .scale(&(self.ctx.from_i64(row) + half.clone()))
                .add(&self.col_step.scale(&(self.ctx.from_i64(col) + half))),
        )
    }

    /// The backend the mapper was built with.
    pub fn ctx(&self) -> &P {
        &self.ctx
    }
}

/// `+1` or `-1` so that `signed_line_distance * sign` is positive on the
/// side of `edge` containing `interior`.
fn interior_sign<P: Precision>(
    edge: &Segment<P::Scalar>,
    interior: &Point<P::Scalar>,
    ctx: &P,
) -> P::Scalar {
    if edge.signed_line_distance(interior, ctx) < ctx.zero() {
        ctx.from_i64(-1)
    } else {
        ctx.one()
    }
}
