//! Demonstration scene fixtures.
//!
//! Small builders that populate an [`EntityStore`] with the canned
//! triangle, polygon and grid scenes the demo binary renders. The test
//! suite uses the same fixtures.

use crate::color::Rgba;
use crate::colormap::{ColorMap, ValueRange};
use crate::error::Result;
use crate::geom::{Aabb, Point, Polygon, SimplePolygon, Triangle};
use crate::grid::ScalarGrid;
use crate::precision::Precision;
use crate::store::{EntityStore, PolygonColors, TriangleColors};
use crate::window::Window;

/// The 150 x 150 world-unit window the demo scenes are framed for.
pub fn default_window<P: Precision>(ctx: &P) -> Result<Window<P::Scalar>> {
    Window::axis_aligned(
        Point::new(ctx.from_i64(-75), ctx.from_i64(-75)),
        Point::new(ctx.from_i64(75), ctx.from_i64(75)),
        ctx,
    )
}

/// The selectable demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// One large triangle.
    SingleTriangle,
    /// A triangle plus three rotated copies, overlapping.
    RotatedTriangles,
    /// A 32-vertex concave star.
    StarPolygon,
    /// The star with a smaller star-shaped hole.
    StarPolygonWithHole,
    /// A graded scalar grid under a three-band color map.
    GradedGrid,
}

impl Scene {
    /// Scene for a numeric selector, if in range.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::SingleTriangle),
            1 => Some(Self::RotatedTriangles),
            2 => Some(Self::StarPolygon),
            3 => Some(Self::StarPolygonWithHole),
            4 => Some(Self::GradedGrid),
            _ => None,
        }
    }

    /// Populate `store` with this scene's entities.
    pub fn populate<P: Precision>(self, store: &mut EntityStore<P::Scalar>, ctx: &P) -> Result<()> {
        match self {
            Self::SingleTriangle => single_triangle(store, ctx),
            Self::RotatedTriangles => rotated_triangles(store, ctx),
            Self::StarPolygon => star_polygon(store, ctx),
            Self::StarPolygonWithHole => star_polygon_with_hole(store, ctx),
            Self::GradedGrid => graded_grid(store, ctx),
        }
    }
}

fn point<P: Precision>(ctx: &P, x: f64, y: f64) -> Point<P::Scalar> {
    Point::new(ctx.from_f64(x), ctx.from_f64(y))
}

fn points<P: Precision>(ctx: &P, coords: &[(f64, f64)]) -> Vec<Point<P::Scalar>> {
    coords.iter().map(|&(x, y)| point(ctx, x, y)).collect()
}

/// One gray triangle with blue edges.
pub fn single_triangle<P: Precision>(store: &mut EntityStore<P::Scalar>, ctx: &P) -> Result<()> {
    let t = Triangle::new(
        point(ctx, -50.0, -50.0),
        point(ctx, 0.0, 50.0),
        point(ctx, 50.0, -50.0),
        ctx,
    )?;
    store.add_triangle(t, TriangleColors::uniform(Rgba::GRAY, Rgba::BLUE));
    Ok(())
}

/// A triangle and three overlapping rotated copies, edges colored per side.
pub fn rotated_triangles<P: Precision>(store: &mut EntityStore<P::Scalar>, ctx: &P) -> Result<()> {
    let colors = TriangleColors {
        fill: Rgba::GRAY,
        pq: Rgba::BLUE,
        qr: Rgba::GREEN,
        rp: Rgba::RED,
    };
    let p = point(ctx, -50.0, -50.0);
    let origin = point(ctx, 0.0, 0.0);
    let t0 = Triangle::new(
        p.clone(),
        point(ctx, 0.0, 50.0),
        point(ctx, 50.0, -50.0),
        ctx,
    )?;
    store.add_triangle(t0.clone(), colors);

    let pi = ctx.from_f64(std::f64::consts::PI);
    let half_pi = pi.clone() / ctx.from_i64(2);
    let t1 = t0.rotate(&origin, &pi, ctx);
    store.add_triangle(t1, colors);
    let t2 = t0.rotate(&p, &half_pi, ctx);
    store.add_triangle(t2, colors);
    let three_half_pi = half_pi * ctx.from_i64(3);
    let t3 = t0.rotate(&origin, &three_half_pi, ctx);
    store.add_triangle(t3, colors);
    Ok(())
}

/// Concave star outline, 32 vertices.
const STAR: [(f64, f64); 32] = [
    (-30.0, -30.0),
    (-25.0, -20.0),
    (-20.0, -15.0),
    (-24.0, -10.0),
    (-20.0, 0.0),
    (-24.0, 10.0),
    (-20.0, 15.0),
    (-25.0, 20.0),
    (-30.0, 30.0),
    (-20.0, 25.0),
    (-15.0, 20.0),
    (-10.0, 24.0),
    (0.0, 20.0),
    (10.0, 24.0),
    (15.0, 20.0),
    (20.0, 25.0),
    (30.0, 30.0),
    (25.0, 20.0),
    (20.0, 15.0),
    (24.0, 10.0),
    (20.0, 0.0),
    (24.0, -10.0),
    (20.0, -15.0),
    (25.0, -20.0),
    (30.0, -30.0),
    (20.0, -25.0),
    (15.0, -20.0),
    (10.0, -24.0),
    (0.0, -20.0),
    (-10.0, -24.0),
    (-15.0, -20.0),
    (-20.0, -25.0),
];

/// Smaller star used as a hole.
const STAR_HOLE: [(f64, f64); 32] = [
    (-15.0, -15.0),
    (-12.5, -10.0),
    (-10.0, -7.5),
    (-12.0, -5.0),
    (-10.0, 0.0),
    (-12.0, 5.0),
    (-10.0, 7.5),
    (-12.5, 10.0),
    (-15.0, 15.0),
    (-10.0, 12.5),
    (-7.5, 10.0),
    (-5.0, 12.0),
    (0.0, 10.0),
    (5.0, 12.0),
    (7.5, 10.0),
    (10.0, 12.5),
    (15.0, 15.0),
    (12.5, 10.0),
    (10.0, 7.5),
    (12.0, 5.0),
    (10.0, 0.0),
    (12.0, -5.0),
    (10.0, -7.5),
    (12.5, -10.0),
    (15.0, -15.0),
    (10.0, -12.5),
    (7.5, -10.0),
    (5.0, -12.0),
    (0.0, -10.0),
    (-5.0, -12.0),
    (-7.5, -10.0),
    (-10.0, -12.5),
];

/// The concave star as a hole-free polygon.
pub fn star_polygon<P: Precision>(store: &mut EntityStore<P::Scalar>, ctx: &P) -> Result<()> {
    let polygon = SimplePolygon::new(points(ctx, &STAR), ctx)?;
    store.add_simple_polygon(polygon, Rgba::GRAY, Rgba::BLUE);
    Ok(())
}

/// The concave star with a smaller star-shaped hole.
pub fn star_polygon_with_hole<P: Precision>(
    store: &mut EntityStore<P::Scalar>,
    ctx: &P,
) -> Result<()> {
    let exterior = SimplePolygon::new(points(ctx, &STAR), ctx)?;
    let hole = SimplePolygon::new(points(ctx, &STAR_HOLE), ctx)?;
    store.add_polygon(
        Polygon::with_holes(exterior, vec![hole]),
        PolygonColors {
            fill: Rgba::LIGHT_GRAY,
            external_edge: Rgba::BLUE,
            internal_edge: Rgba::RED,
        },
    );
    Ok(())
}

/// A 150 x 150 grid ramped by cell index, colored in thirds.
pub fn graded_grid<P: Precision>(store: &mut EntityStore<P::Scalar>, ctx: &P) -> Result<()> {
    let (nrows, ncols) = (150usize, 150usize);
    let n = (nrows * ncols) as f64;
    let mut color_map = ColorMap::new();
    color_map.add_range(ValueRange::new(0.0, n / 3.0), Rgba::YELLOW);
    color_map.add_range(ValueRange::new(n / 3.0, 2.0 * n / 3.0), Rgba::ORANGE);
    color_map.add_range(ValueRange::new(2.0 * n / 3.0, n + 1.0), Rgba::RED);

    let bounds = Aabb {
        min_x: ctx.from_i64(-75),
        min_y: ctx.from_i64(-75),
        max_x: ctx.from_i64(75),
        max_y: ctx.from_i64(75),
    };
    let mut grid = ScalarGrid::new(nrows, ncols, bounds, ctx)?;
    grid.fill_with(|row, col| (row * ncols + col) as f64);
    store.add_grid(grid, color_map);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::{FloatPrecision, RationalPrecision};

    #[test]
    fn test_every_scene_populates() {
        let ctx = FloatPrecision::default();
        for index in 0..5 {
            let scene = Scene::from_index(index).expect("valid index");
            let mut store = EntityStore::new();
            scene.populate(&mut store, &ctx).expect("scene builds");
            let total = store.triangles().len()
                + store.simple_polygons().len()
                + store.polygons().len()
                + store.grids().len();
            assert!(total > 0, "scene {index} added nothing");
        }
        assert!(Scene::from_index(5).is_none());
    }

    #[test]
    fn test_rotated_triangles_envelope_covers_rotations() {
        let ctx = FloatPrecision::default();
        let mut store = EntityStore::new();
        rotated_triangles(&mut store, &ctx).expect("scene builds");
        assert_eq!(store.triangles().len(), 4);
        let env = store.envelope().expect("envelope after adds");
        // The half-turn copy mirrors the apex to y = -50.
        assert!(env.min_y <= -50.0);
        assert!(env.max_y >= 50.0);
    }

    #[test]
    fn test_scenes_build_on_exact_backend() {
        let ctx = RationalPrecision::default();
        let mut store = EntityStore::new();
        single_triangle(&mut store, &ctx).expect("scene builds");
        star_polygon_with_hole(&mut store, &ctx).expect("scene builds");
        assert_eq!(store.triangles().len(), 1);
        assert_eq!(store.polygons().len(), 1);
        assert_eq!(store.polygons()[0].polygon.holes().len(), 1);
    }
}
