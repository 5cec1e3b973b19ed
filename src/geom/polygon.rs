//! Rings and polygons, with and without holes.

use super::{
    convex_hull, orient, point_in_convex, ring_edges, segments_intersect, Aabb, Point, Segment,
};
use crate::error::{Error, Result};
use crate::precision::{Precision, Scalar};

/// An ordered, implicitly closed vertex sequence forming one polygon
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring<S> {
    points: Vec<Point<S>>,
}

impl<S: Scalar> Ring<S> {
    /// Build a ring from vertices, dropping consecutive duplicates
    /// (including the wrap-around pair). Rejects rings with fewer than three
    /// distinct vertices or zero area under the backend tolerance.
    pub fn new<P: Precision<Scalar = S>>(points: Vec<Point<S>>, ctx: &P) -> Result<Self> {
        let mut pts: Vec<Point<S>> = Vec::with_capacity(points.len());
        for p in points {
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
        while pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "ring needs at least 3 distinct vertices, got {}",
                pts.len()
            )));
        }
        let ring = Self { points: pts };
        if ctx.is_zero(&ring.signed_area_doubled()) {
            return Err(Error::DegenerateGeometry("zero-area ring".to_string()));
        }
        Ok(ring)
    }

    /// The ring vertices.
    pub fn points(&self) -> &[Point<S>] {
        &self.points
    }

    /// The closed boundary edges.
    pub fn edges(&self) -> Vec<Segment<S>> {
        ring_edges(&self.points)
    }

    /// The ring's bounding box.
    pub fn aabb(&self) -> Aabb<S> {
        Aabb::from_points(&self.points).unwrap_or_else(|| {
            // Ring construction guarantees at least three points.
            Aabb::from_point(&self.points[0])
        })
    }

    /// Twice the signed shoelace area. Positive for counter-clockwise rings.
    pub fn signed_area_doubled(&self) -> S {
        let origin = &self.points[0];
        // Fan from the first vertex; terms involving it vanish, so the
        // closing edge contributes nothing.
        let mut sum = origin.x.clone() - origin.x.clone();
        for w in self.points.windows(2) {
            sum = sum + orient(origin, &w[0], &w[1]);
        }
        sum
    }

    /// Even-odd containment test against the closed ring.
    pub fn contains_point(&self, pt: &Point<S>) -> bool {
        let n = self.points.len();
        let mut inside = false;
        for i in 0..n {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            if (a.y > pt.y) != (b.y > pt.y) {
                let t = (pt.y.clone() - a.y.clone()) / (b.y.clone() - a.y.clone());
                let x_cross = a.x.clone() + t * (b.x.clone() - a.x.clone());
                if pt.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// A hole-free polygon: a ring plus its precomputed convex hull.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePolygon<S> {
    ring: Ring<S>,
    hull: Vec<Point<S>>,
}

impl<S: Scalar> SimplePolygon<S> {
    /// Build from boundary vertices. Fails on degenerate rings.
    pub fn new<P: Precision<Scalar = S>>(points: Vec<Point<S>>, ctx: &P) -> Result<Self> {
        let ring = Ring::new(points, ctx)?;
        let hull = convex_hull(ring.points(), ctx);
        if hull.len() < 3 {
            return Err(Error::DegenerateGeometry(
                "polygon hull collapsed to a segment".to_string(),
            ));
        }
        Ok(Self { ring, hull })
    }

    /// The boundary ring.
    pub fn ring(&self) -> &Ring<S> {
        &self.ring
    }

    /// The convex hull vertices, counter-clockwise.
    pub fn hull(&self) -> &[Point<S>] {
        &self.hull
    }

    /// The polygon's bounding box.
    pub fn aabb(&self) -> Aabb<S> {
        self.ring.aabb()
    }

    /// The boundary edges.
    pub fn edges(&self) -> Vec<Segment<S>> {
        self.ring.edges()
    }

    /// Whether `pt` lies inside the boundary (even-odd).
    pub fn contains_point(&self, pt: &Point<S>) -> bool {
        self.ring.contains_point(pt)
    }

    /// Whether the filled polygon touches a convex vertex ring (a pixel
    /// quad, usually).
    pub fn intersects_convex<P: Precision<Scalar = S>>(
        &self,
        convex: &[Point<S>],
        ctx: &P,
    ) -> bool {
        let quad_edges = ring_edges(convex);
        if self
            .ring
            .edges()
            .iter()
            .any(|e| quad_edges.iter().any(|qe| segments_intersect(e, qe, ctx)))
        {
            return true;
        }
        if convex.iter().any(|p| self.ring.contains_point(p)) {
            return true;
        }
        self.ring.points().iter().any(|p| point_in_convex(p, convex, ctx))
    }
}

/// A polygon with zero or more holes. Hole order follows insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S> {
    exterior: SimplePolygon<S>,
    holes: Vec<SimplePolygon<S>>,
}

impl<S: Scalar> Polygon<S> {
    /// A polygon with no holes (yet).
    pub fn new(exterior: SimplePolygon<S>) -> Self {
        Self { exterior, holes: Vec::new() }
    }

    /// A polygon with holes.
    pub fn with_holes(exterior: SimplePolygon<S>, holes: Vec<SimplePolygon<S>>) -> Self {
        Self { exterior, holes }
    }

    /// The exterior boundary.
    pub fn exterior(&self) -> &SimplePolygon<S> {
        &self.exterior
    }

    /// The holes, in insertion order.
    pub fn holes(&self) -> &[SimplePolygon<S>] {
        &self.holes
    }

    /// Append a hole.
    pub fn push_hole(&mut self, hole: SimplePolygon<S>) {
        self.holes.push(hole);
    }

    /// The exterior convex hull vertices.
    pub fn hull(&self) -> &[Point<S>] {
        self.exterior.hull()
    }

    /// The exterior bounding box.
    pub fn aabb(&self) -> Aabb<S> {
        self.exterior.aabb()
    }

    /// Whether `pt` lies in the filled region: inside the exterior and
    /// outside every hole.
    pub fn contains_point(&self, pt: &Point<S>) -> bool {
        self.exterior.contains_point(pt) && !self.holes.iter().any(|h| h.contains_point(pt))
    }

    /// Whether the filled region touches a convex vertex ring. Hole
    /// boundaries count as part of the region's closure.
    pub fn intersects_convex<P: Precision<Scalar = S>>(
        &self,
        convex: &[Point<S>],
        ctx: &P,
    ) -> bool {
        let quad_edges = ring_edges(convex);
        let crosses = |edges: &[Segment<S>]| {
            edges
                .iter()
                .any(|e| quad_edges.iter().any(|qe| segments_intersect(e, qe, ctx)))
        };
        if crosses(&self.exterior.edges()) {
            return true;
        }
        if self.holes.iter().any(|h| crosses(&h.edges())) {
            return true;
        }
        if convex.iter().any(|p| self.contains_point(p)) {
            return true;
        }
        self.exterior
            .ring()
            .points()
            .iter()
            .any(|p| point_in_convex(p, convex, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::{FloatPrecision, Precision};

    fn pt(x: f64, y: f64) -> Point<f64> {
        Point::new(x, y)
    }

    fn square(half: f64, ctx: &FloatPrecision) -> SimplePolygon<f64> {
        SimplePolygon::new(
            vec![
                pt(-half, -half),
                pt(half, -half),
                pt(half, half),
                pt(-half, half),
            ],
            ctx,
        )
        .expect("valid square")
    }

    #[test]
    fn test_ring_rejects_degenerate() {
        let ctx = FloatPrecision::default();
        assert!(Ring::new(vec![pt(0.0, 0.0), pt(1.0, 1.0)], &ctx).is_err());
        assert!(Ring::new(vec![pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)], &ctx).is_err());
        // Closing duplicate is dropped, remaining ring still valid.
        let ring = Ring::new(
            vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 1.0), pt(0.0, 0.0)],
            &ctx,
        )
        .expect("valid ring");
        assert_eq!(ring.points().len(), 3);
    }

    #[test]
    fn test_ring_contains() {
        let ctx = FloatPrecision::default();
        let ring = Ring::new(
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)],
            &ctx,
        )
        .expect("valid ring");
        assert!(ring.contains_point(&pt(5.0, 5.0)));
        assert!(!ring.contains_point(&pt(15.0, 5.0)));
    }

    #[test]
    fn test_concave_polygon_fill_vs_hull() {
        let ctx = FloatPrecision::default();
        // Arrow-head: (25, 0) is inside the hull but outside the polygon.
        let poly = SimplePolygon::new(
            vec![pt(0.0, -30.0), pt(30.0, 0.0), pt(0.0, 30.0), pt(10.0, 0.0)],
            &ctx,
        )
        .expect("valid polygon");
        assert!(point_in_convex(&pt(5.0, 0.0), poly.hull(), &ctx));
        assert!(!poly.contains_point(&pt(5.0, 0.0)));
        assert!(poly.contains_point(&pt(15.0, 0.0)));
    }

    #[test]
    fn test_polygon_with_hole_containment() {
        let ctx = FloatPrecision::default();
        let outer = square(10.0, &ctx);
        let inner = square(4.0, &ctx);
        let poly = Polygon::with_holes(outer, vec![inner]);
        assert!(!poly.contains_point(&pt(0.0, 0.0)));
        assert!(poly.contains_point(&pt(7.0, 0.0)));
        assert!(!poly.contains_point(&pt(20.0, 0.0)));
    }

    #[test]
    fn test_polygon_hole_quad_intersection() {
        let ctx = FloatPrecision::default();
        let poly = Polygon::with_holes(square(10.0, &ctx), vec![square(4.0, &ctx)]);
        // Quad fully inside the hole does not touch the region.
        let inside_hole = [pt(-1.0, -1.0), pt(1.0, -1.0), pt(1.0, 1.0), pt(-1.0, 1.0)];
        assert!(!poly.intersects_convex(&inside_hole, &ctx));
        // Quad straddling the hole boundary does.
        let straddles = [pt(3.0, -1.0), pt(5.0, -1.0), pt(5.0, 1.0), pt(3.0, 1.0)];
        assert!(poly.intersects_convex(&straddles, &ctx));
        // Quad in the solid band does.
        let solid = [pt(6.0, -1.0), pt(8.0, -1.0), pt(8.0, 1.0), pt(6.0, 1.0)];
        assert!(poly.intersects_convex(&solid, &ctx));
    }

    #[test]
    fn test_signed_area_orientation() {
        let ctx = FloatPrecision::default();
        let ccw = Ring::new(
            vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0), pt(0.0, 4.0)],
            &ctx,
        )
        .expect("valid ring");
        let cw = Ring::new(
            vec![pt(0.0, 4.0), pt(4.0, 4.0), pt(4.0, 0.0), pt(0.0, 0.0)],
            &ctx,
        )
        .expect("valid ring");
        assert_eq!(ctx.sign(&ccw.signed_area_doubled()), 1);
        assert_eq!(ctx.sign(&cw.signed_area_doubled()), -1);
        assert!((ccw.signed_area_doubled() - 32.0).abs() < 1e-12);
    }
}
