//! Geometric primitives and predicates, generic over the precision backend.
//!
//! The rasterizer only consumes this module through a small capability set:
//! bounding boxes, shape/quad intersection tests, convex hulls, containment,
//! circumcircles, distances and rotation. All predicates take the active
//! [`Precision`] backend so exact and floating pipelines share one
//! implementation.

use crate::error::{Error, Result};
use crate::precision::{Precision, Scalar};

pub mod hull;
pub mod polygon;

pub use hull::convex_hull;
pub use polygon::{Polygon, Ring, SimplePolygon};

/// A 2D point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<S> {
    /// X coordinate.
    pub x: S,
    /// Y coordinate.
    pub y: S,
}

impl<S: Scalar> Point<S> {
    /// Create a new point.
    pub fn new(x: S, y: S) -> Self {
        Self { x, y }
    }

    /// The vector from `self` to `other`.
    pub fn vector_to(&self, other: &Self) -> Vector<S> {
        Vector::new(
            other.x.clone() - self.x.clone(),
            other.y.clone() - self.y.clone(),
        )
    }

    /// The point reached by translating `self` along `v`.
    pub fn translate(&self, v: &Vector<S>) -> Self {
        Self::new(self.x.clone() + v.dx.clone(), self.y.clone() + v.dy.clone())
    }

    /// Euclidean distance to `other`.
    pub fn distance<P: Precision<Scalar = S>>(&self, other: &Self, ctx: &P) -> S {
        ctx.sqrt(&self.vector_to(other).length_squared())
    }
}

/// A 2D displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<S> {
    /// X component.
    pub dx: S,
    /// Y component.
    pub dy: S,
}

impl<S: Scalar> Vector<S> {
    /// Create a new vector.
    pub fn new(dx: S, dy: S) -> Self {
        Self { dx, dy }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.dx.clone() + other.dx.clone(),
            self.dy.clone() + other.dy.clone(),
        )
    }

    /// Scale by `k`.
    pub fn scale(&self, k: &S) -> Self {
        Self::new(self.dx.clone() * k.clone(), self.dy.clone() * k.clone())
    }

    /// Divide by `k`.
    pub fn divide(&self, k: &S) -> Self {
        Self::new(self.dx.clone() / k.clone(), self.dy.clone() / k.clone())
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn cross(&self, other: &Self) -> S {
        self.dx.clone() * other.dy.clone() - self.dy.clone() * other.dx.clone()
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> S {
        self.dx.clone() * other.dx.clone() + self.dy.clone() * other.dy.clone()
    }

    /// Squared length.
    pub fn length_squared(&self) -> S {
        self.dot(self)
    }

    /// Length, to the backend's precision.
    pub fn length<P: Precision<Scalar = S>>(&self, ctx: &P) -> S {
        ctx.sqrt(&self.length_squared())
    }
}

/// Twice the signed area of the triangle `a b c`. Positive when `c` lies to
/// the left of the directed line `a -> b`.
pub fn orient<S: Scalar>(a: &Point<S>, b: &Point<S>, c: &Point<S>) -> S {
    a.vector_to(b).cross(&a.vector_to(c))
}

/// Rotate `pt` about `pivot` by `theta` radians (counter-clockwise).
pub fn rotate_point<P: Precision>(
    pt: &Point<P::Scalar>,
    pivot: &Point<P::Scalar>,
    theta: &P::Scalar,
    ctx: &P,
) -> Point<P::Scalar> {
    let (sin, cos) = ctx.sin_cos(theta);
    let d = pivot.vector_to(pt);
    Point::new(
        pivot.x.clone() + d.dx.clone() * cos.clone() - d.dy.clone() * sin.clone(),
        pivot.y.clone() + d.dx * sin + d.dy * cos,
    )
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb<S> {
    /// Minimum x.
    pub min_x: S,
    /// Minimum y.
    pub min_y: S,
    /// Maximum x.
    pub max_x: S,
    /// Maximum y.
    pub max_y: S,
}

impl<S: Scalar> Aabb<S> {
    /// The box covering a single point.
    pub fn from_point(p: &Point<S>) -> Self {
        Self {
            min_x: p.x.clone(),
            min_y: p.y.clone(),
            max_x: p.x.clone(),
            max_y: p.y.clone(),
        }
    }

    /// The box covering all `points`. `None` for an empty slice.
    pub fn from_points(points: &[Point<S>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::from_point(first);
        for p in rest {
            aabb = aabb.union(&Self::from_point(p));
        }
        Some(aabb)
    }

    /// The box from two opposite corners.
    pub fn from_corners(a: &Point<S>, b: &Point<S>) -> Self {
        Self::from_point(a).union(&Self::from_point(b))
    }

    /// The smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_scalar(&self.min_x, &other.min_x),
            min_y: min_scalar(&self.min_y, &other.min_y),
            max_x: max_scalar(&self.max_x, &other.max_x),
            max_y: max_scalar(&self.max_y, &other.max_y),
        }
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains(&self, p: &Point<S>) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Whether the boxes overlap (boundary contact counts).
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// The corner points in counter-clockwise order from the minimum corner.
    pub fn corners(&self) -> [Point<S>; 4] {
        [
            Point::new(self.min_x.clone(), self.min_y.clone()),
            Point::new(self.max_x.clone(), self.min_y.clone()),
            Point::new(self.max_x.clone(), self.max_y.clone()),
            Point::new(self.min_x.clone(), self.max_y.clone()),
        ]
    }
}

fn min_scalar<S: Scalar>(a: &S, b: &S) -> S {
    if a < b {
        a.clone()
    } else {
        b.clone()
    }
}

fn max_scalar<S: Scalar>(a: &S, b: &S) -> S {
    if a > b {
        a.clone()
    } else {
        b.clone()
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<S> {
    /// Start point.
    pub p: Point<S>,
    /// End point.
    pub q: Point<S>,
}

impl<S: Scalar> Segment<S> {
    /// Create a new segment.
    pub fn new(p: Point<S>, q: Point<S>) -> Self {
        Self { p, q }
    }

    /// The displacement from start to end.
    pub fn direction(&self) -> Vector<S> {
        self.p.vector_to(&self.q)
    }

    /// The segment's bounding box.
    pub fn aabb(&self) -> Aabb<S> {
        Aabb::from_corners(&self.p, &self.q)
    }

    /// The segment length, to the backend's precision.
    pub fn length<P: Precision<Scalar = S>>(&self, ctx: &P) -> S {
        self.direction().length(ctx)
    }

    /// Signed distance from `pt` to the infinite line through the segment.
    /// Positive on the left of the direction `p -> q`.
    pub fn signed_line_distance<P: Precision<Scalar = S>>(&self, pt: &Point<S>, ctx: &P) -> S {
        let len = self.length(ctx);
        if ctx.is_zero(&len) {
            return self.p.distance(pt, ctx);
        }
        orient(&self.p, &self.q, pt) / len
    }

    /// Unsigned distance from `pt` to the infinite line through the segment.
    pub fn line_distance<P: Precision<Scalar = S>>(&self, pt: &Point<S>, ctx: &P) -> S {
        ctx.abs(&self.signed_line_distance(pt, ctx))
    }

    /// Whether `pt` lies on the segment (within the backend tolerance).
    pub fn contains_point<P: Precision<Scalar = S>>(&self, pt: &Point<S>, ctx: &P) -> bool {
        ctx.is_zero(&orient(&self.p, &self.q, pt)) && on_segment_bbox(self, pt)
    }
}

/// Bounding-box part of the collinear point-on-segment test.
fn on_segment_bbox<S: Scalar>(seg: &Segment<S>, pt: &Point<S>) -> bool {
    seg.aabb().contains(pt)
}

/// Whether two segments intersect (shared endpoints and collinear overlap
/// count).
pub fn segments_intersect<P: Precision>(
    a: &Segment<P::Scalar>,
    b: &Segment<P::Scalar>,
    ctx: &P,
) -> bool {
    let d1 = ctx.sign(&orient(&b.p, &b.q, &a.p));
    let d2 = ctx.sign(&orient(&b.p, &b.q, &a.q));
    let d3 = ctx.sign(&orient(&a.p, &a.q, &b.p));
    let d4 = ctx.sign(&orient(&a.p, &a.q, &b.q));

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment_bbox(b, &a.p))
        || (d2 == 0 && on_segment_bbox(b, &a.q))
        || (d3 == 0 && on_segment_bbox(a, &b.p))
        || (d4 == 0 && on_segment_bbox(a, &b.q))
}

/// The closed edges of a vertex ring (last vertex connects back to the
/// first).
pub fn ring_edges<S: Scalar>(points: &[Point<S>]) -> Vec<Segment<S>> {
    let n = points.len();
    (0..n)
        .map(|i| Segment::new(points[i].clone(), points[(i + 1) % n].clone()))
        .collect()
}

/// Whether `pt` lies inside or on a convex vertex ring (any winding).
pub fn point_in_convex<P: Precision>(
    pt: &Point<P::Scalar>,
    convex: &[Point<P::Scalar>],
    ctx: &P,
) -> bool {
    if convex.len() < 3 {
        return match convex {
            [a] => ctx.is_zero(&pt.vector_to(a).length_squared()),
            [a, b] => Segment::new(a.clone(), b.clone()).contains_point(pt, ctx),
            _ => false,
        };
    }
    let mut pos = false;
    let mut neg = false;
    let n = convex.len();
    for i in 0..n {
        match ctx.sign(&orient(&convex[i], &convex[(i + 1) % n], pt)) {
            1 => pos = true,
            -1 => neg = true,
            _ => {}
        }
        if pos && neg {
            return false;
        }
    }
    true
}

/// Whether two convex vertex rings overlap (boundary contact counts).
pub fn convex_intersects<P: Precision>(
    a: &[Point<P::Scalar>],
    b: &[Point<P::Scalar>],
    ctx: &P,
) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.iter().any(|p| point_in_convex(p, b, ctx)) {
        return true;
    }
    if b.iter().any(|p| point_in_convex(p, a, ctx)) {
        return true;
    }
    let ea = ring_edges(a);
    let eb = ring_edges(b);
    ea.iter()
        .any(|sa| eb.iter().any(|sb| segments_intersect(sa, sb, ctx)))
}

/// Whether a segment touches a convex vertex ring.
pub fn segment_intersects_convex<P: Precision>(
    seg: &Segment<P::Scalar>,
    convex: &[Point<P::Scalar>],
    ctx: &P,
) -> bool {
    point_in_convex(&seg.p, convex, ctx)
        || point_in_convex(&seg.q, convex, ctx)
        || ring_edges(convex)
            .iter()
            .any(|e| segments_intersect(e, seg, ctx))
}

/// A triangle with vertices `p`, `q`, `r`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle<S> {
    /// First vertex.
    pub p: Point<S>,
    /// Second vertex.
    pub q: Point<S>,
    /// Third vertex.
    pub r: Point<S>,
}

impl<S: Scalar> Triangle<S> {
    /// Create a triangle, rejecting collinear vertices.
    pub fn new<P: Precision<Scalar = S>>(p: Point<S>, q: Point<S>, r: Point<S>, ctx: &P) -> Result<Self> {
        if ctx.is_zero(&orient(&p, &q, &r)) {
            return Err(Error::DegenerateGeometry(
                "collinear triangle vertices".to_string(),
            ));
        }
        Ok(Self { p, q, r })
    }

    /// The vertices in order.
    pub fn vertices(&self) -> [Point<S>; 3] {
        [self.p.clone(), self.q.clone(), self.r.clone()]
    }

    /// Edge from `p` to `q`.
    pub fn pq(&self) -> Segment<S> {
        Segment::new(self.p.clone(), self.q.clone())
    }

    /// Edge from `q` to `r`.
    pub fn qr(&self) -> Segment<S> {
        Segment::new(self.q.clone(), self.r.clone())
    }

    /// Edge from `r` to `p`.
    pub fn rp(&self) -> Segment<S> {
        Segment::new(self.r.clone(), self.p.clone())
    }

    /// The triangle's bounding box.
    pub fn aabb(&self) -> Aabb<S> {
        Aabb::from_point(&self.p)
            .union(&Aabb::from_point(&self.q))
            .union(&Aabb::from_point(&self.r))
    }

    /// Whether `pt` lies inside or on the triangle.
    pub fn contains_point<P: Precision<Scalar = S>>(&self, pt: &Point<S>, ctx: &P) -> bool {
        point_in_convex(pt, &self.vertices(), ctx)
    }

    /// Whether the triangle overlaps a convex vertex ring.
    pub fn intersects_convex<P: Precision<Scalar = S>>(
        &self,
        convex: &[Point<S>],
        ctx: &P,
    ) -> bool {
        convex_intersects(&self.vertices(), convex, ctx)
    }

    /// Circumcenter and circumradius. `None` when the vertices are too close
    /// to collinear for the backend to resolve.
    pub fn circumcircle<P: Precision<Scalar = S>>(&self, ctx: &P) -> Option<(Point<S>, S)> {
        let two = ctx.from_i64(2);
        let (ax, ay) = (self.p.x.clone(), self.p.y.clone());
        let (bx, by) = (self.q.x.clone(), self.q.y.clone());
        let (cx, cy) = (self.r.x.clone(), self.r.y.clone());

        let d = two
            * (ax.clone() * (by.clone() - cy.clone())
                + bx.clone() * (cy.clone() - ay.clone())
                + cx.clone() * (ay.clone() - by.clone()));
        if ctx.is_zero(&d) {
            return None;
        }

        let a2 = ax.clone() * ax.clone() + ay.clone() * ay.clone();
        let b2 = bx.clone() * bx.clone() + by.clone() * by.clone();
        let c2 = cx.clone() * cx.clone() + cy.clone() * cy.clone();

        let ux = (a2.clone() * (by.clone() - cy.clone())
            + b2.clone() * (cy.clone() - ay.clone())
            + c2.clone() * (ay.clone() - by.clone()))
            / d.clone();
        let uy = (a2 * (cx.clone() - bx.clone()) + b2 * (ax.clone() - cx) + c2 * (bx - ax)) / d;

        let centre = Point::new(ux, uy);
        let radius = centre.distance(&self.p, ctx);
        Some((centre, radius))
    }

    /// The triangle rotated about `pivot` by `theta` radians.
    pub fn rotate<P: Precision<Scalar = S>>(&self, pivot: &Point<S>, theta: &S, ctx: &P) -> Self {
        Self {
            p: rotate_point(&self.p, pivot, theta, ctx),
            q: rotate_point(&self.q, pivot, theta, ctx),
            r: rotate_point(&self.r, pivot, theta, ctx),
        }
    }
}
