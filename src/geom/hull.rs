//! Convex hull construction (Andrew's monotone chain).

use std::cmp::Ordering;

use super::{orient, Point};
use crate::precision::Precision;

/// The convex hull of `points` in counter-clockwise order, collinear points
/// removed. Fewer than three input points (or all-collinear input) return
/// the degenerate chain as-is.
pub fn convex_hull<P: Precision>(points: &[Point<P::Scalar>], ctx: &P) -> Vec<Point<P::Scalar>> {
    let mut pts: Vec<Point<P::Scalar>> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point<P::Scalar>> = Vec::new();
    for p in &pts {
        while lower.len() >= 2
            && ctx.sign(&orient(&lower[lower.len() - 2], &lower[lower.len() - 1], p)) <= 0
        {
            lower.pop();
        }
        lower.push(p.clone());
    }

    let mut upper: Vec<Point<P::Scalar>> = Vec::new();
    for p in pts.iter().rev() {
        while upper.len() >= 2
            && ctx.sign(&orient(&upper[upper.len() - 2], &upper[upper.len() - 1], p)) <= 0
        {
            upper.pop();
        }
        upper.push(p.clone());
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
