//! Value-to-color mapping for scalar grids.

use crate::color::Rgba;

/// A half-open value range `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Inclusive lower bound.
    pub lo: f64,
    /// Exclusive upper bound.
    pub hi: f64,
}

impl ValueRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Whether `value` falls inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value < self.hi
    }
}

/// Ordered range-to-color lookup for scalar grid cells.
///
/// Lookup scans the ranges in insertion order and returns the first match,
/// falling back to the default color.
#[derive(Debug, Clone)]
pub struct ColorMap {
    ranges: Vec<(ValueRange, Rgba)>,
    default: Rgba,
}

impl ColorMap {
    /// Create an empty map with [`Rgba::BLACK`] as the default color.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(Rgba::BLACK)
    }

    /// Create an empty map with an explicit default color.
    #[must_use]
    pub fn with_default(default: Rgba) -> Self {
        Self { ranges: Vec::new(), default }
    }

    /// Append a range and its color.
    pub fn add_range(&mut self, range: ValueRange, color: Rgba) {
        self.ranges.push((range, color));
    }

    /// The color for `value`: first matching range, or the default.
    #[must_use]
    pub fn lookup(&self, value: f64) -> Rgba {
        self.ranges
            .iter()
            .find(|(range, _)| range.contains(value))
            .map_or(self.default, |&(_, color)| color)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_first_match() {
        let mut cm = ColorMap::new();
        cm.add_range(ValueRange::new(0.0, 50.0), Rgba::YELLOW);
        cm.add_range(ValueRange::new(50.0, 100.0), Rgba::RED);

        assert_eq!(cm.lookup(25.0), Rgba::YELLOW);
        assert_eq!(cm.lookup(75.0), Rgba::RED);
        assert_eq!(cm.lookup(150.0), Rgba::BLACK);
    }

    #[test]
    fn test_half_open_bounds() {
        let mut cm = ColorMap::new();
        cm.add_range(ValueRange::new(0.0, 50.0), Rgba::YELLOW);
        cm.add_range(ValueRange::new(50.0, 100.0), Rgba::RED);

        assert_eq!(cm.lookup(50.0), Rgba::RED);
        assert_eq!(cm.lookup(0.0), Rgba::YELLOW);
    }

    #[test]
    fn test_custom_default() {
        let cm = ColorMap::with_default(Rgba::WHITE);
        assert_eq!(cm.lookup(1.0), Rgba::WHITE);
    }
}
