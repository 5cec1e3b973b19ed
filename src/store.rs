//! The entity store: everything registered for rendering.
//!
//! Entities are created through the store, which assigns ids from a
//! strictly-increasing counter and grows a bounding envelope as geometry is
//! added. Insertion order is draw order. Entities are never removed;
//! geometry is immutable after creation while colors may be changed through
//! the returned handles.

use crate::color::Rgba;
use crate::colormap::ColorMap;
use crate::geom::{Aabb, Polygon, SimplePolygon, Triangle};
use crate::grid::ScalarGrid;
use crate::precision::Scalar;

/// Creation-ordered entity identifier. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fill and per-edge colors for a triangle entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleColors {
    /// Interior fill.
    pub fill: Rgba,
    /// Edge from p to q.
    pub pq: Rgba,
    /// Edge from q to r.
    pub qr: Rgba,
    /// Edge from r to p.
    pub rp: Rgba,
}

impl TriangleColors {
    /// One fill color and a single color for all three edges.
    #[must_use]
    pub const fn uniform(fill: Rgba, edge: Rgba) -> Self {
        Self { fill, pq: edge, qr: edge, rp: edge }
    }
}

impl Default for TriangleColors {
    fn default() -> Self {
        Self::uniform(Rgba::GRAY, Rgba::BLUE)
    }
}

/// Fill and edge colors for a polygon entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonColors {
    /// Interior fill.
    pub fill: Rgba,
    /// Exterior boundary edges.
    pub external_edge: Rgba,
    /// Hole boundary edges.
    pub internal_edge: Rgba,
}

impl Default for PolygonColors {
    fn default() -> Self {
        Self {
            fill: Rgba::GRAY,
            external_edge: Rgba::BLUE,
            internal_edge: Rgba::RED,
        }
    }
}

/// A renderable triangle.
#[derive(Debug, Clone)]
pub struct TriangleEntity<S> {
    id: EntityId,
    /// The triangle geometry.
    pub triangle: Triangle<S>,
    /// Fill and edge colors.
    pub colors: TriangleColors,
}

impl<S> TriangleEntity<S> {
    /// The entity id.
    pub fn id(&self) -> EntityId {
        self.id
    }
}

/// A renderable hole-free polygon.
#[derive(Debug, Clone)]
pub struct SimplePolygonEntity<S> {
    id: EntityId,
    /// The polygon geometry.
    pub polygon: SimplePolygon<S>,
    /// Interior fill color.
    pub fill: Rgba,
    /// Boundary edge color.
    pub edge: Rgba,
}

impl<S> SimplePolygonEntity<S> {
    /// The entity id.
    pub fn id(&self) -> EntityId {
        self.id
    }
}

/// A renderable polygon with holes.
#[derive(Debug, Clone)]
pub struct PolygonEntity<S> {
    id: EntityId,
    /// The polygon geometry.
    pub polygon: Polygon<S>,
    /// Fill and edge colors.
    pub colors: PolygonColors,
}

impl<S> PolygonEntity<S> {
    /// The entity id.
    pub fn id(&self) -> EntityId {
        self.id
    }
}

/// A renderable scalar grid with its color map.
#[derive(Debug, Clone)]
pub struct GridEntity<S> {
    id: EntityId,
    /// The grid raster.
    pub grid: ScalarGrid<S>,
    /// Cell-value color mapping.
    pub color_map: ColorMap,
}

impl<S> GridEntity<S> {
    /// The entity id.
    pub fn id(&self) -> EntityId {
        self.id
    }
}

/// Owner of all renderable entities and their growing envelope.
#[derive(Debug, Clone)]
pub struct EntityStore<S> {
    envelope: Option<Aabb<S>>,
    grids: Vec<GridEntity<S>>,
    triangles: Vec<TriangleEntity<S>>,
    simple_polygons: Vec<SimplePolygonEntity<S>>,
    polygons: Vec<PolygonEntity<S>>,
    next_id: u64,
}

impl<S: Scalar> EntityStore<S> {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            envelope: None,
            grids: Vec::new(),
            triangles: Vec::new(),
            simple_polygons: Vec::new(),
            polygons: Vec::new(),
            next_id: 0,
        }
    }

    /// A store whose envelope starts at `envelope` (typically the window's
    /// extent) rather than empty.
    #[must_use]
    pub fn with_envelope(envelope: Aabb<S>) -> Self {
        let mut store = Self::new();
        store.envelope = Some(envelope);
        store
    }

    /// The union of all added geometry extents (and any initial envelope).
    pub fn envelope(&self) -> Option<&Aabb<S>> {
        self.envelope.as_ref()
    }

    /// Registered grids, in draw order.
    pub fn grids(&self) -> &[GridEntity<S>] {
        &self.grids
    }

    /// Registered triangles, in draw order.
    pub fn triangles(&self) -> &[TriangleEntity<S>] {
        &self.triangles
    }

    /// Registered hole-free polygons, in draw order.
    pub fn simple_polygons(&self) -> &[SimplePolygonEntity<S>] {
        &self.simple_polygons
    }

    /// Registered polygons with holes, in draw order.
    pub fn polygons(&self) -> &[PolygonEntity<S>] {
        &self.polygons
    }

    /// Add a triangle; returns a handle for recoloring.
    pub fn add_triangle(
        &mut self,
        triangle: Triangle<S>,
        colors: TriangleColors,
    ) -> &mut TriangleEntity<S> {
        let id = self.take_id();
        self.grow_envelope(triangle.aabb());
        self.triangles.push(TriangleEntity { id, triangle, colors });
        self.triangles.last_mut().expect("just pushed")
    }

    /// Add a hole-free polygon; returns a handle for recoloring.
    pub fn add_simple_polygon(
        &mut self,
        polygon: SimplePolygon<S>,
        fill: Rgba,
        edge: Rgba,
    ) -> &mut SimplePolygonEntity<S> {
        let id = self.take_id();
        self.grow_envelope(polygon.aabb());
        self.simple_polygons.push(SimplePolygonEntity { id, polygon, fill, edge });
        self.simple_polygons.last_mut().expect("just pushed")
    }

    /// Add a polygon with holes; returns a handle for recoloring.
    pub fn add_polygon(
        &mut self,
        polygon: Polygon<S>,
        colors: PolygonColors,
    ) -> &mut PolygonEntity<S> {
        let id = self.take_id();
        self.grow_envelope(polygon.aabb());
        self.polygons.push(PolygonEntity { id, polygon, colors });
        self.polygons.last_mut().expect("just pushed")
    }

    /// Add a scalar grid and its color map.
    pub fn add_grid(&mut self, grid: ScalarGrid<S>, color_map: ColorMap) -> &mut GridEntity<S> {
        let id = self.take_id();
        self.grow_envelope(grid.bounds().clone());
        self.grids.push(GridEntity { id, grid, color_map });
        self.grids.last_mut().expect("just pushed")
    }

    fn take_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn grow_envelope(&mut self, aabb: Aabb<S>) {
        self.envelope = Some(match self.envelope.take() {
            Some(e) => e.union(&aabb),
            None => aabb,
        });
    }
}

impl<S: Scalar> Default for EntityStore<S> {
    fn default() -> Self {
        Self::new()
    }
}
