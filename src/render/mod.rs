//! The rasterizer: walks candidate pixels per entity and paints the frame
//! buffer.
//!
//! Layers are applied in order; a later layer overwrites earlier paint at
//! the same pixel, and entities within a layer compose in insertion order
//! (last writer wins). Per-entity candidate pixels come from the entity's
//! screen-space bounding box, clamped to the canvas, so off-canvas entities
//! contribute nothing.

use log::warn;

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geom::{
    convex_intersects, segment_intersects_convex, Point, Segment, SimplePolygon,
};
use crate::precision::Precision;
use crate::store::{
    EntityId, EntityStore, GridEntity, PolygonEntity, SimplePolygonEntity, TriangleEntity,
};
use crate::window::{PixelMapper, Window};

mod circle;

use circle::draw_midpoint_circle;

/// One renderable category, applied in sequence to the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Scalar grids through their color maps.
    Grids,
    /// Triangles: fill, per-edge overlays, optional circumcircles.
    Triangles {
        /// Draw each triangle's circumcircle before the triangle.
        circumcircles: bool,
    },
    /// Polygons without holes.
    SimplePolygons,
    /// Polygons with holes.
    Polygons,
    /// Origin-through axis lines over the store envelope, drawn last.
    Axes {
        /// X-axis color.
        x_color: Rgba,
        /// Y-axis color.
        y_color: Rgba,
    },
}

impl Layer {
    /// The default stack: grids, triangles (no circumcircles), hole-free
    /// polygons, polygons. No axes.
    #[must_use]
    pub fn default_stack() -> Vec<Layer> {
        vec![
            Layer::Grids,
            Layer::Triangles { circumcircles: false },
            Layer::SimplePolygons,
            Layer::Polygons,
        ]
    }
}

/// A recoverable problem encountered while rendering. The pixel or entity
/// involved is skipped and rendering continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderWarning {
    /// A grid cell value could not be read.
    #[error("grid entity {entity}: cell ({row}, {col}) unreadable: {message}")]
    GridCell {
        /// Grid entity id.
        entity: EntityId,
        /// Cell row.
        row: usize,
        /// Cell column.
        col: usize,
        /// Failure description.
        message: String,
    },
    /// A triangle's circumcircle could not be derived.
    #[error("triangle entity {entity}: circumcircle is degenerate")]
    DegenerateCircumcircle {
        /// Triangle entity id.
        entity: EntityId,
    },
}

/// A rendered frame plus the warnings accumulated while producing it.
#[derive(Debug)]
pub struct RenderOutput {
    /// The pixel buffer, top row first.
    pub framebuffer: Framebuffer,
    /// Recoverable problems, in encounter order.
    pub warnings: Vec<RenderWarning>,
}

/// Renders an [`EntityStore`] through a [`PixelMapper`].
#[derive(Debug)]
pub struct Renderer<'a, P: Precision> {
    store: &'a EntityStore<P::Scalar>,
    mapper: PixelMapper<P>,
    layers: Vec<Layer>,
}

impl<'a, P: Precision> Renderer<'a, P> {
    /// Create a renderer for `store` viewed through `window` at
    /// `nrows` x `ncols`, with the default layer stack.
    pub fn new(
        store: &'a EntityStore<P::Scalar>,
        window: &Window<P::Scalar>,
        nrows: usize,
        ncols: usize,
        ctx: P,
    ) -> Result<Self> {
        let mapper = PixelMapper::new(window, nrows, ncols, ctx)?;
        Ok(Self {
            store,
            mapper,
            layers: Layer::default_stack(),
        })
    }

    /// Replace the layer stack.
    #[must_use]
    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// The mapper in use.
    pub fn mapper(&self) -> &PixelMapper<P> {
        &self.mapper
    }

    /// Rasterize every layer into a fresh framebuffer.
    pub fn render(&self) -> RenderOutput {
        let mut fb = Framebuffer::new(self.mapper.ncols() as u32, self.mapper.nrows() as u32)
            .expect("mapper guarantees nonzero dimensions");
        let warnings = self.render_into(&mut fb);
        RenderOutput { framebuffer: fb, warnings }
    }

    /// Rasterize every layer into an existing framebuffer (e.g. one cleared
    /// to a background color).
    pub fn render_into(&self, fb: &mut Framebuffer) -> Vec<RenderWarning> {
        let mut warnings = Vec::new();
        for layer in &self.layers {
            match *layer {
                Layer::Grids => {
                    for grid in self.store.grids() {
                        self.render_grid(grid, fb, &mut warnings);
                    }
                }
                Layer::Triangles { circumcircles } => {
                    for tri in self.store.triangles() {
                        self.render_triangle(tri, circumcircles, fb, &mut warnings);
                    }
                }
                Layer::SimplePolygons => {
                    for poly in self.store.simple_polygons() {
                        self.render_simple_polygon(poly, fb);
                    }
                }
                Layer::Polygons => {
                    for poly in self.store.polygons() {
                        self.render_polygon(poly, fb);
                    }
                }
                Layer::Axes { x_color, y_color } => self.render_axes(x_color, y_color, fb),
            }
        }
        warnings
    }

    /// Paint pixel `(row, col)` in bottom-up row coordinates, flipping to
    /// the buffer's top-down convention. Out-of-canvas indices are ignored.
    fn paint(&self, fb: &mut Framebuffer, row: i64, col: i64, color: Rgba) {
        let nrows = self.mapper.nrows() as i64;
        let ncols = self.mapper.ncols() as i64;
        if row < 0 || row >= nrows || col < 0 || col >= ncols {
            return;
        }
        let flipped = nrows - row - 1;
        fb.set_pixel(col as u32, flipped as u32, color);
    }

    /// Clamp a screen-space bounding box to the canvas. `None` when the box
    /// lies entirely off-canvas.
    fn clamp_box(&self, rows: (i64, i64), cols: (i64, i64)) -> Option<(ScreenBox, ScreenBox)> {
        let clamp = |lo: i64, hi: i64, n: usize| -> Option<ScreenBox> {
            let n = n as i64;
            let lo = lo.max(0);
            let hi = hi.min(n - 1);
            (lo <= hi).then_some(ScreenBox { lo, hi })
        };
        Some((
            clamp(rows.0, rows.1, self.mapper.nrows())?,
            clamp(cols.0, cols.1, self.mapper.ncols())?,
        ))
    }

    fn screen_extent(&self, points: &[Point<P::Scalar>]) -> Option<(ScreenBox, ScreenBox)> {
        let mut rows: Option<(i64, i64)> = None;
        let mut cols: Option<(i64, i64)> = None;
        for p in points {
            let r = self.mapper.row_of(p);
            let c = self.mapper.col_of(p);
            rows = Some(rows.map_or((r, r), |(lo, hi)| (lo.min(r), hi.max(r))));
            cols = Some(cols.map_or((c, c), |(lo, hi)| (lo.min(c), hi.max(c))));
        }
        self.clamp_box(rows?, cols?)
    }

    fn render_grid(
        &self,
        entity: &GridEntity<P::Scalar>,
        fb: &mut Framebuffer,
        warnings: &mut Vec<RenderWarning>,
    ) {
        let ctx = self.mapper.ctx().clone();
        let grid = &entity.grid;
        for row in 0..grid.nrows() {
            for col in 0..grid.ncols() {
                let centre = grid.cell_centre(row, col, &ctx);
                let value = match grid.value(row, col) {
                    Ok(v) => v,
                    Err(e) => {
                        warn!("grid cell ({row}, {col}) skipped: {e}");
                        warnings.push(RenderWarning::GridCell {
                            entity: entity.id(),
                            row,
                            col,
                            message: e.to_string(),
                        });
                        continue;
                    }
                };
                let color = entity.color_map.lookup(value);
                self.paint(fb, self.mapper.row_of(&centre), self.mapper.col_of(&centre), color);
            }
        }
    }

    fn render_triangle(
        &self,
        entity: &TriangleEntity<P::Scalar>,
        circumcircles: bool,
        fb: &mut Framebuffer,
        warnings: &mut Vec<RenderWarning>,
    ) {
        let ctx = self.mapper.ctx().clone();
        let t = &entity.triangle;

        if circumcircles {
            match t.circumcircle(&ctx) {
                Some((centre, radius)) => {
                    let radius_px = ctx.trunc(&(radius / self.mapper.pixel_size().clone()));
                    draw_midpoint_circle(
                        self,
                        fb,
                        self.mapper.row_of(&centre),
                        self.mapper.col_of(&centre),
                        radius_px,
                        Rgba::WHITE,
                    );
                }
                None => {
                    warn!("triangle {} circumcircle skipped: degenerate", entity.id());
                    warnings.push(RenderWarning::DegenerateCircumcircle { entity: entity.id() });
                }
            }
        }

        let Some((rows, cols)) = self.screen_extent(&t.vertices()) else {
            return;
        };
        let edges = [
            (t.pq(), entity.colors.pq),
            (t.qr(), entity.colors.qr),
            (t.rp(), entity.colors.rp),
        ];
        for row in rows.iter() {
            for col in cols.iter() {
                let quad = self.mapper.pixel_rect(row, col);
                if t.intersects_convex(&quad, &ctx) {
                    self.paint(fb, row, col, entity.colors.fill);
                    for (edge, color) in &edges {
                        if segment_intersects_convex(edge, &quad, &ctx) {
                            self.paint(fb, row, col, *color);
                        }
                    }
                }
            }
        }
    }

    fn render_simple_polygon(&self, entity: &SimplePolygonEntity<P::Scalar>, fb: &mut Framebuffer) {
        let ctx = self.mapper.ctx().clone();
        let poly = &entity.polygon;
        let Some((rows, cols)) = self.screen_extent(poly.hull()) else {
            return;
        };
        let edges = poly.edges();
        for row in rows.iter() {
            for col in cols.iter() {
                let quad = self.mapper.pixel_rect(row, col);
                if !convex_intersects(poly.hull(), &quad, &ctx) {
                    continue;
                }
                if poly.intersects_convex(&quad, &ctx) {
                    self.paint(fb, row, col, entity.fill);
                }
                if edges
                    .iter()
                    .any(|e| segment_intersects_convex(e, &quad, &ctx))
                {
                    self.paint(fb, row, col, entity.edge);
                }
            }
        }
    }

    fn render_polygon(&self, entity: &PolygonEntity<P::Scalar>, fb: &mut Framebuffer) {
        let ctx = self.mapper.ctx().clone();
        let poly = &entity.polygon;
        let Some((rows, cols)) = self.screen_extent(poly.hull()) else {
            return;
        };
        let external_edges = poly.exterior().edges();
        let hole_edges: Vec<_> = poly.holes().iter().map(SimplePolygon::edges).collect();
        for row in rows.iter() {
            for col in cols.iter() {
                let quad = self.mapper.pixel_rect(row, col);
                if !convex_intersects(poly.hull(), &quad, &ctx) {
                    continue;
                }
                if poly.intersects_convex(&quad, &ctx) {
                    self.paint(fb, row, col, entity.colors.fill);
                }
                if external_edges
                    .iter()
                    .any(|e| segment_intersects_convex(e, &quad, &ctx))
                {
                    self.paint(fb, row, col, entity.colors.external_edge);
                }
                for edges in &hole_edges {
                    if edges
                        .iter()
                        .any(|e| segment_intersects_convex(e, &quad, &ctx))
                    {
                        self.paint(fb, row, col, entity.colors.internal_edge);
                    }
                }
            }
        }
    }

    fn render_axes(&self, x_color: Rgba, y_color: Rgba, fb: &mut Framebuffer) {
        let ctx = self.mapper.ctx().clone();
        let Some(envelope) = self.store.envelope() else {
            return;
        };
        let zero = ctx.zero();
        let x_axis = Segment::new(
            Point::new(envelope.min_x.clone(), zero.clone()),
            Point::new(envelope.max_x.clone(), zero.clone()),
        );
        let y_axis = Segment::new(
            Point::new(zero.clone(), envelope.min_y.clone()),
            Point::new(zero, envelope.max_y.clone()),
        );
        self.render_segment(&x_axis, x_color, fb);
        self.render_segment(&y_axis, y_color, fb);
    }

    /// Paint every pixel whose rectangle touches `segment`.
    pub fn render_segment(&self, segment: &Segment<P::Scalar>, color: Rgba, fb: &mut Framebuffer) {
        let ctx = self.mapper.ctx().clone();
        let endpoints = [segment.p.clone(), segment.q.clone()];
        let Some((rows, cols)) = self.screen_extent(&endpoints) else {
            return;
        };
        for row in rows.iter() {
            for col in cols.iter() {
                let quad = self.mapper.pixel_rect(row, col);
                if segment_intersects_convex(segment, &quad, &ctx) {
                    self.paint(fb, row, col, color);
                }
            }
        }
    }

    pub(crate) fn paint_pixel(&self, fb: &mut Framebuffer, row: i64, col: i64, color: Rgba) {
        self.paint(fb, row, col, color);
    }
}

/// An inclusive screen index range.
#[derive(Debug, Clone, Copy)]
struct ScreenBox {
    lo: i64,
    hi: i64,
}

impl ScreenBox {
    fn iter(self) -> impl Iterator<Item = i64> {
        self.lo..=self.hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Triangle;
    use crate::precision::FloatPrecision;
    use crate::store::TriangleColors;

    fn pt(x: f64, y: f64) -> Point<f64> {
        Point::new(x, y)
    }

    fn window_150(ctx: &FloatPrecision) -> Window<f64> {
        Window::axis_aligned(pt(-75.0, -75.0), pt(75.0, 75.0), ctx).expect("valid window")
    }

    #[test]
    fn test_render_empty_store_is_blank() {
        let ctx = FloatPrecision::default();
        let store = EntityStore::new();
        let renderer =
            Renderer::new(&store, &window_150(&ctx), 150, 150, ctx).expect("valid renderer");
        let out = renderer.render();
        assert!(out.warnings.is_empty());
        assert!(out
            .framebuffer
            .pixels()
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn test_triangle_fill_painted() {
        let ctx = FloatPrecision::default();
        let mut store = EntityStore::new();
        let t = Triangle::new(pt(-50.0, -50.0), pt(0.0, 50.0), pt(50.0, -50.0), &ctx)
            .expect("valid triangle");
        store.add_triangle(t, TriangleColors::uniform(Rgba::GRAY, Rgba::BLUE));
        let renderer =
            Renderer::new(&store, &window_150(&ctx), 150, 150, ctx).expect("valid renderer");
        let out = renderer.render();
        // World (0, 0) is screen row 75 -> buffer y = 150 - 75 - 1, col 75.
        assert_eq!(out.framebuffer.get_pixel(75, 74), Some(Rgba::GRAY));
        // Outside the triangle stays blank.
        assert_eq!(out.framebuffer.get_pixel(5, 5), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_off_canvas_entity_paints_nothing() {
        let ctx = FloatPrecision::default();
        let mut store = EntityStore::new();
        let t = Triangle::new(pt(500.0, 500.0), pt(510.0, 500.0), pt(500.0, 510.0), &ctx)
            .expect("valid triangle");
        store.add_triangle(t, TriangleColors::default());
        let renderer =
            Renderer::new(&store, &window_150(&ctx), 150, 150, ctx).expect("valid renderer");
        let out = renderer.render();
        assert!(out.framebuffer.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_later_triangle_overwrites_earlier() {
        let ctx = FloatPrecision::default();
        let mut store = EntityStore::new();
        let a = Triangle::new(pt(-40.0, -40.0), pt(0.0, 40.0), pt(40.0, -40.0), &ctx)
            .expect("valid triangle");
        let b = a.clone();
        store.add_triangle(a, TriangleColors::uniform(Rgba::RED, Rgba::RED));
        store.add_triangle(b, TriangleColors::uniform(Rgba::GREEN, Rgba::GREEN));
        let renderer =
            Renderer::new(&store, &window_150(&ctx), 150, 150, ctx).expect("valid renderer");
        let out = renderer.render();
        assert_eq!(out.framebuffer.get_pixel(75, 74), Some(Rgba::GREEN));
    }

    #[test]
    fn test_axes_layer_draws_origin_lines() {
        let ctx = FloatPrecision::default();
        let mut store = EntityStore::new();
        let t = Triangle::new(pt(-50.0, -50.0), pt(0.0, 50.0), pt(50.0, -50.0), &ctx)
            .expect("valid triangle");
        store.add_triangle(t, TriangleColors::default());
        let renderer = Renderer::new(&store, &window_150(&ctx), 150, 150, ctx)
            .expect("valid renderer")
            .with_layers(vec![Layer::Axes {
                x_color: Rgba::BLUE,
                y_color: Rgba::RED,
            }]);
        let out = renderer.render();
        // The y axis runs through column 75.
        assert_eq!(out.framebuffer.get_pixel(75, 80), Some(Rgba::RED));
        // The x axis runs through world y = 0 where the y axis overwrote it
        // at the crossing, but not further out.
        assert_eq!(out.framebuffer.get_pixel(30, 74), Some(Rgba::BLUE));
    }
}
