//! Integer midpoint circle rasterization, used for circumcircles.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::precision::Precision;

use super::Renderer;

/// Paint the circle of `radius` pixels centred on screen `(centre_row,
/// centre_col)`. Each step paints the eight symmetric octant points; points
/// falling off-canvas are dropped by the paint bounds check.
pub(crate) fn draw_midpoint_circle<P: Precision>(
    renderer: &Renderer<'_, P>,
    fb: &mut Framebuffer,
    centre_row: i64,
    centre_col: i64,
    radius: i64,
    color: Rgba,
) {
    if radius < 0 {
        return;
    }
    let mut y = radius;
    let mut d = (5 - radius * 4) / 4;
    let mut x = 0;
    loop {
        renderer.paint_pixel(fb, centre_row + x, centre_col + y, color);
        renderer.paint_pixel(fb, centre_row + x, centre_col - y, color);
        renderer.paint_pixel(fb, centre_row - x, centre_col + y, color);
        renderer.paint_pixel(fb, centre_row - x, centre_col - y, color);
        renderer.paint_pixel(fb, centre_row + y, centre_col + x, color);
        renderer.paint_pixel(fb, centre_row + y, centre_col - x, color);
        renderer.paint_pixel(fb, centre_row - y, centre_col + x, color);
        renderer.paint_pixel(fb, centre_row - y, centre_col - x, color);
        if d < 0 {
            d += 2 * x + 1;
        } else {
            d += 2 * (x - y) + 1;
            y -= 1;
        }
        x += 1;
        if x > y {
            break;
        }
    }
}
