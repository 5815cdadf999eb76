//! Scanline rasterization of triangles over an integer grid.
//!
//! This is a generic geometric primitive with no map knowledge: given the
//! vertices of a 2D triangle and a y-range, it reports every integer grid
//! cell the triangle covers through a callback. The view uses it to walk the
//! tile-grid cells covered by the screen-space view trapezoid, but it works
//! for any screen-space coverage problem.

use nalgebra::Point2;

/// An edge between two points, oriented so that y is non-decreasing.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    dx: f64,
    dy: f64,
}

impl Edge {
    fn new(mut a: Point2<f64>, mut b: Point2<f64>) -> Self {
        if a.y > b.y {
            std::mem::swap(&mut a, &mut b);
        }
        Edge {
            x0: a.x,
            y0: a.y,
            x1: b.x,
            y1: b.y,
            dx: b.x - a.x,
            dy: b.y - a.y,
        }
    }
}

fn scan_line(x0: i32, x1: i32, y: i32, scan: &mut impl FnMut(i32, i32)) {
    for x in x0..x1 {
        scan(x, y);
    }
}

fn scan_span(mut e0: Edge, mut e1: Edge, y_min: i32, y_max: i32, scan: &mut impl FnMut(i32, i32)) {
    // e1 has the shorter y-span, so it limits the y coverage
    let y0 = f64::from(y_min).max(e1.y0.floor()) as i32;
    let y1 = f64::from(y_max).min(e1.y1.ceil()) as i32;

    // sort the edges by x-coordinate
    if e0.x0 == e1.x0 && e0.y0 == e1.y0 {
        if e0.x0 + e1.dy / e0.dy * e0.dx < e1.x1 {
            std::mem::swap(&mut e0, &mut e1);
        }
    } else if e0.x1 - e1.dy / e0.dy * e0.dx < e1.x0 {
        std::mem::swap(&mut e0, &mut e1);
    }

    // scan lines!
    let m0 = e0.dx / e0.dy;
    let m1 = e1.dx / e1.dy;
    let d0 = if e0.dx > 0.0 { 1.0 } else { 0.0 };
    let d1 = if e1.dx < 0.0 { 1.0 } else { 0.0 };
    for y in y0..y1 {
        let x0 = m0 * (f64::from(y) + d0 - e0.y0).clamp(0.0, e0.dy) + e0.x0;
        let x1 = m1 * (f64::from(y) + d1 - e1.y0).clamp(0.0, e1.dy) + e1.x0;
        scan_line(x1.floor() as i32, x0.ceil() as i32, y, scan);
    }
}

/// Calls `scan(x, y)` for every integer grid cell covered by the triangle
/// `(a, b, c)`, restricted to rows `y_min..y_max`.
///
/// Cells on a shared edge of two triangles may be reported by both; callers
/// that need uniqueness must deduplicate.
pub fn scan_triangle(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    y_min: i32,
    y_max: i32,
    scan: &mut impl FnMut(i32, i32),
) {
    let mut ab = Edge::new(a, b);
    let mut bc = Edge::new(b, c);
    let mut ca = Edge::new(c, a);

    // place the edge with the greatest y-extent in ca
    if ab.dy > ca.dy {
        std::mem::swap(&mut ab, &mut ca);
    }
    if bc.dy > ca.dy {
        std::mem::swap(&mut bc, &mut ca);
    }

    if ab.dy > 0.0 {
        scan_span(ca, ab, y_min, y_max, scan);
    }
    if bc.dy > 0.0 {
        scan_span(ca, bc, y_min, y_max, scan);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn collect(
        a: (f64, f64),
        b: (f64, f64),
        c: (f64, f64),
        y_min: i32,
        y_max: i32,
    ) -> HashSet<(i32, i32)> {
        let mut cells = HashSet::new();
        scan_triangle(
            Point2::new(a.0, a.1),
            Point2::new(b.0, b.1),
            Point2::new(c.0, c.1),
            y_min,
            y_max,
            &mut |x, y| {
                cells.insert((x, y));
            },
        );
        cells
    }

    #[test]
    fn right_triangle_covers_the_expected_cells() {
        let cells = collect((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), 0, 8);

        let mut expected = HashSet::new();
        for y in 0..4 {
            for x in 0..(4 - y) {
                expected.insert((x, y));
            }
        }
        assert_eq!(cells, expected);
    }

    #[test]
    fn quad_split_into_two_triangles_covers_the_rectangle() {
        let mut cells = collect((0.0, 0.0), (3.0, 0.0), (3.0, 2.0), 0, 4);
        cells.extend(collect((3.0, 2.0), (0.0, 2.0), (0.0, 0.0), 0, 4));

        let mut expected = HashSet::new();
        for y in 0..2 {
            for x in 0..3 {
                expected.insert((x, y));
            }
        }
        assert_eq!(cells, expected);
    }

    #[test]
    fn rows_outside_the_scan_range_are_clipped() {
        let mut cells = collect((0.0, 0.0), (3.0, 0.0), (3.0, 2.0), 1, 2);
        cells.extend(collect((3.0, 2.0), (0.0, 2.0), (0.0, 0.0), 1, 2));

        assert_eq!(cells, [(0, 1), (1, 1), (2, 1)].into_iter().collect());
    }

    #[test]
    fn degenerate_triangle_covers_nothing() {
        assert!(collect((0.0, 0.0), (5.0, 0.0), (9.0, 0.0), 0, 8).is_empty());
    }

    #[test]
    fn sub_cell_triangle_still_reports_its_cell() {
        let cells = collect((0.2, 0.2), (0.8, 0.3), (0.5, 0.7), 0, 8);
        assert!(cells.contains(&(0, 0)));
    }
}
