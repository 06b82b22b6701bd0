//! Closed polygon rings produced by boundary tracing.

use super::mapper::WorldPoint;

/// Axis-aligned extent of a ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// An ordered, closed sequence of world coordinates.
///
/// The first and last points are identical; the closing point is stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    points: Vec<WorldPoint>,
}

impl Ring {
    pub(crate) fn from_points(points: Vec<WorldPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<WorldPoint> {
        self.points
    }

    /// Number of stored points, closing point included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&WorldPoint> {
        self.points.first()
    }

    /// Number of distinct vertices, closing point excluded.
    pub fn vertex_count(&self) -> usize {
        if self.is_closed() {
            self.points.len() - 1
        } else {
            self.points.len()
        }
    }

    /// True when the first and last points are bitwise equal.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first.bit_eq(last),
            _ => false,
        }
    }

    /// Shoelace area; positive for counter-clockwise rings in a y-up frame.
    pub fn signed_area(&self) -> f64 {
        let sum: f64 = self
            .points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum();
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.points.iter().fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, point: &WorldPoint) -> bool {
        let mut inside = false;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Douglas-Peucker simplification of the closed ring.
    ///
    /// The result is closed again. With
    /// `epsilon = 0` only exactly collinear vertices are dropped, which
    /// removes the intermediate vertices along straight cell runs.
    pub fn simplify(&self, epsilon: f64) -> Ring {
        if self.points.len() < 4 || !self.is_closed() {
            return self.clone();
        }

        // Split at the vertex farthest from the start so both halves are open
        // polylines with distinct endpoints.
        let start = self.points[0];
        let (split, _) = self.points[..self.points.len() - 1]
            .iter()
            .enumerate()
            .fold((0, 0.0f64), |(best_i, best_d), (i, p)| {
                let d = p.distance_to(&start);
                if d > best_d {
                    (i, d)
                } else {
                    (best_i, best_d)
                }
            });

        if split == 0 {
            return self.clone();
        }

        let mut left = douglas_peucker(&self.points[..=split], epsilon);
        let right = douglas_peucker(&self.points[split..], epsilon);
        left.pop();
        left.extend(right);

        // The start vertex can itself sit on a straight run.
        let n = left.len();
        if n > 4 && left[0].distance_to_segment(&left[n - 2], &left[1]) <= epsilon {
            left.pop();
            left.remove(0);
            let first = left[0];
            left.push(first);
        }

        Ring::from_points(left)
    }
}

/// Douglas-Peucker over an open polyline. Both endpoints survive.
///
/// Works on a stack of index spans and a keep mask instead of recursing, so
/// long rings from large grids cannot overflow the stack.
fn douglas_peucker(points: &[WorldPoint], epsilon: f64) -> Vec<WorldPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut spans = vec![(0, n - 1)];
    while let Some((lo, hi)) = spans.pop() {
        let mut farthest = None;
        let mut max_dist = epsilon;
        for i in lo + 1..hi {
            let dist = points[i].distance_to_segment(&points[lo], &points[hi]);
            if dist > max_dist {
                max_dist = dist;
                farthest = Some(i);
            }
        }
        if let Some(i) = farthest {
            keep[i] = true;
            spans.push((lo, i));
            spans.push((i, hi));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring(coords: &[(f64, f64)]) -> Ring {
        Ring::from_points(coords.iter().map(|&c| WorldPoint::from(c)).collect())
    }

    fn unit_square() -> Ring {
        ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)])
    }

    #[test]
    fn test_closed_square_metrics() {
        let square = unit_square();
        assert!(square.is_closed());
        assert_eq!(square.len(), 5);
        assert_eq!(square.vertex_count(), 4);
        assert_relative_eq!(square.signed_area(), 1.0);
        assert_relative_eq!(square.perimeter(), 4.0);
        let b = square.bounds().unwrap();
        assert_relative_eq!(b.width(), 1.0);
        assert_relative_eq!(b.height(), 1.0);
    }

    #[test]
    fn test_clockwise_area_is_negative() {
        let cw = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_relative_eq!(cw.signed_area(), -1.0);
        assert_relative_eq!(cw.area(), 1.0);
    }

    #[test]
    fn test_open_ring() {
        let open = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(!open.is_closed());
        assert_eq!(open.vertex_count(), 3);
        assert!(ring(&[]).bounds().is_none());
    }

    #[test]
    fn test_contains() {
        let square = unit_square();
        assert!(square.contains(&WorldPoint::new(0.5, 0.5)));
        assert!(!square.contains(&WorldPoint::new(1.5, 0.5)));
        assert!(!square.contains(&WorldPoint::new(0.5, -0.1)));
    }

    #[test]
    fn test_simplify_drops_collinear_vertices() {
        // 2x2 square traced cell by cell, starting mid-edge.
        let staircase = ring(&[
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 1.0),
            (0.0, 0.0),
            (1.0, 0.0),
        ]);
        let simplified = staircase.simplify(0.0);
        assert!(simplified.is_closed());
        assert_eq!(simplified.vertex_count(), 4);
        assert_relative_eq!(simplified.area(), 4.0);
    }

    #[test]
    fn test_simplify_tolerance_removes_notch() {
        // A 4x1 bar with a shallow notch on its top edge.
        let notched = ring(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (2.5, 1.0),
            (2.5, 0.9),
            (1.5, 0.9),
            (1.5, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]);
        assert_eq!(notched.simplify(0.0).vertex_count(), 8);
        let smoothed = notched.simplify(0.2);
        assert!(smoothed.is_closed());
        assert_eq!(smoothed.vertex_count(), 4);
        assert_relative_eq!(smoothed.area(), 4.0);
    }

    #[test]
    fn test_simplify_keeps_corners() {
        let square = unit_square();
        let simplified = square.simplify(0.0);
        assert_eq!(simplified, square);
    }
}
