//! Gesture paths - ordered 2D points in canvas pixel space

use nalgebra::Point2;

/// Canvas-space coordinate
pub type Point = Point2<f64>;

/// Ordered points; insertion order is capture order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GesturePath {
    points: Vec<Point>,
}

impl GesturePath {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Flat `[x0, y0, x1, y1, ...]` for handing to JS
    pub fn as_flat(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.points.len() * 2);
        for p in &self.points {
            result.push(p.x);
            result.push(p.y);
        }
        result
    }
}

impl FromIterator<Point> for GesturePath {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}
