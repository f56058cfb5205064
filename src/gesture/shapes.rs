//! Target shapes the user is asked to trace

use super::path::{GesturePath, Point};

/// Produces the target path for a surface of the given size
pub trait TargetGenerator {
    fn generate(&self, width: f64, height: f64) -> GesturePath;
}

impl<F> TargetGenerator for F
where
    F: Fn(f64, f64) -> GesturePath,
{
    fn generate(&self, width: f64, height: f64) -> GesturePath {
        self(width, height)
    }
}

/// Sample a circle every `step_degrees`, starting at angle 0 and going
/// clockwise in screen space (y grows downward).
pub fn circle_path(center: Point, radius: f64, step_degrees: u32) -> GesturePath {
    (0..360)
        .step_by(step_degrees.max(1) as usize)
        .map(|deg| {
            let rad = f64::from(deg).to_radians();
            Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
        })
        .collect()
}

/// Circle centred on the surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleTarget {
    pub radius: f64,
    pub step_degrees: u32,
}

impl CircleTarget {
    pub fn new(radius: f64, step_degrees: u32) -> Self {
        Self { radius, step_degrees }
    }
}

impl Default for CircleTarget {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_TARGET_RADIUS,
            crate::config::DEFAULT_TARGET_STEP_DEGREES,
        )
    }
}

impl TargetGenerator for CircleTarget {
    fn generate(&self, width: f64, height: f64) -> GesturePath {
        circle_path(Point::new(width / 2.0, height / 2.0), self.radius, self.step_degrees)
    }
}
