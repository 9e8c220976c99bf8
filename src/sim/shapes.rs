//! Value types for collision geometry
//!
//! A ball is a circle, while paddles, blocks and the canvas are axis-aligned
//! rectangles given by their top-left corner and size.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A circle (the ball)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    /// Radius (>= 0)
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            radius: radius.max(0.0),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.center.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.center.y
    }

    /// Bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    /// Whether center and radius are all finite
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite()
    }
}

/// An axis-aligned rectangle (paddle, block, boundary)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle of the given size whose center is `center`
    pub fn from_center(center: DVec2, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.center_x(), self.y + self.height / 2.0)
    }

    /// Point containment, inclusive of the boundary
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Same rectangle moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(60.0, 500.0, 80.0, 10.0);
        assert_eq!(r.left(), 60.0);
        assert_eq!(r.right(), 140.0);
        assert_eq!(r.top(), 500.0);
        assert_eq!(r.bottom(), 510.0);
        assert_eq!(r.center(), DVec2::new(100.0, 505.0));
    }

    #[test]
    fn test_rect_contains_boundary() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(DVec2::new(0.0, 0.0)));
        assert!(r.contains(DVec2::new(10.0, 10.0)));
        assert!(r.contains(DVec2::new(5.0, 10.0)));
        assert!(!r.contains(DVec2::new(10.01, 5.0)));
    }

    #[test]
    fn test_negative_sizes_clamped() {
        let r = Rect::new(0.0, 0.0, -5.0, 3.0);
        assert_eq!(r.width, 0.0);
        let c = Circle::new(0.0, 0.0, -1.0);
        assert_eq!(c.radius, 0.0);
    }

    #[test]
    fn test_from_center() {
        let r = Rect::from_center(DVec2::new(400.0, 550.0), 100.0, 20.0);
        assert_eq!(r.x, 350.0);
        assert_eq!(r.y, 540.0);
        assert_eq!(r.center_x(), 400.0);
    }

    #[test]
    fn test_circle_bounds() {
        let c = Circle::new(100.0, 50.0, 10.0);
        let b = c.bounds();
        assert_eq!(b.left(), 90.0);
        assert_eq!(b.bottom(), 60.0);
    }
}
