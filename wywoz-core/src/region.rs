//! Recognized text regions as reported by a text recognition service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Axis-aligned box in image pixel coordinates.
pub struct BoundingBox {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl BoundingBox {
    /// Box from a top-left corner and a size.
    #[must_use]
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Smallest box enclosing the given polygon corners.
    ///
    /// Returns `None` for an empty polygon.
    #[must_use]
    pub fn from_points(points: &[(f32, f32)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Self {
            left: first.0,
            top: first.1,
            right: first.0,
            bottom: first.1,
        };
        Some(rest.iter().fold(seed, |acc, &(x_pos, y_pos)| Self {
            left: acc.left.min(x_pos),
            top: acc.top.min(y_pos),
            right: acc.right.max(x_pos),
            bottom: acc.bottom.max(y_pos),
        }))
    }

    /// Smallest box enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    /// Vertical centre of the box.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One unit of recognized text with its position and confidence.
pub struct TextRegion {
    /// Recognized text.
    pub text: String,
    /// Where the text was found.
    pub bounding_box: BoundingBox,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
}

impl TextRegion {
    /// Construct a text region.
    #[must_use]
    pub fn new<T: Into<String>>(text: T, bounding_box: BoundingBox, confidence: f32) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_collapse_to_enclosing_box() {
        let quad = [(10.0, 5.0), (50.0, 7.0), (49.0, 20.0), (9.0, 18.0)];
        let bbox = BoundingBox::from_points(&quad).expect("non-empty polygon");
        assert_eq!(
            bbox,
            BoundingBox {
                left: 9.0,
                top: 5.0,
                right: 50.0,
                bottom: 20.0
            }
        );
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn rect_geometry() {
        let bbox = BoundingBox::from_rect(4.0, 10.0, 20.0, 8.0);
        assert!((bbox.height() - 8.0).abs() < f32::EPSILON);
        assert!((bbox.center_y() - 14.0).abs() < f32::EPSILON);
    }
}
