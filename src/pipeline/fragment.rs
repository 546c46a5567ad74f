//! Positioned text fragments, the unit of input to the layout pipeline.
//!
//! Coordinates are page-image pixels with the origin at the top-left and y
//! growing downward. The bounding box is reduced to its axis-aligned extent,
//! so the corner order reported by the OCR service does not matter.

/// Axis-aligned extent of a fragment's bounding polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Build the extent of a polygon given as `(x, y)` vertices.
    ///
    /// Returns `None` for an empty vertex list. Degenerate polygons (a single
    /// point, collinear vertices) yield a zero width and/or height.
    pub fn from_vertices<I>(vertices: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = vertices.into_iter();
        let (x0, y0) = iter.next()?;
        let init = Self {
            x_min: x0,
            x_max: x0,
            y_min: y0,
            y_max: y0,
        };
        Some(iter.fold(init, |b, (x, y)| Self {
            x_min: b.x_min.min(x),
            x_max: b.x_max.max(x),
            y_min: b.y_min.min(y),
            y_max: b.y_max.max(y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// One recognised text unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Recognised text; may be empty.
    pub text: String,
    /// Extent of the bounding polygon, `None` when the service sent no vertices.
    pub bounds: Option<BoundingBox>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, bounds: Option<BoundingBox>) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }

    /// A fragment with an axis-aligned box `[x_min, x_max] × [y_min, y_max]`.
    pub fn boxed(text: impl Into<String>, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::new(
            text,
            Some(BoundingBox {
                x_min,
                x_max,
                y_min,
                y_max,
            }),
        )
    }

    /// A fragment without position information.
    pub fn unpositioned(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_is_independent_of_vertex_order() {
        let clockwise = [(10.0, 5.0), (90.0, 5.0), (90.0, 25.0), (10.0, 25.0)];
        let shuffled = [(90.0, 25.0), (10.0, 5.0), (10.0, 25.0), (90.0, 5.0)];

        let a = BoundingBox::from_vertices(clockwise).unwrap();
        let b = BoundingBox::from_vertices(shuffled).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.x_min, 10.0);
        assert_eq!(a.x_max, 90.0);
        assert_eq!(a.y_min, 5.0);
        assert_eq!(a.y_max, 25.0);
        assert_eq!(a.width(), 80.0);
        assert_eq!(a.height(), 20.0);
    }

    #[test]
    fn empty_polygon_has_no_extent() {
        assert!(BoundingBox::from_vertices(Vec::<(f64, f64)>::new()).is_none());
    }

    #[test]
    fn single_point_is_degenerate_not_missing() {
        let b = BoundingBox::from_vertices([(3.0, 4.0)]).unwrap();
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 0.0);
    }
}
