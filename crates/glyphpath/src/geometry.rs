//! What a sync pass hands to the renderer

use std::sync::Arc;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};

use glyphpath_core::outline::{control_bounds, to_bez_path, ContourCommand};

/// Anchored contours in font units plus the mapping into layer space
#[derive(Debug, Clone, PartialEq)]
pub struct TextGeometry {
    contours: Arc<[ContourCommand]>,
    transform: Affine,
    bounds: Rect,
}

impl TextGeometry {
    /// `translate(origin) * scale(size / units_per_em)`
    pub fn new(contours: Arc<[ContourCommand]>, origin: Point, size: Vec2, units_per_em: u16) -> Self {
        let upem = f64::from(units_per_em.max(1));
        let transform =
            Affine::translate(origin.to_vec2()) * Affine::scale_non_uniform(size.x / upem, size.y / upem);
        let bounds = match control_bounds(&contours) {
            Some(rect) => transform.transform_rect_bbox(rect),
            None => Rect::from_points(origin, origin),
        };

        Self {
            contours,
            transform,
            bounds,
        }
    }

    /// Nothing to draw; the bounds collapse onto `origin`
    pub fn empty(origin: Point) -> Self {
        Self::new(Arc::from(Vec::new()), origin, Vec2::new(1.0, 1.0), 1)
    }

    /// Commands in font units, anchored but unscaled
    pub fn contours(&self) -> &[ContourCommand] {
        &self.contours
    }

    pub fn shared_contours(&self) -> Arc<[ContourCommand]> {
        self.contours.clone()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Bounding box in layer space
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Commands mapped into layer space
    pub fn world_contours(&self) -> Vec<ContourCommand> {
        self.contours
            .iter()
            .map(|command| command.map_points(|p| self.transform * p))
            .collect()
    }

    /// A kurbo path in layer space; conic segments become quadratics
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = to_bez_path(&self.contours);
        path.apply_affine(self.transform);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn unit_square() -> Arc<[ContourCommand]> {
        Arc::from(vec![
            ContourCommand::MoveTo(Point::new(0.0, 0.0)),
            ContourCommand::LineTo(Point::new(1000.0, 0.0)),
            ContourCommand::LineTo(Point::new(1000.0, 1000.0)),
            ContourCommand::Close,
        ])
    }

    #[test]
    fn test_empty_geometry_is_a_point_at_origin() {
        let geometry = TextGeometry::empty(Point::new(2.0, 3.0));
        assert!(geometry.is_empty());
        assert_eq!(geometry.bounds(), Rect::new(2.0, 3.0, 2.0, 3.0));
        assert_eq!(geometry.to_bez_path().elements().len(), 0);
    }

    #[test]
    fn test_bounds_follow_origin_and_size() {
        let geometry = TextGeometry::new(unit_square(), Point::new(1.0, 1.0), Vec2::new(500.0, 2000.0), 1000);
        assert_eq!(geometry.bounds(), Rect::new(1.0, 1.0, 501.0, 2001.0));
    }

    #[test]
    fn test_world_contours_match_bez_path() {
        let geometry = TextGeometry::new(unit_square(), Point::ORIGIN, Vec2::new(250.0, 250.0), 1000);
        let world = geometry.world_contours();
        assert_eq!(world[1], ContourCommand::LineTo(Point::new(250.0, 0.0)));
        assert_eq!(geometry.to_bez_path().bounding_box(), geometry.bounds());
    }

    #[test]
    fn test_zero_units_per_em_does_not_divide_by_zero() {
        let geometry = TextGeometry::new(unit_square(), Point::ORIGIN, Vec2::new(1.0, 1.0), 0);
        assert!(geometry.bounds().is_finite());
    }
}
