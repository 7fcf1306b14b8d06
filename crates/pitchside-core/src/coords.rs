//! Renderer↔server frame conversion and field picking.
//!
//! The renderer is Y-up with the field on `y = 0`; the server is Z-up with
//! x pointing at the right-hand goal. The conversion `(x, y, z) ↦ (−x, z, y)`
//! is its own inverse, so the same matrix maps both ways.

use nalgebra::{Isometry3, Matrix3, Matrix4, Perspective3, Point3, Vector3};

use crate::model::{ScreenPoint, SelectableEntity, ServerPoint, WorldPoint};
use crate::ports::FieldPicker;

fn frame_swap() -> Matrix3<f32> {
    Matrix3::new(
        -1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, //
        0.0, 1.0, 0.0,
    )
}

pub fn to_server_space(point: WorldPoint) -> ServerPoint {
    ServerPoint(frame_swap() * point.0)
}

pub fn to_world_space(point: ServerPoint) -> WorldPoint {
    WorldPoint(frame_swap() * point.0)
}

// ── FieldCamera ─────────────────────────────────────────────────────

/// Perspective camera looking at the field.
///
/// As a [`FieldPicker`] it only resolves ground points: it holds no scene
/// geometry, so [`pick_entity`](FieldPicker::pick_entity) never hits.
/// Hosts that render entities pair it with their own hit testing.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCamera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Viewport size in pixels.
    pub viewport: (f32, f32),
}

impl FieldCamera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, viewport: (f32, f32)) -> Self {
        Self {
            eye,
            target,
            fov_y: 45_f32.to_radians(),
            znear: 0.1,
            zfar: 200.0,
            viewport,
        }
    }

    /// Broadcast-style view from behind the left touchline.
    pub fn sideline(viewport: (f32, f32)) -> Self {
        Self::new(Point3::new(0.0, 12.0, -18.0), Point3::origin(), viewport)
    }

    fn has_viewport(&self) -> bool {
        self.viewport.0 >= 1.0 && self.viewport.1 >= 1.0
    }

    fn view_projection(&self) -> Option<Matrix4<f32>> {
        if !self.has_viewport() || (self.eye - self.target).norm() <= f32::EPSILON {
            return None;
        }
        let view = Isometry3::look_at_rh(&self.eye, &self.target, &Vector3::y());
        let aspect = self.viewport.0 / self.viewport.1;
        let projection = Perspective3::new(aspect, self.fov_y, self.znear, self.zfar);
        Some(projection.as_matrix() * view.to_homogeneous())
    }

    /// Ray from the near plane through `screen`, as (origin, direction).
    pub fn ray(&self, screen: ScreenPoint) -> Option<(Point3<f32>, Vector3<f32>)> {
        let inverse = self.view_projection()?.try_inverse()?;
        let ndc_x = 2.0 * screen.x / self.viewport.0 - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport.1;

        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let direction = far - near;
        if direction.norm() <= f32::EPSILON {
            return None;
        }
        Some((near, direction.normalize()))
    }

    /// Project a world point back onto the viewport. `None` for points
    /// behind the camera.
    pub fn project(&self, point: WorldPoint) -> Option<ScreenPoint> {
        let view_projection = self.view_projection()?;
        let clip = view_projection * point.0.push(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(ScreenPoint::new(
            (ndc_x + 1.0) * 0.5 * self.viewport.0,
            (1.0 - ndc_y) * 0.5 * self.viewport.1,
        ))
    }
}

/// Intersect the camera ray through `screen` with the field plane.
///
/// `None` when the ray runs parallel to the field or the hit lies behind
/// the camera, i.e. the user clicked above the horizon.
pub fn pick_field_point(camera: &FieldCamera, screen: ScreenPoint) -> Option<WorldPoint> {
    let (origin, direction) = camera.ray(screen)?;
    if direction.y.abs() <= f32::EPSILON {
        return None;
    }
    let t = -origin.y / direction.y;
    if t <= 0.0 {
        return None;
    }
    Some(WorldPoint(origin.coords + direction * t))
}

impl FieldPicker for FieldCamera {
    fn pick_field(&self, screen: ScreenPoint) -> Option<WorldPoint> {
        pick_field_point(self, screen)
    }

    /// Field-only picker; see the type docs.
    fn pick_entity(&self, _screen: ScreenPoint) -> Option<SelectableEntity> {
        None
    }
}
