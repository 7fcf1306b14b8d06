// ── Points and frames ──
//
// The renderer and the match server disagree on which axis points up.
// Wrapping each frame in its own newtype keeps a renderer position from
// ever reaching the wire untransformed.

use nalgebra::Vector3;

/// Ball velocity in the server frame, metres per second.
pub type Velocity = Vector3<f32>;

/// Position in the renderer's world frame: Y up, the field lies on `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint(pub Vector3<f32>);

impl WorldPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vector3::new(x, y, z))
    }
}

/// Position in the match server's frame: Z up, the field lies on `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerPoint(pub Vector3<f32>);

impl ServerPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.0.x, self.0.y, self.0.z]
    }
}

/// Position inside the viewport, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
