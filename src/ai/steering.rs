//! Agent orientation and movement
//!
//! Agents face their next checkpoint by yawing about +Y, then walk forward a
//! fixed step per tick. Forward is -Z in the agent's local space.

use glam::{Quat, Vec3};

/// Nudge applied to a target direction that is collinear with forward
const COLLINEAR_NUDGE: f32 = 0.05;

/// Pose accessors and movement commands the controller needs from an agent
pub trait Agent {
    /// Current world position
    fn position(&self) -> Vec3;

    /// Current facing direction
    fn forward(&self) -> Vec3;

    /// Rotate about +Y by `yaw` radians (counter-clockwise seen from above)
    fn turn(&mut self, yaw: f32);

    /// Move one step along the facing direction
    fn advance(&mut self);
}

/// Signed yaw that turns `forward` toward `target`, on the X-Z plane.
///
/// Returns `None` when the angle is not a number, which happens when the
/// agent stands on the target or has no horizontal forward component. A
/// target straight ahead or behind is nudged off-axis first, so the
/// rotation axis is always defined.
#[must_use]
pub fn turn_to_face(position: Vec3, forward: Vec3, target: Vec3) -> Option<f32> {
    let forward = Vec3::new(forward.x, 0.0, forward.z).normalize();
    let mut to_target = Vec3::new(target.x - position.x, 0.0, target.z - position.z).normalize();

    if to_target == forward || to_target == -forward {
        to_target.x += COLLINEAR_NUDGE;
        to_target.z += COLLINEAR_NUDGE;
        to_target = to_target.normalize();
    }

    let axis = forward.cross(to_target);
    let angle = forward.dot(to_target).clamp(-1.0, 1.0).acos();
    let yaw = if axis.y >= 0.0 { angle } else { -angle };

    if yaw.is_nan() { None } else { Some(yaw) }
}

/// A simple walking agent
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    /// World position
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Distance covered per step
    pub step_size: f32,
    /// Steps taken so far
    steps: u64,
}

impl Walker {
    /// Create a walker facing -Z
    #[must_use]
    pub fn new(position: Vec3, step_size: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            step_size,
            steps: 0,
        }
    }

    /// Steps taken so far
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Agent for Walker {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    fn turn(&mut self, yaw: f32) {
        self.rotation = (Quat::from_rotation_y(yaw) * self.rotation).normalize();
    }

    fn advance(&mut self) {
        let heading = Vec3::new(self.forward().x, 0.0, self.forward().z).normalize_or_zero();
        self.position += heading * self.step_size;
        self.steps += 1;
    }
}
