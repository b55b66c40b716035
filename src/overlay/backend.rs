use std::time::Duration;

use glam::Vec3;

use crate::overlay::animation::AnimationSpec;
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::transform::Transform;

/// Identifies one animation instance. The backend reports it back from [`RenderBackend::tick`]
/// once the animation has run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(pub(crate) u64);

/// The minimal set of commands the display controller issues to whatever draws the models.
pub trait RenderBackend {
    fn find_object(&self, name: &str) -> Option<ObjectId>;

    fn transform(&self, object: ObjectId) -> Option<Transform>;

    fn set_visible(&mut self, object: ObjectId, visible: bool);

    fn set_position(&mut self, object: ObjectId, position: Vec3);

    fn set_scale(&mut self, object: ObjectId, scale: Vec3);

    fn set_rotation(&mut self, object: ObjectId, rotation: Vec3);

    /// Starts animating a property. The returned handle is reported by `tick` exactly once.
    fn animate(&mut self, object: ObjectId, spec: AnimationSpec) -> AnimationHandle;

    /// Drops every animation directive on the object without reporting completion.
    fn clear_animations(&mut self, object: ObjectId);

    /// Advances running animations to `now` and returns the handles that finished.
    fn tick(&mut self, now: Duration) -> Vec<AnimationHandle>;
}
