use std::time::Duration;

use id_arena::Id;

use crate::overlay::animation::AnimationSpec;
use crate::overlay::backend::AnimationHandle;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// An animation directive attached to an object, started at `started_at` on the scene clock.
#[derive(Debug, Clone)]
pub struct RunningAnimation {
    pub handle: AnimationHandle,
    pub spec: AnimationSpec,
    pub started_at: Duration,
}

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub animations: Vec<RunningAnimation>,
}

impl Object3D {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            ..Default::default()
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty()
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            visible: true,
            animations: Vec::new(),
        }
    }
}
