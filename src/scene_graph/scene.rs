use std::time::Duration;

use glam::Vec3;
use id_arena::Arena;

use crate::config::OverlayConfig;
use crate::overlay::animation::{AnimatedProperty, AnimationSpec};
use crate::overlay::backend::{AnimationHandle, RenderBackend};
use crate::scene_graph::object3d::{Object3D, ObjectId, RunningAnimation};
use crate::scene_graph::transform::Transform;

const BUILTIN_MODEL_SCALE: Vec3 = Vec3::splat(0.5);
const BUILTIN_MODEL_DEPTH: f32 = -3.0;

pub struct Scene {
    pub objects: Arena<Object3D>,
    clock: Duration,
    next_animation_id: u64,
    /// Animations requested on objects that don't exist, reported on the next tick.
    orphaned: Vec<AnimationHandle>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            clock: Duration::ZERO,
            next_animation_id: 0,
            orphaned: Vec::new(),
        }
    }

    /// One anchor and one model per binding. The primary model sits in the centre, the others
    /// are authored one shift to the right so the horizontal correction centres them.
    pub fn builtin_layout(config: &OverlayConfig) -> Self {
        let mut scene = Self::new();

        for binding in &config.bindings {
            scene.add_object(Object3D::new(&*binding.marker, Transform::default()));

            let x = if binding.model == config.primary_model {
                0.0
            } else {
                config.horizontal_shift_amount
            };
            scene.add_object(Object3D::new(
                &*binding.model,
                Transform::from_translation_scale(
                    Vec3::new(x, 0.0, BUILTIN_MODEL_DEPTH),
                    BUILTIN_MODEL_SCALE,
                ),
            ));
        }

        scene
    }

    /// Adds every named node of a glTF scene (children included) as a flat object.
    pub fn spawn_gltf_scene(&mut self, scene: &gltf::Scene) -> usize {
        let before = self.objects.len();

        for node in scene.nodes() {
            self.spawn_gltf_node(&node);
        }

        self.objects.len() - before
    }

    fn spawn_gltf_node(&mut self, node: &gltf::Node) {
        if let Some(name) = node.name() {
            let (translation, rotation, scale) = node.transform().decomposed();
            let transform = Transform::from_decomposed(translation, rotation, scale);
            self.add_object(Object3D::new(name, transform));
        } else {
            log::debug!("Skipping unnamed glTF node {}", node.index());
        }

        for child in node.children() {
            self.spawn_gltf_node(&child);
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    fn apply(object: &mut Object3D, property: AnimatedProperty, value: Vec3) {
        match property {
            AnimatedProperty::Scale => object.transform.set_scale(value),
            AnimatedProperty::Rotation => object.transform.set_rotation(value),
        }
    }
}

impl RenderBackend for Scene {
    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.get_object_by_name(name)
    }

    fn transform(&self, object: ObjectId) -> Option<Transform> {
        self.objects.get(object).map(|object| object.transform)
    }

    fn set_visible(&mut self, object: ObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(object) {
            object.visible = visible;
        }
    }

    fn set_position(&mut self, object: ObjectId, position: Vec3) {
        if let Some(object) = self.objects.get_mut(object) {
            object.transform.set_translation(position);
        }
    }

    fn set_scale(&mut self, object: ObjectId, scale: Vec3) {
        if let Some(object) = self.objects.get_mut(object) {
            object.transform.set_scale(scale);
        }
    }

    fn set_rotation(&mut self, object: ObjectId, rotation: Vec3) {
        if let Some(object) = self.objects.get_mut(object) {
            object.transform.set_rotation(rotation);
        }
    }

    fn animate(&mut self, object: ObjectId, spec: AnimationSpec) -> AnimationHandle {
        let handle = AnimationHandle(self.next_animation_id);
        self.next_animation_id += 1;

        match self.objects.get_mut(object) {
            Some(object) => {
                Self::apply(object, spec.property, spec.from);
                object.animations.push(RunningAnimation {
                    handle,
                    spec,
                    started_at: self.clock,
                });
            }
            None => self.orphaned.push(handle),
        }

        handle
    }

    fn clear_animations(&mut self, object: ObjectId) {
        if let Some(object) = self.objects.get_mut(object) {
            object.animations.clear();
        }
    }

    fn tick(&mut self, now: Duration) -> Vec<AnimationHandle> {
        self.clock = self.clock.max(now);
        let clock = self.clock;
        let mut finished = std::mem::take(&mut self.orphaned);

        for (_, object) in self.objects.iter_mut() {
            if !object.is_animating() {
                continue;
            }

            let mut animations = std::mem::take(&mut object.animations);
            for animation in &animations {
                let elapsed = clock.saturating_sub(animation.started_at);
                Self::apply(object, animation.spec.property, animation.spec.sample(elapsed));

                if animation.spec.is_finished(elapsed) {
                    finished.push(animation.handle);
                }
            }

            animations.retain(|animation| {
                !animation
                    .spec
                    .is_finished(clock.saturating_sub(animation.started_at))
            });
            object.animations = animations;
        }

        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::animation::Easing;

    fn spec(property: AnimatedProperty, to: Vec3) -> AnimationSpec {
        AnimationSpec {
            property,
            from: Vec3::ZERO,
            to,
            duration: Duration::from_millis(1000),
            easing: Easing::EaseInQuad,
        }
    }

    #[test]
    fn builtin_layout_has_anchor_and_model_per_binding() {
        let config = OverlayConfig::default();
        let scene = Scene::builtin_layout(&config);

        assert_eq!(scene.objects.len(), config.bindings.len() * 2);

        let primary = scene.get_object_by_name("fixed-demo2").unwrap();
        assert_eq!(
            scene.get_object(primary).unwrap().transform.translation().x,
            0.0
        );
        let other = scene.get_object_by_name("fixed-ai").unwrap();
        assert_eq!(
            scene.get_object(other).unwrap().transform.translation().x,
            0.65
        );
    }

    #[test]
    fn animate_applies_start_value_and_finishes_on_time() {
        let mut scene = Scene::new();
        let id = scene.add_object(Object3D::new("model", Transform::default()));
        scene.tick(Duration::from_millis(500));

        let handle = scene.animate(id, spec(AnimatedProperty::Scale, Vec3::ONE));
        assert_eq!(scene.get_object(id).unwrap().transform.scale(), Vec3::ZERO);

        assert!(scene.tick(Duration::from_millis(1000)).is_empty());
        let scale = scene.get_object(id).unwrap().transform.scale();
        assert!(scale.abs_diff_eq(Vec3::splat(0.25), 1e-6));

        assert_eq!(scene.tick(Duration::from_millis(1500)), vec![handle]);
        let object = scene.get_object(id).unwrap();
        assert_eq!(object.transform.scale(), Vec3::ONE);
        assert!(!object.is_animating());
        assert!(scene.tick(Duration::from_millis(3000)).is_empty());
    }

    #[test]
    fn cleared_animations_never_complete() {
        let mut scene = Scene::new();
        let id = scene.add_object(Object3D::new("model", Transform::default()));

        scene.animate(id, spec(AnimatedProperty::Rotation, Vec3::Y * 360.0));
        scene.clear_animations(id);

        assert!(scene.tick(Duration::from_millis(2000)).is_empty());
    }

    #[test]
    fn animating_a_missing_object_completes_on_next_tick() {
        let mut elsewhere = Scene::new();
        let foreign = elsewhere.add_object(Object3D::new("model", Transform::default()));
        let mut scene = Scene::new();

        let handle = scene.animate(foreign, spec(AnimatedProperty::Scale, Vec3::ONE));

        assert_eq!(scene.tick(Duration::ZERO), vec![handle]);
        assert!(scene.tick(Duration::from_millis(1)).is_empty());
    }
}
