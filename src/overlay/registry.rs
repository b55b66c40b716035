use glam::Vec3;
use id_arena::{Arena, Id};
use itertools::Itertools;

use crate::config::MarkerBinding;
use crate::overlay::backend::RenderBackend;
use crate::scene_graph::object3d::ObjectId;

pub type ModelId = Id<Model>;

/// A model that can be summoned by a marker, with the baseline transform captured at startup.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub object: ObjectId,
    pub original_scale: Vec3,
    pub original_position: Vec3,
    /// The primary model is exempt from the horizontal shift.
    pub is_primary: bool,
}

impl Model {
    /// Puts the model back into its hidden baseline: invisible, zero scale and rotation,
    /// no animation directives. Calling it again changes nothing.
    pub fn reset_appearance<B: RenderBackend>(&self, backend: &mut B) {
        backend.set_visible(self.object, false);
        backend.set_scale(self.object, Vec3::ZERO);
        backend.set_rotation(self.object, Vec3::ZERO);
        backend.clear_animations(self.object);
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub name: String,
    pub model: ModelId,
}

pub struct ModelRegistry {
    models: Arena<Model>,
    markers: Vec<Marker>,
    primary_model: String,
}

impl ModelRegistry {
    pub fn new(primary_model: impl Into<String>) -> Self {
        Self {
            models: Arena::new(),
            markers: Vec::new(),
            primary_model: primary_model.into(),
        }
    }

    /// Registers every binding that resolves; unresolvable ones are skipped.
    pub fn from_bindings<B: RenderBackend>(
        primary_model: impl Into<String>,
        bindings: &[MarkerBinding],
        backend: &mut B,
    ) -> Self {
        let mut registry = Self::new(primary_model);

        for binding in bindings {
            registry.register(binding, backend);
        }

        log::info!(
            "Registered {} of {} marker bindings: {}",
            registry.markers.len(),
            bindings.len(),
            registry.markers.iter().map(|marker| &marker.name).join(", ")
        );

        registry
    }

    /// Records the model's baseline scale and position and hides it.
    ///
    /// Returns `None` without registering anything when either the marker or the model
    /// cannot be found in the scene.
    pub fn register<B: RenderBackend>(
        &mut self,
        binding: &MarkerBinding,
        backend: &mut B,
    ) -> Option<ModelId> {
        let marker_object = backend.find_object(&binding.marker);
        let model_object = backend.find_object(&binding.model);

        let (Some(_), Some(object)) = (marker_object, model_object) else {
            log::warn!(
                "Skipping binding {} -> {}: {} not found in scene",
                binding.marker,
                binding.model,
                if marker_object.is_none() {
                    "marker"
                } else {
                    "model"
                }
            );
            return None;
        };

        if self.marker(&binding.marker).is_some() {
            log::warn!("Marker {} is bound more than once, keeping the first binding", binding.marker);
            return None;
        }

        // A model shared by two markers keeps the baseline captured the first time; it has
        // already been reset to zero scale since then.
        let model_id = match self.models.iter().find(|(_, model)| model.object == object) {
            Some((id, _)) => id,
            None => {
                let transform = backend.transform(object)?;
                let model = Model {
                    name: binding.model.clone(),
                    object,
                    original_scale: transform.scale(),
                    original_position: transform.translation(),
                    is_primary: binding.model == self.primary_model,
                };

                model.reset_appearance(backend);
                self.models.alloc(model)
            }
        };

        self.markers.push(Marker {
            name: binding.marker.clone(),
            model: model_id,
        });

        Some(model_id)
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.models.iter()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.name == name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::object3d::Object3D;
    use crate::scene_graph::scene::Scene;
    use crate::scene_graph::transform::Transform;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(Object3D::new("marker-a", Transform::default()));
        scene.add_object(Object3D::new("marker-b", Transform::default()));
        scene.add_object(Object3D::new(
            "model-a",
            Transform::from_translation_scale(Vec3::new(0.65, -0.2, -3.0), Vec3::splat(0.4)),
        ));
        scene
    }

    #[test]
    fn register_captures_baseline_and_hides_model() {
        let mut scene = scene();
        let mut registry = ModelRegistry::new("model-a");

        let id = registry
            .register(&MarkerBinding::new("marker-a", "model-a"), &mut scene)
            .unwrap();

        let model = registry.get(id).unwrap();
        assert_eq!(model.original_scale, Vec3::splat(0.4));
        assert_eq!(model.original_position, Vec3::new(0.65, -0.2, -3.0));
        assert!(model.is_primary);

        let object = scene.get_object(model.object).unwrap();
        assert!(!object.visible);
        assert_eq!(object.transform.scale(), Vec3::ZERO);
        assert_eq!(registry.marker("marker-a").map(|m| m.model), Some(id));
    }

    #[test]
    fn missing_marker_or_model_is_skipped() {
        let mut scene = scene();
        let bindings = [
            MarkerBinding::new("marker-missing", "model-a"),
            MarkerBinding::new("marker-b", "model-missing"),
            MarkerBinding::new("marker-a", "model-a"),
        ];

        let registry = ModelRegistry::from_bindings("model-a", &bindings, &mut scene);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.markers().len(), 1);
        assert_eq!(registry.markers()[0].name, "marker-a");
        assert!(registry.marker("marker-missing").is_none());
        assert!(registry.marker("marker-b").is_none());
    }

    #[test]
    fn shared_model_keeps_first_baseline() {
        let mut scene = scene();
        let mut registry = ModelRegistry::new("other");

        let first = registry.register(&MarkerBinding::new("marker-a", "model-a"), &mut scene);
        let second = registry.register(&MarkerBinding::new("marker-b", "model-a"), &mut scene);

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        let model = registry.get(first.unwrap()).unwrap();
        assert_eq!(model.original_scale, Vec3::splat(0.4));
        assert!(!model.is_primary);
    }

    #[test]
    fn reset_appearance_is_idempotent() {
        let mut scene = scene();
        let mut registry = ModelRegistry::new("model-a");
        let id = registry
            .register(&MarkerBinding::new("marker-a", "model-a"), &mut scene)
            .unwrap();
        let model = registry.get(id).unwrap();

        scene.set_visible(model.object, true);
        scene.set_scale(model.object, Vec3::ONE);
        scene.set_rotation(model.object, Vec3::new(0.0, 120.0, 0.0));

        model.reset_appearance(&mut scene);
        let once = scene.get_object(model.object).unwrap().transform;
        model.reset_appearance(&mut scene);
        let object = scene.get_object(model.object).unwrap();

        assert_eq!(object.transform, once);
        assert!(!object.visible);
        assert_eq!(object.transform.scale(), Vec3::ZERO);
        assert_eq!(object.transform.rotation(), Vec3::ZERO);
        assert!(!object.is_animating());
    }
}
