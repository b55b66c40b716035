use glam::Vec3;

use crate::config::OverlayConfig;
use crate::overlay::backend::RenderBackend;
use crate::overlay::registry::ModelRegistry;

/// Places models for the current viewport shape. Every result is derived from the
/// baseline position alone, so repeated calls never drift.
#[derive(Debug, Clone, Copy)]
pub struct AspectRatioAdjuster {
    base_aspect_ratio: f32,
    correction_strength: f32,
    horizontal_shift_amount: f32,
}

impl AspectRatioAdjuster {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            base_aspect_ratio: config.base_aspect_ratio,
            correction_strength: config.correction_strength,
            horizontal_shift_amount: config.horizontal_shift_amount,
        }
    }

    /// Depth multiplier for a viewport of the given aspect ratio. Viewports at least as wide
    /// as the base ratio are left alone; narrower ones push models back by a damped amount.
    pub fn depth_ratio(&self, aspect: f32) -> f32 {
        if aspect >= self.base_aspect_ratio {
            return 1.0;
        }

        let ideal_ratio = self.base_aspect_ratio / aspect;
        1.0 + (ideal_ratio - 1.0) * self.correction_strength
    }

    pub fn adjusted_position(&self, original: Vec3, is_primary: bool, aspect: f32) -> Vec3 {
        let x = if is_primary {
            original.x
        } else {
            original.x - self.horizontal_shift_amount
        };

        Vec3::new(x, original.y, original.z * self.depth_ratio(aspect))
    }

    pub fn recompute<B: RenderBackend>(
        &self,
        width: u32,
        height: u32,
        registry: &ModelRegistry,
        backend: &mut B,
    ) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring degenerate viewport {width}x{height}");
            return;
        }

        let aspect = width as f32 / height as f32;

        for (_, model) in registry.models() {
            let position = self.adjusted_position(model.original_position, model.is_primary, aspect);
            backend.set_position(model.object, position);
        }

        log::debug!(
            "Viewport {width}x{height} (aspect {aspect:.3}), depth ratio {:.3}",
            self.depth_ratio(aspect)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkerBinding;
    use crate::scene_graph::object3d::Object3D;
    use crate::scene_graph::scene::Scene;
    use crate::scene_graph::transform::Transform;

    fn adjuster() -> AspectRatioAdjuster {
        AspectRatioAdjuster::new(&OverlayConfig::default())
    }

    #[test]
    fn wide_viewports_keep_depth() {
        let adjuster = adjuster();

        assert_eq!(adjuster.depth_ratio(16.0 / 9.0), 1.0);
        assert_eq!(adjuster.depth_ratio(21.0 / 9.0), 1.0);
    }

    #[test]
    fn narrow_viewport_moderates_depth() {
        let adjuster = adjuster();
        let original = Vec3::new(0.0, 0.0, 10.0);

        // 64x90 is exactly 2.5 times narrower than 16:9.
        let position = adjuster.adjusted_position(original, true, 64.0 / 90.0);
        assert!((position.z - 12.25).abs() < 1e-4, "{position}");

        // Portrait 9:16: ideal ratio 256/81.
        let position = adjuster.adjusted_position(original, true, 9.0 / 16.0);
        let expected = 10.0 * (1.0 + (256.0 / 81.0 - 1.0) * 0.15);
        assert!((position.z - expected).abs() < 1e-4, "{position}");
        assert_eq!(position.y, original.y);
    }

    #[test]
    fn only_non_primary_models_shift_left() {
        let adjuster = adjuster();
        let original = Vec3::new(1.0, 0.5, -3.0);

        for aspect in [0.5, 1.0, 16.0 / 9.0, 3.0] {
            assert_eq!(adjuster.adjusted_position(original, true, aspect).x, 1.0);
            assert!((adjuster.adjusted_position(original, false, aspect).x - 0.35).abs() < 1e-6);
        }
    }

    #[test]
    fn recompute_is_stable_across_repeated_resizes() {
        let mut scene = Scene::new();
        scene.add_object(Object3D::new("marker-a", Transform::default()));
        scene.add_object(Object3D::new("marker-b", Transform::default()));
        scene.add_object(Object3D::new(
            "fixed-demo2",
            Transform::from_translation(Vec3::new(0.0, 0.0, -3.0)),
        ));
        scene.add_object(Object3D::new(
            "fixed-ai",
            Transform::from_translation(Vec3::new(0.65, 0.0, -3.0)),
        ));
        let bindings = [
            MarkerBinding::new("marker-a", "fixed-demo2"),
            MarkerBinding::new("marker-b", "fixed-ai"),
        ];
        let registry = ModelRegistry::from_bindings("fixed-demo2", &bindings, &mut scene);
        let adjuster = adjuster();

        adjuster.recompute(1080, 1920, &registry, &mut scene);
        let first: Vec<Vec3> = registry
            .models()
            .map(|(_, model)| scene.get_object(model.object).unwrap().transform.translation())
            .collect();

        adjuster.recompute(1920, 1080, &registry, &mut scene);
        adjuster.recompute(1080, 1920, &registry, &mut scene);
        adjuster.recompute(1080, 1920, &registry, &mut scene);
        let second: Vec<Vec3> = registry
            .models()
            .map(|(_, model)| scene.get_object(model.object).unwrap().transform.translation())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[0].x, 0.0);
        assert!(first[1].x.abs() < 1e-6);
        assert!(first[0].z < -3.0);
    }

    #[test]
    fn zero_height_viewport_is_ignored() {
        let mut scene = Scene::new();
        scene.add_object(Object3D::new("marker-a", Transform::default()));
        scene.add_object(Object3D::new(
            "fixed-ai",
            Transform::from_translation(Vec3::new(1.0, 0.0, -3.0)),
        ));
        let bindings = [MarkerBinding::new("marker-a", "fixed-ai")];
        let registry = ModelRegistry::from_bindings("fixed-demo2", &bindings, &mut scene);

        adjuster().recompute(800, 0, &registry, &mut scene);

        let object = scene.get_object_by_name("fixed-ai").unwrap();
        let translation = scene.get_object(object).unwrap().transform.translation();
        assert_eq!(translation, Vec3::new(1.0, 0.0, -3.0));
    }
}
