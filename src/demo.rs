use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use crate::camera::Camera;
use crate::config::OverlayConfig;
use crate::overlay::{Overlay, OverlayEvent};
use crate::scene_graph::scene::Scene;

pub struct DemoState {
    pub camera: Camera,
    pub start_time: Instant,
    pub config: OverlayConfig,
    pub overlay: Overlay<Scene>,
}

impl DemoState {
    pub fn new(scene_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = OverlayConfig::default();

        let scene = match scene_path {
            Some(path) => load_gltf_scene(path)?,
            None => Scene::builtin_layout(&config),
        };

        let overlay = Overlay::new(&config, scene);
        log::info!(
            "Overlay ready with {} models, press 1-{} to simulate markers",
            overlay.registry().len(),
            config.bindings.len()
        );

        Ok(Self {
            camera: Camera::default(),
            start_time: Instant::now(),
            config,
            overlay,
        })
    }

    pub fn update(&mut self) {
        self.overlay.advance(self.start_time.elapsed());
    }

    pub fn dispatch(&mut self, event: OverlayEvent) {
        self.overlay.handle(event);
    }

    /// Marker raised by the n-th number key (zero based).
    pub fn marker_for_key(&self, index: usize) -> Option<&str> {
        self.config
            .bindings
            .get(index)
            .map(|binding| binding.marker.as_str())
    }
}

fn load_gltf_scene(path: &Path) -> anyhow::Result<Scene> {
    let gltf = gltf::Gltf::open(path)
        .with_context(|| format!("Failed to open scene {}", path.display()))?;
    let gltf_scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("No scenes in gltf")?;

    let mut scene = Scene::new();
    let count = scene.spawn_gltf_scene(&gltf_scene);
    log::info!("Loaded {count} objects from {}", path.display());

    Ok(scene)
}
