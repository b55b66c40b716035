use std::collections::HashMap;

use crate::overlay::registry::{ModelId, ModelRegistry};

/// Maps tracker "marker found" signals to the model each marker summons.
/// It does not debounce; the controller decides what a trigger means.
pub struct MarkerEventRouter {
    routes: HashMap<String, ModelId>,
}

impl MarkerEventRouter {
    pub fn new(registry: &ModelRegistry) -> Self {
        let routes = registry
            .markers()
            .iter()
            .map(|marker| (marker.name.clone(), marker.model))
            .collect();

        Self { routes }
    }

    pub fn route(&self, marker: &str) -> Option<ModelId> {
        let model = self.routes.get(marker).copied();

        if model.is_none() {
            log::debug!("No model bound to marker {marker}");
        }

        model
    }
}
