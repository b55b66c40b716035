use std::time::Duration;

pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);
pub const DISPLAY_TIME: Duration = Duration::from_millis(20000);
pub const BASE_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// Smaller values keep models larger on portrait screens.
pub const CORRECTION_STRENGTH: f32 = 0.15;

/// How far every model except the primary one is moved to the left.
pub const HORIZONTAL_SHIFT_AMOUNT: f32 = 0.65;

pub const PRIMARY_MODEL: &str = "fixed-demo2";

const DEFAULT_BINDINGS: [(&str, &str); 7] = [
    ("marker-demo2", "fixed-demo2"),
    ("marker-innovative", "fixed-innovative"),
    ("marker-innovative_2", "fixed-innovative_2"),
    ("marker-ai", "fixed-ai"),
    ("marker-co_creation", "fixed-co_creation"),
    ("marker-first", "fixed-first"),
    ("marker-second", "fixed-second"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBinding {
    pub marker: String,
    pub model: String,
}

impl MarkerBinding {
    pub fn new(marker: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub animation_duration: Duration,
    pub display_time: Duration,
    pub base_aspect_ratio: f32,
    pub correction_strength: f32,
    pub horizontal_shift_amount: f32,
    pub primary_model: String,
    pub bindings: Vec<MarkerBinding>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            animation_duration: ANIMATION_DURATION,
            display_time: DISPLAY_TIME,
            base_aspect_ratio: BASE_ASPECT_RATIO,
            correction_strength: CORRECTION_STRENGTH,
            horizontal_shift_amount: HORIZONTAL_SHIFT_AMOUNT,
            primary_model: PRIMARY_MODEL.to_string(),
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(marker, model)| MarkerBinding::new(*marker, *model))
                .collect(),
        }
    }
}
