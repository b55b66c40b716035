use std::time::Duration;

use glam::Vec3;

use crate::overlay::backend::{AnimationHandle, RenderBackend};
use crate::overlay::registry::Model;

const FULL_TURN: Vec3 = Vec3::new(0.0, 360.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    /// Overshoots past the target before settling on it.
    EaseOutBack,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedProperty {
    Scale,
    Rotation,
}

/// "Animate `property` from `from` to `to` over `duration` with `easing`."
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub property: AnimatedProperty,
    pub from: Vec3,
    pub to: Vec3,
    pub duration: Duration,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }

        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    pub fn sample(&self, elapsed: Duration) -> Vec3 {
        if self.is_finished(elapsed) {
            return self.to;
        }

        let t = self.easing.apply(self.progress(elapsed));
        self.from + (self.to - self.from) * t
    }
}

/// Issues the paired scale + rotation directives that bring a model in or out of view.
///
/// Only the scale animation gates completion; the rotation is a visual flourish whose
/// handle is never waited on.
#[derive(Debug, Clone, Copy)]
pub struct AnimationSequencer {
    duration: Duration,
}

impl AnimationSequencer {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Starts the show sequence and returns the handle whose completion ends it.
    pub fn show<B: RenderBackend>(&self, model: &Model, backend: &mut B) -> AnimationHandle {
        model.reset_appearance(backend);
        backend.set_visible(model.object, true);

        let scale = backend.animate(
            model.object,
            AnimationSpec {
                property: AnimatedProperty::Scale,
                from: Vec3::ZERO,
                to: model.original_scale,
                duration: self.duration,
                easing: Easing::EaseOutBack,
            },
        );
        backend.animate(
            model.object,
            AnimationSpec {
                property: AnimatedProperty::Rotation,
                from: Vec3::ZERO,
                to: FULL_TURN,
                duration: self.duration,
                easing: Easing::EaseOutQuad,
            },
        );

        scale
    }

    pub fn finish_show<B: RenderBackend>(&self, model: &Model, backend: &mut B) {
        backend.clear_animations(model.object);
        backend.set_rotation(model.object, Vec3::ZERO);
        backend.set_scale(model.object, model.original_scale);
    }

    /// Starts the hide sequence and returns the handle whose completion ends it.
    pub fn hide<B: RenderBackend>(&self, model: &Model, backend: &mut B) -> AnimationHandle {
        backend.clear_animations(model.object);

        let scale = backend.animate(
            model.object,
            AnimationSpec {
                property: AnimatedProperty::Scale,
                from: model.original_scale,
                to: Vec3::ZERO,
                duration: self.duration,
                easing: Easing::EaseInQuad,
            },
        );
        backend.animate(
            model.object,
            AnimationSpec {
                property: AnimatedProperty::Rotation,
                from: Vec3::ZERO,
                to: -FULL_TURN,
                duration: self.duration,
                easing: Easing::EaseInOutQuad,
            },
        );

        scale
    }

    pub fn finish_hide<B: RenderBackend>(&self, model: &Model, backend: &mut B) {
        model.reset_appearance(backend);
    }
}
