//! Marker-driven model display: at most one model on screen, show/hide sequences that never
//! overlap, auto-dismissal after a dwell time, and viewport-dependent placement.

pub mod animation;
pub mod aspect;
pub mod backend;
pub mod controller;
pub mod registry;
pub mod router;
pub mod timer;

use std::time::Duration;

use crate::config::OverlayConfig;
use crate::overlay::aspect::AspectRatioAdjuster;
use crate::overlay::backend::{AnimationHandle, RenderBackend};
use crate::overlay::controller::{ControllerContext, DisplayController, DisplayPhase};
use crate::overlay::registry::ModelRegistry;
use crate::overlay::router::MarkerEventRouter;
use crate::overlay::timer::{TimerHandle, TimerQueue};

/// The inbound signals the overlay reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    MarkerFound(String),
    ViewportResized { width: u32, height: u32 },
    HideRequested,
    AnimationComplete(AnimationHandle),
    TimerFired(TimerHandle),
}

/// One overlay session. All events are handled to completion on the caller's thread, one at
/// a time.
pub struct Overlay<B: RenderBackend> {
    backend: B,
    registry: ModelRegistry,
    router: MarkerEventRouter,
    adjuster: AspectRatioAdjuster,
    controller: DisplayController,
    timers: TimerQueue,
    clock: Duration,
}

impl<B: RenderBackend> Overlay<B> {
    pub fn new(config: &OverlayConfig, mut backend: B) -> Self {
        let registry =
            ModelRegistry::from_bindings(&*config.primary_model, &config.bindings, &mut backend);
        let router = MarkerEventRouter::new(&registry);

        Self {
            backend,
            registry,
            router,
            adjuster: AspectRatioAdjuster::new(config),
            controller: DisplayController::new(config),
            timers: TimerQueue::new(),
            clock: Duration::ZERO,
        }
    }

    pub fn handle(&mut self, event: OverlayEvent) {
        match event {
            OverlayEvent::MarkerFound(marker) => {
                if let Some(model) = self.router.route(&marker) {
                    self.with_controller(|controller, cx| controller.on_marker_found(model, cx));
                }
            }
            OverlayEvent::ViewportResized { width, height } => {
                self.adjuster
                    .recompute(width, height, &self.registry, &mut self.backend);
            }
            OverlayEvent::HideRequested => {
                self.with_controller(|controller, cx| controller.on_hide_requested(cx));
            }
            OverlayEvent::AnimationComplete(handle) => {
                self.with_controller(|controller, cx| controller.on_animation_complete(handle, cx));
            }
            OverlayEvent::TimerFired(timer) => {
                self.with_controller(|controller, cx| controller.on_timer_fired(timer, cx));
            }
        }
    }

    fn with_controller<F>(&mut self, f: F)
    where
        F: FnOnce(&mut DisplayController, &mut ControllerContext<B>),
    {
        let mut cx = ControllerContext {
            registry: &self.registry,
            backend: &mut self.backend,
            timers: &mut self.timers,
            now: self.clock,
        };

        f(&mut self.controller, &mut cx);
    }

    /// Moves the session clock forward, then delivers finished animations followed by
    /// expired timers.
    pub fn advance(&mut self, now: Duration) {
        self.clock = self.clock.max(now);

        for handle in self.backend.tick(self.clock) {
            self.handle(OverlayEvent::AnimationComplete(handle));
        }

        for timer in self.timers.poll(self.clock) {
            self.handle(OverlayEvent::TimerFired(timer));
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &DisplayController {
        &self.controller
    }

    pub fn phase(&self) -> DisplayPhase {
        self.controller.phase()
    }

    pub fn dismiss_button_visible(&self) -> bool {
        self.controller.dismiss_button_visible()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }
}
