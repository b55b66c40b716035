use std::time::Duration;

use crate::config::OverlayConfig;
use crate::overlay::animation::AnimationSequencer;
use crate::overlay::backend::{AnimationHandle, RenderBackend};
use crate::overlay::registry::{ModelId, ModelRegistry};
use crate::overlay::timer::{TimerHandle, TimerQueue};

/// Everything the controller touches while reacting to a single event.
pub struct ControllerContext<'a, B: RenderBackend> {
    pub registry: &'a ModelRegistry,
    pub backend: &'a mut B,
    pub timers: &'a mut TimerQueue,
    pub now: Duration,
}

/// The animation phase currently running, with the handle that ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Show {
        model: ModelId,
        handle: AnimationHandle,
    },
    Hide {
        model: ModelId,
        handle: AnimationHandle,
        then_show: Option<ModelId>,
    },
}

impl Sequence {
    fn handle(&self) -> AnimationHandle {
        match *self {
            Sequence::Show { handle, .. } | Sequence::Hide { handle, .. } => handle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Idle,
    Showing(ModelId),
    Active(ModelId),
    Hiding(ModelId),
}

/// Session state of the display controller.
///
/// `active_model` is set while a model is visible or growing in. `is_animating` brackets
/// exactly one show or hide phase. `pending_timer` only exists while a model is active and
/// nothing is animating.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub active_model: Option<ModelId>,
    pub is_animating: bool,
    pub pending_timer: Option<TimerHandle>,
    in_flight: Option<Sequence>,
    dismiss_button_visible: bool,
}

pub struct DisplayController {
    state: ControllerState,
    sequencer: AnimationSequencer,
    display_time: Duration,
}

impl DisplayController {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            state: ControllerState::default(),
            sequencer: AnimationSequencer::new(config.animation_duration),
            display_time: config.display_time,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn phase(&self) -> DisplayPhase {
        match (self.state.in_flight, self.state.active_model) {
            (Some(Sequence::Show { model, .. }), _) => DisplayPhase::Showing(model),
            (Some(Sequence::Hide { model, .. }), _) => DisplayPhase::Hiding(model),
            (None, Some(model)) => DisplayPhase::Active(model),
            (None, None) => DisplayPhase::Idle,
        }
    }

    pub fn dismiss_button_visible(&self) -> bool {
        self.state.dismiss_button_visible
    }

    pub fn on_marker_found<B: RenderBackend>(
        &mut self,
        model: ModelId,
        cx: &mut ControllerContext<B>,
    ) {
        if self.state.active_model == Some(model) || self.state.is_animating {
            log::debug!("Ignoring marker for {model:?} in phase {:?}", self.phase());
            return;
        }

        match self.state.active_model {
            Some(active) => self.begin_hide(active, Some(model), cx),
            None => self.begin_show(model, cx),
        }
    }

    pub fn on_hide_requested<B: RenderBackend>(&mut self, cx: &mut ControllerContext<B>) {
        match self.state.active_model {
            Some(active) if !self.state.is_animating => {
                log::info!("Dismissing {}", model_name(cx.registry, active));
                self.begin_hide(active, None, cx);
            }
            _ => log::debug!("Ignoring hide request in phase {:?}", self.phase()),
        }
    }

    pub fn on_timer_fired<B: RenderBackend>(
        &mut self,
        timer: TimerHandle,
        cx: &mut ControllerContext<B>,
    ) {
        if self.state.pending_timer != Some(timer) {
            log::trace!("Stale timer {timer:?}");
            return;
        }
        self.state.pending_timer = None;

        match self.state.active_model {
            Some(active) if !self.state.is_animating => {
                log::info!(
                    "Display time elapsed, hiding {}",
                    model_name(cx.registry, active)
                );
                self.begin_hide(active, None, cx);
            }
            _ => log::trace!("Timer fired in phase {:?}", self.phase()),
        }
    }

    pub fn on_animation_complete<B: RenderBackend>(
        &mut self,
        handle: AnimationHandle,
        cx: &mut ControllerContext<B>,
    ) {
        let Some(sequence) = self.state.in_flight else {
            log::trace!("Completion {handle:?} with no sequence running");
            return;
        };

        if sequence.handle() != handle {
            log::trace!("Completion {handle:?} does not end the running sequence");
            return;
        }

        self.state.in_flight = None;
        let registry = cx.registry;

        match sequence {
            Sequence::Show { model, .. } => {
                if let Some(entry) = registry.get(model) {
                    self.sequencer.finish_show(entry, cx.backend);
                }
                self.state.is_animating = false;
                self.set_dismiss_button(true);
                self.arm_timer(cx);
            }
            Sequence::Hide {
                model, then_show, ..
            } => {
                if let Some(entry) = registry.get(model) {
                    self.sequencer.finish_hide(entry, cx.backend);
                }
                self.finish_hide(model, then_show, cx);
            }
        }
    }

    fn begin_show<B: RenderBackend>(&mut self, model: ModelId, cx: &mut ControllerContext<B>) {
        let registry = cx.registry;
        let Some(entry) = registry.get(model) else {
            log::warn!("Cannot show unregistered model {model:?}");
            return;
        };

        self.state.is_animating = true;
        self.cancel_timer(cx);
        self.state.active_model = Some(model);

        log::info!("Showing {}", entry.name);
        let handle = self.sequencer.show(entry, cx.backend);
        self.state.in_flight = Some(Sequence::Show { model, handle });
    }

    fn begin_hide<B: RenderBackend>(
        &mut self,
        model: ModelId,
        then_show: Option<ModelId>,
        cx: &mut ControllerContext<B>,
    ) {
        self.state.is_animating = true;
        self.cancel_timer(cx);
        self.set_dismiss_button(false);

        let registry = cx.registry;
        let Some(entry) = registry.get(model) else {
            self.finish_hide(model, then_show, cx);
            return;
        };

        log::info!("Hiding {}", entry.name);
        let handle = self.sequencer.hide(entry, cx.backend);
        self.state.in_flight = Some(Sequence::Hide {
            model,
            handle,
            then_show,
        });
    }

    fn finish_hide<B: RenderBackend>(
        &mut self,
        model: ModelId,
        then_show: Option<ModelId>,
        cx: &mut ControllerContext<B>,
    ) {
        if self.state.active_model == Some(model) {
            self.state.active_model = None;
        }
        self.state.is_animating = false;

        if let Some(next) = then_show {
            self.begin_show(next, cx);
        }
    }

    fn arm_timer<B: RenderBackend>(&mut self, cx: &mut ControllerContext<B>) {
        self.cancel_timer(cx);
        self.state.pending_timer = Some(cx.timers.arm(cx.now, self.display_time));
    }

    fn cancel_timer<B: RenderBackend>(&mut self, cx: &mut ControllerContext<B>) {
        if let Some(timer) = self.state.pending_timer.take() {
            cx.timers.cancel(timer);
        }
    }

    fn set_dismiss_button(&mut self, visible: bool) {
        if self.state.dismiss_button_visible != visible {
            log::debug!("Dismiss button {}", if visible { "shown" } else { "hidden" });
            self.state.dismiss_button_visible = visible;
        }
    }
}

fn model_name(registry: &ModelRegistry, model: ModelId) -> &str {
    registry
        .get(model)
        .map(|entry| entry.name.as_str())
        .unwrap_or("<unregistered>")
}
