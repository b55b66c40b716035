use glam::{Vec2, Vec3};
use imgui::Condition;

use crate::{
    demo::DemoState,
    overlay::{controller::DisplayPhase, registry::ModelId, OverlayEvent},
    rendering::renderer::Renderer,
};

const GIZMO_FILL: [f32; 4] = [0.2, 0.7, 1.0, 0.35];
const GIZMO_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];

pub fn update(state: &mut DemoState, renderer: &Renderer, ui: &imgui::Ui) -> anyhow::Result<()> {
    state.update();

    let resolution = Vec2::new(renderer.size.width as f32, renderer.size.height as f32);
    draw_model_gizmos(state, resolution, ui);

    if draw_overlay_panel(state, ui) {
        state.dispatch(OverlayEvent::HideRequested);
    }

    Ok(())
}

/// Stand-in for the model meshes: a disc sized by the model's scale with a spoke that
/// follows its rotation.
fn draw_model_gizmos(state: &DemoState, resolution: Vec2, ui: &imgui::Ui) {
    let draw_list = ui.get_background_draw_list();
    let scene = state.overlay.backend();

    for (_, model) in state.overlay.registry().models() {
        let Some(object) = scene.get_object(model.object).filter(|object| object.visible) else {
            continue;
        };

        let transform = &object.transform;
        let centre_world = transform.translation();
        let Some(centre) = state.camera.project(centre_world, resolution) else {
            continue;
        };

        let rim_world = centre_world + Vec3::Y * transform.scale().y;
        let radius = state
            .camera
            .project(rim_world, resolution)
            .map(|rim| rim.distance(centre))
            .unwrap_or(0.0);

        draw_list
            .add_circle(centre.to_array(), radius.max(1.0), GIZMO_FILL)
            .filled(true)
            .build();

        let spoke_world = transform.local_matrix().transform_point3(Vec3::X);
        if let Some(spoke) = state.camera.project(spoke_world, resolution) {
            draw_list
                .add_line(centre.to_array(), spoke.to_array(), GIZMO_LINE)
                .thickness(2.0)
                .build();
        }

        draw_list.add_text(
            (centre + Vec2::new(radius + 4.0, -6.0)).to_array(),
            GIZMO_LINE,
            &model.name,
        );
    }
}

/// Returns true when the dismiss button was clicked this frame.
fn draw_overlay_panel(state: &DemoState, ui: &imgui::Ui) -> bool {
    let overlay = &state.overlay;
    let mut hide_clicked = false;

    ui.window("Overlay")
        .position([16.0, 16.0], Condition::FirstUseEver)
        .size([300.0, 240.0], Condition::FirstUseEver)
        .build(|| {
            ui.text(format!("Session {:.1}s", overlay.clock().as_secs_f32()));

            let name = |id: ModelId| {
                overlay
                    .registry()
                    .get(id)
                    .map(|model| model.name.as_str())
                    .unwrap_or("?")
            };
            let phase = match overlay.phase() {
                DisplayPhase::Idle => "idle".to_string(),
                DisplayPhase::Showing(id) => format!("showing {}", name(id)),
                DisplayPhase::Active(id) => format!("active {}", name(id)),
                DisplayPhase::Hiding(id) => format!("hiding {}", name(id)),
            };
            ui.text(format!("Phase: {phase}"));

            if overlay.controller().state().pending_timer.is_some() {
                ui.text("Auto-hide armed");
            }

            ui.separator();
            for (index, binding) in state.config.bindings.iter().enumerate() {
                ui.text(format!("[{}] {}", index + 1, binding.marker));
            }
            ui.separator();

            if overlay.dismiss_button_visible() && ui.button("Hide") {
                hide_clicked = true;
            }
        });

    hide_clicked
}
