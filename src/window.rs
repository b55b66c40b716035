use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::Context;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::Window,
};

use crate::{demo::DemoState, engine, overlay::OverlayEvent, rendering::renderer::Renderer};

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    renderer: Option<Renderer>,
    demo_state: DemoState,
    imgui: Option<ImguiState>,
    last_frame: Instant,
}

impl App {
    fn from_demo_state(demo_state: DemoState) -> Self {
        Self {
            renderer: None,
            demo_state,
            imgui: None,
            last_frame: Instant::now(),
        }
    }

    fn create_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes().with_title("markerview");
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let mut imgui = Self::create_imgui(&window);
        let renderer = pollster::block_on(Renderer::new(window, &mut imgui.context))?;

        // Models are placed for the initial viewport before any marker can show them.
        let size = renderer.size;
        self.demo_state.dispatch(OverlayEvent::ViewportResized {
            width: size.width,
            height: size.height,
        });

        self.imgui = Some(imgui);
        self.renderer = Some(renderer);

        Ok(())
    }

    /// Number keys stand in for the tracker's "marker found" signal; H and Escape press the
    /// dismiss button.
    fn event_for_key(&self, key_event: &KeyEvent) -> Option<OverlayEvent> {
        if key_event.state != ElementState::Pressed || key_event.repeat {
            return None;
        }

        match key_event.logical_key.as_ref() {
            Key::Named(NamedKey::Escape) | Key::Character("h" | "H") => {
                Some(OverlayEvent::HideRequested)
            }
            Key::Character(digit) => {
                let index = digit.parse::<usize>().ok()?.checked_sub(1)?;
                let marker = self.demo_state.marker_for_key(index)?;
                Some(OverlayEvent::MarkerFound(marker.to_string()))
            }
            _ => None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(err) = self.create_renderer(event_loop) {
            log::error!("Failed to initialise renderer: {err:?}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::KeyboardInput {
            event: key_event, ..
        } = &event
        {
            if let Some(overlay_event) = self.event_for_key(key_event) {
                self.demo_state.dispatch(overlay_event);
            }
        }

        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(*new_size);
                self.demo_state.dispatch(OverlayEvent::ViewportResized {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                imgui
                    .context
                    .io_mut()
                    .update_delta_time(now - self.last_frame);
                self.last_frame = now;

                renderer.window.request_redraw();

                if let Err(err) = imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                {
                    log::error!("Failed to prepare imgui frame: {err:?}");
                    return;
                }

                let ui = imgui.context.new_frame();

                if let Err(err) = engine::update(&mut self.demo_state, renderer, ui) {
                    log::error!("Error during engine::update: {err:?}");
                }

                imgui.platform.prepare_render(ui, &renderer.window);

                match renderer.render(&mut imgui.context) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            _ => (),
        }

        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            &renderer.window,
            &Event::WindowEvent { window_id, event },
        );
    }
}

pub async fn run(scene_path: Option<PathBuf>) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let demo_state =
        DemoState::new(scene_path.as_deref()).context("Failed to create overlay state")?;
    let mut app = App::from_demo_state(demo_state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
