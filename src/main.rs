// main.rs — event loop: session button, pointer routing, per-frame update

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod camera;
mod config;
mod error;
mod experience;
mod i18n;
mod loader;
mod mesh;
mod positioner;
mod renderer;
mod scene;
mod session;

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use config::ViewerConfig;
use error::{Result, ViewerError};
use experience::Experience;
use positioner::{PointerEvent, Positioner};
use renderer::Renderer;
use session::{DesktopDevice, PresentationDevice, SessionManager, SessionState, SessionTransition};

type ImageResult = Result<image::RgbaImage>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ViewerConfig::load() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}; falling back to defaults");
            ViewerConfig::default()
        }
    };
    i18n::init(&config.lang);

    if let Err(e) = run(config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// UI state that lives for the whole process, outside any session.
struct Hud {
    fps: f32,
    frame_count: u32,
    last_fps_time: Instant,
    is_loading: bool,
    toggle_requested: bool,
    open_requested: bool,
}

impl Hud {
    fn new() -> Self {
        Self {
            fps: 0.0,
            frame_count: 0,
            last_fps_time: Instant::now(),
            is_loading: false,
            toggle_requested: false,
            open_requested: false,
        }
    }

    fn tick(&mut self) {
        self.frame_count += 1;
        let elapsed = self.last_fps_time.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.last_fps_time = Instant::now();
        }
    }
}

fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), config.vsync))?;
    let mut sessions = SessionManager::new(DesktopDevice::new(window.clone()));
    let mut experience: Option<Experience> = None;
    let mut hud = Hud::new();
    let mut cursor = PhysicalPosition::new(0.0, 0.0);

    let (tx, rx): (Sender<ImageResult>, Receiver<ImageResult>) = channel();
    hud.is_loading = true;
    loader::start_load_image(config.image.clone(), tx.clone());

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Ok(result) = rx.try_recv() {
            hud.is_loading = false;
            match result {
                Ok(rgba) => renderer.load_panorama(rgba),
                Err(e) => log::error!("{e}"),
            }
        }

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        sessions.end();
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        if let Some(exp) = experience.as_mut() {
                            exp.resize(new_size.width, new_size.height);
                        }
                    }

                    WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                        match input.virtual_keycode {
                            Some(VirtualKeyCode::O) => hud.open_requested = true,
                            Some(VirtualKeyCode::Escape) if sessions.is_active() => {
                                hud.toggle_requested = true;
                            }
                            _ => {}
                        }
                    }

                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        let pointer = match state {
                            ElementState::Pressed => PointerEvent::Down {
                                x: cursor.x,
                                y: cursor.y,
                            },
                            ElementState::Released => PointerEvent::Up,
                        };
                        if let Some(exp) = experience.as_mut() {
                            exp.handle_pointer(pointer);
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = position;
                        if let Some(exp) = experience.as_mut() {
                            exp.handle_pointer(PointerEvent::Move {
                                x: position.x,
                                y: position.y,
                            });
                        }
                    }

                    WindowEvent::Touch(touch) => {
                        let PhysicalPosition { x, y } = touch.location;
                        let pointer = match touch.phase {
                            TouchPhase::Started => PointerEvent::Down { x, y },
                            TouchPhase::Moved => PointerEvent::Move { x, y },
                            TouchPhase::Ended | TouchPhase::Cancelled => PointerEvent::Up,
                        };
                        if let Some(exp) = experience.as_mut() {
                            exp.handle_pointer(pointer);
                        }
                    }

                    WindowEvent::DroppedFile(path) => {
                        hud.is_loading = true;
                        loader::start_load_image(path, tx.clone());
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                hud.tick();

                if let Some(exp) = experience.as_mut() {
                    exp.frame();
                }

                let supports_immersive = sessions.device().supports_immersive();
                let state = sessions.state();
                let view = experience.as_ref().map(|e| (e.scene(), e.camera()));
                let render_result = renderer.render_with_ui(&window, view, |ctx| {
                    draw_ui(ctx, &mut hud, state, supports_immersive, experience.as_ref());
                });

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {e:?}"),
                }

                if std::mem::take(&mut hud.toggle_requested) {
                    toggle_session(&mut sessions, &mut experience, &mut renderer);
                }
                if std::mem::take(&mut hud.open_requested) {
                    if let Some(path) = pick_image() {
                        hud.is_loading = true;
                        loader::start_load_image(path, tx.clone());
                    }
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn toggle_session<D: PresentationDevice>(
    sessions: &mut SessionManager<D>,
    experience: &mut Option<Experience>,
    renderer: &mut Renderer,
) {
    match sessions.toggle() {
        Ok(SessionTransition::Started(_)) => {
            let positioner = Positioner::select(sessions.device().pose_source());
            let exp = Experience::new(renderer.size.width, renderer.size.height, positioner);
            renderer.upload_scene(exp.scene());
            *experience = Some(exp);
        }
        Ok(SessionTransition::Ended(session)) => {
            if let Some(exp) = experience.take() {
                log::info!(
                    "session {} rendered {} frames in {:.1}s",
                    session.id,
                    exp.frames(),
                    session.started_at.elapsed().as_secs_f32()
                );
            }
        }
        Err(e) => log::error!("{}", ViewerError::from(e)),
    }
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(
            &i18n::tr("file.filter.images"),
            &["jpg", "jpeg", "png", "bmp"],
        )
        .pick_file()
}

fn draw_ui(
    ctx: &egui::Context,
    hud: &mut Hud,
    state: SessionState,
    supports_immersive: bool,
    experience: Option<&Experience>,
) {
    egui::TopBottomPanel::top("session_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if supports_immersive {
                let label = match state {
                    SessionState::Idle => i18n::tr("session.enter"),
                    SessionState::Active(_) => i18n::tr("session.exit"),
                };
                if ui.button(label).clicked() {
                    hud.toggle_requested = true;
                }
            } else {
                ui.label(i18n::tr("session.unsupported"));
            }

            if ui.button(i18n::tr("menu.open_image")).clicked() {
                hud.open_requested = true;
            }
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if hud.is_loading {
                ui.label(
                    egui::RichText::new(i18n::tr("status.loading")).color(egui::Color32::YELLOW),
                );
                ui.label("|");
            }

            match state {
                SessionState::Idle => ui.label(i18n::tr("status.idle")),
                SessionState::Active(s) => {
                    ui.label(i18n::tr_with("status.active", &[("id", s.id.to_string())]))
                }
            };

            if let Some(exp) = experience {
                ui.label("|");
                match exp.positioner().orientation() {
                    Some((lat, lon)) => ui.label(i18n::tr_with(
                        "status.orientation",
                        &[("lat", format!("{lat:.1}")), ("lon", format!("{lon:.1}"))],
                    )),
                    None => ui.label(i18n::tr("status.device_pose")),
                };
            }

            ui.label("|");
            ui.label(egui::RichText::new(format!("FPS: {:.1}", hud.fps)).color(egui::Color32::GREEN));
        });
    });
}
