use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crossbeam::atomic::AtomicCell;
use eframe::CreationContext;
use egui::{Color32, NumExt};
use glam::Vec2;
use linescene_shared::{config::SceneConfig, scene::CameraState};

use crate::render::SceneView;

const CAMERA_STATE_KEY: &str = "camera_state";

/// Basic app tracking state
pub enum AppState {
    Ready,
    Error(anyhow::Error),
}

pub struct LinesceneApp {
    gl: Option<Arc<glow::Context>>,

    state: AppState,
    view: Option<Arc<Mutex<SceneView>>>,
    fov_degrees: f32,

    load_input: Arc<AtomicCell<Option<PathBuf>>>,
}

impl LinesceneApp {
    /// Called once before the first frame.
    pub fn new(cc: &CreationContext<'_>, config: SceneConfig) -> Self {
        let mut s = Self {
            gl: cc.gl.clone(),
            state: AppState::Ready,
            view: None,
            fov_degrees: config.camera.fov_radians.to_degrees(),
            load_input: Arc::new(AtomicCell::new(None)),
        };

        match s.create_view(config, cc.egui_ctx.pixels_per_point()) {
            Ok(view) => {
                s.view = Some(view);

                let saved = cc.storage.and_then(|storage| {
                    eframe::get_value::<CameraState>(storage, CAMERA_STATE_KEY)
                });
                if let Some(state) = saved {
                    debug!("Restoring camera state {state:?}");
                    s.with_view(|view, gl| {
                        view.with_backend(gl, |c, b| c.set_camera_state(b, state))
                    });
                }
            }
            Err(e) => {
                error!("Failed to set up scene: {e:?}");
                s.state = AppState::Error(e);
            }
        }

        s
    }

    /// Builds the scene for the configured window size.
    ///
    /// The real surface size is only known once the first frame is painted, where the
    /// projection gets rebuilt for it.
    fn create_view(
        &self,
        config: SceneConfig,
        pixels_per_point: f32,
    ) -> anyhow::Result<Arc<Mutex<SceneView>>> {
        let gl = self
            .gl
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No OpenGL context available"))?;

        let (width, height) = window_size_in_pixels(&config, pixels_per_point);
        Ok(Arc::new(Mutex::new(SceneView::new(gl, config, width, height)?)))
    }

    /// Runs `f` with the locked scene view and the GL context, if both are available
    fn with_view<R>(&self, f: impl FnOnce(&mut SceneView, &glow::Context) -> R) -> Option<R> {
        let (Some(view), Some(gl)) = (self.view.as_ref(), self.gl.as_ref()) else {
            return None;
        };

        match view.lock() {
            Ok(mut view) => Some(f(&mut *view, gl.as_ref())),
            Err(_) => {
                error!("Scene view lock is poisoned");
                None
            }
        }
    }

    pub fn load_config(&mut self, path: PathBuf, pixels_per_point: f32) {
        info!("Loading scene config {path:?}");
        let config = match SceneConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                self.state = AppState::Error(
                    anyhow::Error::new(e).context(format!("Couldn't load '{}'", path.display())),
                );
                return;
            }
        };

        let fov_degrees = config.camera.fov_radians.to_degrees();
        let result = if self.view.is_some() {
            self.with_view(|view, gl| {
                view.with_backend(gl, |c, b| c.reload(b, config))
                    .map_err(anyhow::Error::from)
            })
            .unwrap_or_else(|| Err(anyhow::anyhow!("Scene is unavailable")))
        } else {
            self.create_view(config, pixels_per_point).map(|view| {
                self.view = Some(view);
            })
        };

        match result {
            Ok(()) => {
                self.fov_degrees = fov_degrees;
                self.state = AppState::Ready;
            }
            Err(e) => {
                self.state = AppState::Error(
                    e.context(format!("Couldn't apply scene '{}'", path.display())),
                )
            }
        }
    }

    fn show_scene(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        let drag = response.drag_delta();
        let scroll = if response.hovered() {
            ui.input(|i| i.scroll_delta.y)
        } else {
            0.0
        };
        let reset = response.hovered() && ui.input(|i| i.key_pressed(egui::Key::R));

        if drag != egui::Vec2::ZERO || scroll != 0.0 || reset {
            self.with_view(|view, gl| {
                view.with_backend(gl, |c, b| {
                    if reset {
                        c.reset_camera(b);
                    }
                    if drag != egui::Vec2::ZERO {
                        c.orbit(b, Vec2::new(drag.x, drag.y));
                    }
                    if scroll != 0.0 {
                        c.zoom(b, scroll);
                    }
                })
            });
        }

        let Some(view) = self.view.clone() else {
            return;
        };

        let cb = egui_glow::CallbackFn::new(move |info, painter| {
            let viewport = info.viewport_in_pixels();
            let Ok(mut view) = view.lock() else {
                return;
            };

            view.paint(
                painter.gl(),
                viewport.width_px as u32,
                viewport.height_px as u32,
            );
        });

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(cb),
        };
        ui.painter().add(callback);
    }

    fn show_statusbar(&mut self, ui: &mut egui::Ui) {
        let status = self.with_view(|view, _| {
            let (width, height) = view.controller.viewport();
            let camera = view.controller.camera_state();
            (width, height, camera, view.group_count())
        });

        ui.horizontal(|ui| {
            if let Some((width, height, camera, groups)) = status {
                ui.strong("Viewport:");
                ui.label(format!("{width}x{height}"));
                ui.separator();
                ui.strong("Elevation:");
                ui.label(format!("{:.1}°", camera.turntable.elevation.to_degrees()));
                ui.strong("Azimuth:");
                ui.label(format!("{:.1}°", camera.turntable.azimuth.to_degrees()));
                ui.strong("Distance:");
                ui.label(format!("{:.2}", -camera.translation_z));
                ui.separator();
                ui.label(format!("{groups} line groups"));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(format!("linescene {} ({})", env!("GIT_HASH"), env!("BUILD_DATE")))
                    .on_hover_text(env!("RUSTC_VERSION"));
            });
        });
    }

    fn show_error(ctx: &egui::Context, state: &mut AppState) {
        let AppState::Error(e) = state else {
            return;
        };

        let screen_rect = ctx.screen_rect();
        let max_height = 320.0.at_most(screen_rect.height());
        let mut open = true;
        egui::Window::new("Error")
            .pivot(egui::Align2::CENTER_TOP)
            .fixed_pos(screen_rect.center() - 0.5 * max_height * egui::Vec2::Y)
            .resizable(false)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.colored_label(Color32::from_rgb(250, 40, 40), format!("{e:#}"));

                if !e.backtrace().to_string().starts_with("disabled backtrace") {
                    ui.add_space(4.);
                    ui.collapsing("Backtrace", |ui| {
                        egui::ScrollArea::vertical()
                            .show(ui, |ui| ui.label(e.backtrace().to_string()));
                    });
                }
            });

        if !open {
            *state = AppState::Ready;
        }
    }
}

/// Configured window size in physical pixels, never empty
fn window_size_in_pixels(config: &SceneConfig, pixels_per_point: f32) -> (u32, u32) {
    let to_pixels = |points: f32| ((points * pixels_per_point) as u32).max(1);
    (to_pixels(config.window.width), to_pixels(config.window.height))
}

impl eframe::App for LinesceneApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(camera) = self.with_view(|view, _| view.controller.camera_state()) {
            eframe::set_value(storage, CAMERA_STATE_KEY, &camera);
        }
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        let (Some(view), Some(gl)) = (self.view.take(), gl) else {
            return;
        };

        match Arc::try_unwrap(view).map(Mutex::into_inner) {
            Ok(Ok(view)) => view.destroy(gl),
            _ => warn!("Scene is still in use at exit, leaving its resources to the context"),
        }
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if let Some(load_path) = self.load_input.take() {
            self.load_config(load_path, ctx.pixels_per_point());
        }

        let load_clone = self.load_input.clone();
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open scene…").clicked() {
                        std::thread::spawn(move || {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Scene config", &["yaml", "yml"])
                                .pick_file()
                            {
                                load_clone.store(Some(path));
                            }
                        });

                        ui.close_menu()
                    }

                    if ui.button("Quit").clicked() {
                        frame.close();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Reset camera").clicked() {
                        self.with_view(|view, gl| {
                            view.with_backend(gl, |c, b| c.reset_camera(b))
                        });
                        ui.close_menu()
                    }

                    let fov = ui.add(
                        egui::Slider::new(&mut self.fov_degrees, 10.0..=170.0)
                            .text("Field of view")
                            .suffix("°"),
                    );
                    if fov.changed() {
                        let fov_radians = self.fov_degrees.to_radians();
                        if let Some(Err(e)) = self.with_view(|view, gl| {
                            view.with_backend(gl, |c, b| c.set_fov(b, fov_radians))
                        }) {
                            warn!("Rejected field of view {}°: {e}", self.fov_degrees);
                        }
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.show_statusbar(ui));

        Self::show_error(ctx, &mut self.state);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if self.view.is_none() {
                    ui.centered_and_justified(|ui| ui.heading("No scene loaded"));
                    return;
                }

                self.show_scene(ui);
            });

        // The scene only changes on input, but the file dialog thread can't wake us up
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_size_scales_with_pixels_per_point() {
        let config = SceneConfig::default();
        assert_eq!(window_size_in_pixels(&config, 1.0), (1024, 768));
        assert_eq!(window_size_in_pixels(&config, 1.5), (1536, 1152));

        let mut config = SceneConfig::default();
        config.window.width = 0.0;
        assert_eq!(window_size_in_pixels(&config, 2.0), (1, 1536));
    }
}
