use glam::Mat4;
use glow::HasContext;
use linescene_shared::{
    color::Color,
    config::SceneConfig,
    geometry::LineGroup,
    scene::{SceneBackend, SceneController},
};

use self::{background::GradientBackground, program::LinesProgram};

pub mod background;
pub mod gl_helper;
pub mod lines;
pub mod program;

/// GL objects that live as long as the scene.
pub struct GlResources {
    pub lines: LinesProgram,
    pub background: GradientBackground,
}

impl GlResources {
    pub unsafe fn new(gl: &glow::Context) -> anyhow::Result<Self> {
        Ok(Self {
            lines: LinesProgram::new(gl)?,
            background: GradientBackground::new(gl)?,
        })
    }

    pub unsafe fn destroy(self, gl: &glow::Context) {
        self.lines.destroy(gl);
        self.background.destroy(gl);
    }
}

/// [`SceneBackend`] over a borrowed GL context.
pub struct GlBackend<'a> {
    pub gl: &'a glow::Context,
    pub resources: &'a mut GlResources,
}

impl SceneBackend for GlBackend<'_> {
    fn set_projection(&mut self, projection: Mat4) {
        unsafe { self.resources.lines.set_projection(self.gl, projection) }
    }

    fn set_modelview(&mut self, modelview: Mat4) {
        unsafe { self.resources.lines.set_modelview(self.gl, modelview) }
    }

    fn add_line_group(&mut self, group: &LineGroup) -> anyhow::Result<()> {
        unsafe { self.resources.lines.add_buffer_group(self.gl, group) }
    }

    fn clear_line_groups(&mut self) {
        unsafe { self.resources.lines.clear_buffer_groups(self.gl) }
    }

    fn enable_depth_test(&mut self) {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LESS);
        }
    }

    fn clear(&mut self) {
        unsafe {
            self.gl.depth_mask(true);
            self.gl.clear_depth_f32(1.0);
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_background(&mut self, top: Color, bottom: Color) {
        unsafe { self.resources.background.draw(self.gl, top, bottom) }
    }

    fn draw_line_groups(&mut self) {
        unsafe { self.resources.lines.bind_all(self.gl) }
    }
}

/// The scene controller together with the GL objects it drives.
pub struct SceneView {
    pub controller: SceneController,
    resources: GlResources,
}

impl SceneView {
    pub fn new(
        gl: &glow::Context,
        config: SceneConfig,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let mut resources = unsafe { GlResources::new(gl)? };

        let mut backend = GlBackend {
            gl,
            resources: &mut resources,
        };
        let result = SceneController::init(&mut backend, config, width, height);

        let controller = match result {
            Ok(c) => c,
            Err(e) => {
                unsafe { resources.destroy(gl) };
                return Err(e.into());
            }
        };

        Ok(Self {
            controller,
            resources,
        })
    }

    /// Runs `f` against the controller with a backend bound to `gl`.
    pub fn with_backend<R>(
        &mut self,
        gl: &glow::Context,
        f: impl FnOnce(&mut SceneController, &mut GlBackend<'_>) -> R,
    ) -> R {
        let mut backend = GlBackend {
            gl,
            resources: &mut self.resources,
        };
        f(&mut self.controller, &mut backend)
    }

    /// Paints one frame, first rebuilding the projection if the viewport changed size.
    pub fn paint(&mut self, gl: &glow::Context, width: u32, height: u32) {
        self.with_backend(gl, |controller, backend| {
            // egui resets the GL state between paint callbacks
            backend.enable_depth_test();

            if controller.viewport() != (width, height) && width > 0 && height > 0 {
                if let Err(e) = controller.resized(backend, width, height) {
                    error!("Failed to resize scene to {width}x{height}: {e}");
                }
            }

            controller.draw(backend);
        });
    }

    pub fn group_count(&self) -> usize {
        self.resources.lines.group_count()
    }

    pub fn destroy(self, gl: &glow::Context) {
        info!("Releasing scene GL resources");
        unsafe { self.resources.destroy(gl) }
    }
}
