use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

use crate::{
    camera::{MvpBuilder, Turntable},
    color::Color,
    config::SceneConfig,
    error::{GeometryError, Result},
    geometry::{Axis, LineGroup, SquareGrid},
};

/// Graphics side of the scene: a shader program holding the matrix uniforms and
/// the line groups, plus the framebuffer it draws into.
pub trait SceneBackend {
    /// Uploads the projection uniform
    fn set_projection(&mut self, projection: Mat4);

    /// Uploads the modelview uniform
    fn set_modelview(&mut self, modelview: Mat4);

    /// Uploads a line group and appends it to the draw list.
    fn add_line_group(&mut self, group: &LineGroup) -> anyhow::Result<()>;

    /// Releases every line group
    fn clear_line_groups(&mut self);

    fn enable_depth_test(&mut self);

    /// Clears the color and depth buffers
    fn clear(&mut self);

    /// Fills the viewport with a vertical gradient, ignoring depth.
    fn draw_background(&mut self, top: Color, bottom: Color);

    /// Draws every line group in insertion order
    fn draw_line_groups(&mut self);
}

/// Example geometry: the X, Y and Z axes followed by the grid.
pub fn build_line_groups(
    config: &SceneConfig,
) -> std::result::Result<Vec<LineGroup>, GeometryError> {
    let axis = Axis::new(config.axes.length);
    let width = config.axes.line_width;
    let grid = SquareGrid::new(config.grid.size, config.grid.spacing)?;

    Ok(vec![
        LineGroup::from_lines("axis_x", &[axis.line_x()], config.axes.x, width)?,
        LineGroup::from_lines("axis_y", &[axis.line_y()], config.axes.y, width)?,
        LineGroup::from_lines("axis_z", &[axis.line_z()], config.axes.z, width)?,
        LineGroup::from_lines(
            "grid",
            &grid.lines(),
            config.grid.color,
            config.grid.line_width,
        )?,
    ])
}

/// Drives a [`SceneBackend`] from window lifecycle events.
///
/// The controller owns the camera parameters and the current matrices. Every
/// matrix change goes through `update_*_and_sync`, so the backend uniforms always
/// match what the controller holds.
pub struct SceneController {
    config: SceneConfig,
    mvp: MvpBuilder,
    projection: Mat4,
    modelview: Mat4,
    line_groups: Vec<LineGroup>,
}

impl SceneController {
    /// Sets up the camera and the example geometry for a surface of `width`x`height` pixels.
    pub fn init<B: SceneBackend + ?Sized>(
        backend: &mut B,
        config: SceneConfig,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        config.validate()?;
        let mvp = config.mvp_builder(width, height);
        let projection = mvp.build_perspective_projection()?;
        let modelview = mvp.build_turntable_modelview();
        let line_groups = build_line_groups(&config)?;

        let mut s = Self {
            config,
            mvp,
            projection: Mat4::IDENTITY,
            modelview: Mat4::IDENTITY,
            line_groups: vec![],
        };

        s.update_projection_and_sync(backend, projection);
        s.update_modelview_and_sync(backend, modelview);
        s.upload_line_groups(backend, line_groups)?;

        backend.enable_depth_test();
        backend.clear();

        info!(
            "Scene initialized at {width}x{height} with {} line groups",
            s.line_groups.len()
        );

        Ok(s)
    }

    pub fn draw<B: SceneBackend + ?Sized>(&self, backend: &mut B) {
        backend.clear();
        backend.draw_background(self.config.background.top, self.config.background.bottom);
        backend.draw_line_groups();
    }

    /// Rebuilds the projection for a new surface size. The modelview is left untouched.
    ///
    /// On error the previous size and projection are kept.
    pub fn resized<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let mut mvp = self.mvp;
        mvp.width = width;
        mvp.height = height;
        let projection = mvp.build_perspective_projection()?;

        debug!("Resized to {width}x{height}");
        self.mvp = mvp;
        self.update_projection_and_sync(backend, projection);

        Ok(())
    }

    pub fn refresh_modelview<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        let modelview = self.mvp.build_turntable_modelview();
        self.update_modelview_and_sync(backend, modelview);
    }

    pub fn refresh_projection<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<()> {
        let projection = self.mvp.build_perspective_projection()?;
        self.update_projection_and_sync(backend, projection);

        Ok(())
    }

    pub fn update_projection_and_sync<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        projection: Mat4,
    ) {
        self.projection = projection;
        backend.set_projection(projection);
    }

    pub fn update_modelview_and_sync<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        modelview: Mat4,
    ) {
        self.modelview = modelview;
        backend.set_modelview(modelview);
    }

    /// Rotates the turntable by a drag delta in points.
    pub fn orbit<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, drag: Vec2) {
        self.mvp
            .turntable
            .orbit(drag * self.config.turntable.orbit_sensitivity);
        self.refresh_modelview(backend);
    }

    /// Moves the camera along the view axis by a scroll delta in points.
    pub fn zoom<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, scroll: f32) {
        self.mvp.zoom(scroll * self.config.turntable.zoom_sensitivity);
        self.refresh_modelview(backend);
    }

    /// Restores the configured turntable rotation and camera distance.
    pub fn reset_camera<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        self.mvp.turntable = self.config.turntable.turntable();
        self.mvp.translation_z = self
            .config
            .camera
            .translation_z
            .clamp(-self.mvp.far, -self.mvp.near);
        self.refresh_modelview(backend);
    }

    pub fn set_camera_state<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        state: CameraState,
    ) {
        self.mvp.turntable = state.turntable;
        self.mvp.translation_z = state
            .translation_z
            .clamp(-self.mvp.far, -self.mvp.near);
        self.refresh_modelview(backend);
    }

    pub fn set_fov<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        fov_radians: f32,
    ) -> Result<()> {
        let previous = self.mvp.fov_radians;
        self.mvp.fov_radians = fov_radians;

        if let Err(e) = self.refresh_projection(backend) {
            self.mvp.fov_radians = previous;
            return Err(e);
        }

        Ok(())
    }

    /// Replaces the scene with a new configuration, keeping the current surface size.
    ///
    /// Nothing is changed if the configuration is invalid. If the backend fails to take
    /// the new line groups, the previous scene is uploaded again before the error is
    /// returned.
    pub fn reload<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        config: SceneConfig,
    ) -> Result<()> {
        config.validate()?;
        let mvp = config.mvp_builder(self.mvp.width, self.mvp.height);
        let projection = mvp.build_perspective_projection()?;
        let line_groups = build_line_groups(&config)?;

        let previous_config = std::mem::replace(&mut self.config, config);
        let previous_mvp = std::mem::replace(&mut self.mvp, mvp);
        let previous_groups = std::mem::take(&mut self.line_groups);
        backend.clear_line_groups();

        self.update_projection_and_sync(backend, projection);
        self.refresh_modelview(backend);
        if let Err(e) = self.upload_line_groups(backend, line_groups) {
            warn!("Reload failed, restoring the previous scene: {e:?}");

            backend.clear_line_groups();
            self.line_groups.clear();
            self.config = previous_config;
            self.mvp = previous_mvp;
            self.refresh_projection(backend)?;
            self.refresh_modelview(backend);
            self.upload_line_groups(backend, previous_groups)?;

            return Err(e);
        }

        info!("Scene reloaded with {} line groups", self.line_groups.len());

        Ok(())
    }

    fn upload_line_groups<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        line_groups: Vec<LineGroup>,
    ) -> Result<()> {
        for group in line_groups {
            backend.add_line_group(&group)?;
            trace!(
                "Added line group '{}' ({} segments)",
                group.name,
                group.segment_count()
            );
            self.line_groups.push(group);
        }

        Ok(())
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn modelview(&self) -> Mat4 {
        self.modelview
    }

    pub fn mvp(&self) -> &MvpBuilder {
        &self.mvp
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn line_groups(&self) -> &[LineGroup] {
        &self.line_groups
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.mvp.width, self.mvp.height)
    }

    pub fn camera_state(&self) -> CameraState {
        CameraState {
            turntable: self.mvp.turntable,
            translation_z: self.mvp.translation_z,
        }
    }
}

/// The part of the camera that is worth remembering between runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub turntable: Turntable,
    pub translation_z: f32,
}
