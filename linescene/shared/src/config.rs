use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    camera::{MvpBuilder, Turntable},
    color::Color,
    error::{CameraError, ConfigError, GeometryError},
    geometry::SquareGrid,
};

/// Everything needed to set up the example scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub turntable: TurntableConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub background: BackgroundConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_radians: f32,
    pub near: f32,
    pub far: f32,
    pub translation_z: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_radians: std::f32::consts::FRAC_PI_2,
            near: 0.01,
            far: 100.0,
            translation_z: -10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurntableConfig {
    pub elevation: f32,
    pub azimuth: f32,
    /// Radians per dragged point
    pub orbit_sensitivity: f32,
    /// World units per scrolled point
    pub zoom_sensitivity: f32,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        Self {
            elevation: std::f32::consts::FRAC_PI_6,
            azimuth: -std::f32::consts::FRAC_PI_4,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.01,
        }
    }
}

impl TurntableConfig {
    pub fn turntable(&self) -> Turntable {
        Turntable::new(self.elevation, self.azimuth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub length: f32,
    pub line_width: f32,
    pub x: Color,
    pub y: Color,
    pub z: Color,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            length: 2.0,
            line_width: 4.0,
            x: Color::from_argb8(255, 255, 0, 0),
            y: Color::from_argb8(255, 0, 255, 0),
            z: Color::from_argb8(255, 0, 0, 255),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Half-extent in world units
    pub size: f32,
    pub spacing: f32,
    pub line_width: f32,
    pub color: Color,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5.0,
            spacing: 1.0,
            line_width: 1.0,
            color: Color::from_argb8(255, 0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub top: Color,
    pub bottom: Color,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            top: Color::from_argb8(255, 146, 134, 188),
            bottom: Color::GREEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl SceneConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(&path)?;
        let config = Self::from_yaml_str(&data)?;
        debug!("Loaded scene config from {:?}", path.as_ref());

        Ok(config)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Camera parameters for a surface of the given size
    pub fn mvp_builder(&self, width: u32, height: u32) -> MvpBuilder {
        MvpBuilder {
            fov_radians: self.camera.fov_radians,
            near: self.camera.near,
            far: self.camera.far,
            width,
            height,
            translation_z: self.camera.translation_z,
            turntable: self.turntable.turntable(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Any non-empty viewport will do, only the camera parameters are checked here
        self.mvp_builder(1, 1).validate()?;

        let CameraConfig {
            near,
            far,
            translation_z,
            ..
        } = self.camera;
        if !(translation_z >= -far && translation_z <= -near) {
            return Err(CameraError::Translation {
                translation_z,
                near,
                far,
            }
            .into());
        }

        SquareGrid::new(self.grid.size, self.grid.spacing)?;

        for width in [self.axes.line_width, self.grid.line_width] {
            if !(width > 0.0) {
                return Err(GeometryError::LineWidth(width).into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_example_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.fov_radians, std::f32::consts::FRAC_PI_2);
        assert_eq!(config.camera.near, 0.01);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.camera.translation_z, -10.0);
        assert_eq!(config.axes.line_width, 4.0);
        assert_eq!(config.grid.size, 5.0);
        assert_eq!(config.grid.spacing, 1.0);
        assert_eq!(config.grid.line_width, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SceneConfig::from_yaml_str(
            "
camera:
  far: 250.0
grid:
  size: 10
  color: { r: 0.5, g: 0.5, b: 0.5 }
",
        )
        .unwrap();

        assert_eq!(config.camera.far, 250.0);
        assert_eq!(config.camera.near, 0.01);
        assert_eq!(config.grid.size, 10.0);
        assert_eq!(config.grid.spacing, 1.0);
        assert_eq!(config.grid.color, Color::rgb(0.5, 0.5, 0.5));
        assert_eq!(config.axes, AxesConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        // An empty YAML document deserializes to unit, use an empty mapping instead
        let config = SceneConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn yaml_round_trip() {
        let config = SceneConfig::default();
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(SceneConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SceneConfig::from_yaml_str("camera: { near: 5.0, far: 1.0 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Camera(CameraError::ClipPlanes { .. })
        ));

        let err = SceneConfig::from_yaml_str("grid: { spacing: -1 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Geometry(GeometryError::GridSpacing(_))
        ));

        let err = SceneConfig::from_yaml_str("axes: { line_width: 0 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Geometry(GeometryError::LineWidth(_))
        ));

        let err = SceneConfig::from_yaml_str("grid: { size: 3e9, spacing: 1 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Geometry(GeometryError::GridTooDense { .. })
        ));

        let err = SceneConfig::from_yaml_str("camera: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn translation_stays_between_clip_planes() {
        let err = SceneConfig::from_yaml_str("camera: { translation_z: -500.0 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Camera(CameraError::Translation {
                translation_z,
                ..
            }) if translation_z == -500.0
        ));

        // In front of the near plane
        let err = SceneConfig::from_yaml_str("camera: { translation_z: 0.0 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Camera(CameraError::Translation { .. })
        ));

        let config =
            SceneConfig::from_yaml_str("camera: { far: 500.0, translation_z: -500.0 }").unwrap();
        assert_eq!(config.camera.translation_z, -500.0);
    }

    #[test]
    fn bundled_scene_parses() {
        let config =
            SceneConfig::from_yaml_str(include_str!("../../scenes/wide_grid.yaml")).unwrap();

        assert_eq!(config.camera.translation_z, -25.0);
        assert_eq!(config.camera.near, 0.01);
        assert_eq!(config.grid.spacing, 0.5);
        assert_eq!(config.background.top, Color::rgb(0.1, 0.1, 0.18));
        assert_eq!(
            SquareGrid::new(config.grid.size, config.grid.spacing)
                .unwrap()
                .lines_per_direction(),
            49
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneConfig::load("/nonexistent/linescene.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
