use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinesceneError>;

#[derive(Error, Debug)]
pub enum LinesceneError {
    #[error("Camera: {0}")]
    Camera(#[from] CameraError),

    #[error("Geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Config: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error")]
    Backend(#[from] anyhow::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Invalid clip planes (near {near}, far {far}), expected 0 < near < far")]
    ClipPlanes { near: f32, far: f32 },

    #[error("Field of view of {0} radians is outside (0, pi)")]
    FieldOfView(f32),

    #[error("Viewport {width}x{height} has no area")]
    EmptyViewport { width: u32, height: u32 },

    #[error("Camera translation {translation_z} is outside [-{far}, -{near}]")]
    Translation {
        translation_z: f32,
        near: f32,
        far: f32,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Grid spacing must be positive (got {0})")]
    GridSpacing(f32),

    #[error("Grid size must not be negative (got {0})")]
    GridSize(f32),

    #[error("Grid of size {size} with spacing {spacing} has too many lines")]
    GridTooDense { size: f32, spacing: f32 },

    #[error("Line width must be positive (got {0})")]
    LineWidth(f32),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Input/output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid camera settings: {0}")]
    Camera(#[from] CameraError),

    #[error("Invalid geometry settings: {0}")]
    Geometry(#[from] GeometryError),
}
