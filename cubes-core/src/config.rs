/// TOML demo configuration
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::frame::FrameDriver;
use crate::lighting::DirectionalLight;
use crate::strategy::TransformStrategy;

/// Default scene shipped with every frontend
pub const DEFAULT_CONFIG: &str = include_str!("../default.toml");

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl DemoConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::info!(
            "loaded {} with {} objects",
            path.display(),
            config.scene.objects.len()
        );
        Ok(config)
    }

    /// The shipped default scene
    pub fn builtin() -> Self {
        // Code defaults mirror the embedded file
        Self::from_toml_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Comparisons are negated so NaN values fail them too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scene.cube_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scene.cube_size must be positive, got {}",
                self.scene.cube_size
            )));
        }
        if !(self.camera.near > 0.0) || !(self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                self.camera.near, self.camera.far
            )));
        }
        if self.camera.position == self.camera.target {
            return Err(ConfigError::Invalid(
                "camera.position and camera.target must differ".to_string(),
            ));
        }
        if !(self.animation.speed >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.speed must not be negative, got {}",
                self.animation.speed
            )));
        }
        Ok(())
    }

    pub fn light(&self) -> DirectionalLight {
        DirectionalLight::new(
            self.light.ambient,
            self.light.color,
            Vector3::from(self.light.direction),
        )
    }

    pub fn driver(&self) -> FrameDriver {
        let mut driver = FrameDriver::new(
            Vector3::from(self.animation.axis),
            Point3::from(self.animation.pivot),
        );
        driver.speed = self.animation.speed;
        driver
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_cube_size")]
    pub cube_size: f32,
    /// Base position of each cube, in draw order
    #[serde(default = "default_objects")]
    pub objects: Vec<[f32; 3]>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cube_size: default_cube_size(),
            objects: default_objects(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_target")]
    pub target: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default)]
    pub orthographic: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            target: default_target(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            orthographic: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient: default_ambient(),
            color: default_light_color(),
            direction: default_light_direction(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(default)]
    pub strategy: TransformStrategy,
    #[serde(default = "default_axis")]
    pub axis: [f32; 3],
    #[serde(default = "default_pivot")]
    pub pivot: [f32; 3],
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            strategy: TransformStrategy::default(),
            axis: default_axis(),
            pivot: default_pivot(),
            speed: default_speed(),
        }
    }
}

fn default_cube_size() -> f32 {
    1.0
}
fn default_objects() -> Vec<[f32; 3]> {
    vec![[-3.0, 0.0, -14.0], [0.0, 0.0, -14.0], [3.0, 0.0, -14.0]]
}
fn default_target() -> [f32; 3] {
    [0.0, 0.0, -1.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_ambient() -> [f32; 3] {
    [0.3, 0.3, 0.3]
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_light_direction() -> [f32; 3] {
    [0.85, 0.8, 0.75]
}
fn default_axis() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_pivot() -> [f32; 3] {
    [-2.0, 0.0, -10.0]
}
fn default_speed() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = DemoConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config.scene.objects.len(), 3);
        assert_eq!(config.animation.strategy, TransformStrategy::Spin);
        assert_eq!(config.animation.pivot, [-2.0, 0.0, -10.0]);
        assert_eq!(config.camera.fov_degrees, 45.0);
    }

    #[test]
    fn test_builtin_parses() {
        let config = DemoConfig::from_toml_str(DEFAULT_CONFIG).expect("shipped config parses");
        assert!(!config.scene.objects.is_empty());
    }

    #[test]
    fn test_partial_sections() {
        let config = DemoConfig::from_toml_str(
            r#"
            [scene]
            objects = [[0.0, 0.0, -10.0]]

            [animation]
            strategy = "orbit-relative"
            pivot = [1.0, 0.0, -10.0]
            "#,
        )
        .expect("valid config");
        assert_eq!(config.scene.objects, vec![[0.0, 0.0, -10.0]]);
        assert_eq!(config.scene.cube_size, 1.0);
        assert_eq!(config.animation.strategy, TransformStrategy::OrbitRelative);
        assert_eq!(config.animation.axis, [0.0, 1.0, 0.0]);

        let driver = config.driver();
        assert_eq!(driver.pivot, Point3::new(1.0, 0.0, -10.0));
    }

    #[test]
    fn test_unknown_strategy_is_parse_error() {
        let err = DemoConfig::from_toml_str("[animation]\nstrategy = \"wobble\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_planes() {
        let err = DemoConfig::from_toml_str("[camera]\nnear = 5.0\nfar = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_non_positive_cube() {
        let err = DemoConfig::from_toml_str("[scene]\ncube_size = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DemoConfig::load("/nonexistent/cubes.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
