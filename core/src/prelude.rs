use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

/// How a detected ship leaves the scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LifecyclePolicy {
    /// Counted, pulsed and respawned within the detecting tick.
    Immediate,
    /// Frozen under a hold marker for `display_ms`, then recycled.
    Timed { display_ms: u64 },
}

impl LifecyclePolicy {
    pub fn display_duration(&self) -> Option<Duration> {
        match self {
            LifecyclePolicy::Immediate => None,
            LifecyclePolicy::Timed { display_ms } => Some(Duration::from_millis(*display_ms)),
        }
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        LifecyclePolicy::Timed { display_ms: 3000 }
    }
}

/// Geometry of the oscillating scanner mounted on the robot's eye.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub origin: Point3<f32>,
    pub base_direction: Vector3<f32>,
    pub pivot_axis: Vector3<f32>,
    pub half_angle_deg: f32,
    pub max_range: f32,
    /// Peak swing away from the base direction, radians.
    pub amplitude_rad: f32,
    /// Angular frequency of the swing, radians per second.
    pub frequency_rad_s: f32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            origin: Point3::new(-14.7, 2.0, 5.5),
            base_direction: Vector3::x(),
            pivot_axis: Vector3::z(),
            half_angle_deg: 5.0,
            max_range: 25.0,
            amplitude_rad: FRAC_PI_4,
            frequency_rad_s: 3.0,
        }
    }
}

impl ScannerConfig {
    fn validate(&self) -> ConfigResult<()> {
        let finite = self.origin.iter().all(|v| v.is_finite())
            && self.base_direction.iter().all(|v| v.is_finite())
            && self.pivot_axis.iter().all(|v| v.is_finite())
            && self.half_angle_deg.is_finite()
            && self.max_range.is_finite()
            && self.amplitude_rad.is_finite()
            && self.frequency_rad_s.is_finite();
        if !finite {
            return Err(ConfigError::NonFinite("scanner"));
        }
        if self.base_direction.norm_squared() == 0.0 {
            return Err(ConfigError::ZeroVector("scanner.base_direction"));
        }
        if self.pivot_axis.norm_squared() == 0.0 {
            return Err(ConfigError::ZeroVector("scanner.pivot_axis"));
        }
        Ok(())
    }
}

/// Spawn volume, exit boundary and speed band of the ship pool.
///
/// Ships always travel along -X toward the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub pool_size: usize,
    pub spawn_min: Point3<f32>,
    pub spawn_max: Point3<f32>,
    pub exit_x: f32,
    /// Units per reference tick.
    pub speed_min: f32,
    pub speed_max: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            pool_size: 8,
            spawn_min: Point3::new(20.0, -3.0, 0.5),
            spawn_max: Point3::new(25.0, 7.0, 10.5),
            exit_x: -20.0,
            speed_min: 0.05,
            speed_max: 0.08,
        }
    }
}

impl PatrolConfig {
    fn validate(&self) -> ConfigResult<()> {
        let finite = self.spawn_min.iter().all(|v| v.is_finite())
            && self.spawn_max.iter().all(|v| v.is_finite())
            && self.exit_x.is_finite()
            && self.speed_min.is_finite()
            && self.speed_max.is_finite();
        if !finite {
            return Err(ConfigError::NonFinite("patrol"));
        }
        if self.speed_min < 0.0 {
            return Err(ConfigError::NegativeSpeed(self.speed_min));
        }
        if self.speed_min > self.speed_max {
            return Err(ConfigError::InvertedSpeedBand {
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        for (axis, (lo, hi)) in ['x', 'y', 'z']
            .into_iter()
            .zip(self.spawn_min.iter().zip(self.spawn_max.iter()))
        {
            if lo > hi {
                return Err(ConfigError::InvertedSpawnVolume(axis));
            }
        }
        Ok(())
    }
}

/// Full scene configuration, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub scanner: ScannerConfig,
    pub patrol: PatrolConfig,
    pub lifecycle: LifecyclePolicy,
    /// Reference frame rate that gives ship speeds their per-tick meaning.
    pub tick_rate_hz: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            patrol: PatrolConfig::default(),
            lifecycle: LifecyclePolicy::default(),
            tick_rate_hz: 60.0,
        }
    }
}

impl SceneConfig {
    /// Thin red line scanner; detections respawn the ship on the spot.
    pub fn line_variant() -> Self {
        Self {
            lifecycle: LifecyclePolicy::Immediate,
            ..Default::default()
        }
    }

    /// Wide scanning cone; detections stay on display for three seconds.
    pub fn cone_variant() -> Self {
        Self {
            scanner: ScannerConfig {
                half_angle_deg: 15.0,
                ..Default::default()
            },
            lifecycle: LifecyclePolicy::Timed { display_ms: 3000 },
            ..Default::default()
        }
    }

    /// Rejects values the simulation cannot interpret.
    ///
    /// Degenerate but meaningful settings such as an empty pool or a zero
    /// range are accepted; they simply never produce a detection.
    pub fn validate(&self) -> ConfigResult<()> {
        self.scanner.validate()?;
        self.patrol.validate()?;
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate_hz));
        }
        Ok(())
    }
}

/// Configuration problems detected at load time.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("non-finite value in {0} config")]
    NonFinite(&'static str),
    #[error("{0} must not be a zero vector")]
    ZeroVector(&'static str),
    #[error("negative ship speed {0}")]
    NegativeSpeed(f32),
    #[error("speed band inverted: min {min} > max {max}")]
    InvertedSpeedBand { min: f32, max: f32 },
    #[error("spawn volume inverted on the {0} axis")]
    InvertedSpawnVolume(char),
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
