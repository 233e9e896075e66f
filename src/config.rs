use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Everything tunable about a scene. Every field has a default, so an empty
/// TOML file (or no file at all) gives the stock look.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the decorative pools and the procedural orbit layout.
    pub seed: u64,
    pub projector: ProjectorConfig,
    pub glow: GlowConfig,
    pub collision: CollisionConfig,
    pub effects: EffectsConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    pub camera_distance: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub size_floor: f64,
    pub size_ceiling: f64,
    /// Extra gap kept between a body's edge and the viewport edge, in pixels.
    pub margin: f64,
    /// Width and height of the central rectangle reserved for page content,
    /// as fractions of the viewport. Zero disables it.
    pub avoid_fraction: [f64; 2],
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            camera_distance: 800.0,
            min_scale: 0.4,
            max_scale: 1.4,
            size_floor: 30.0,
            size_ceiling: 120.0,
            margin: 10.0,
            avoid_fraction: [0.4, 0.3],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    pub decay_per_frame: f64,
    /// Bodies closer than `proximity_factor * (size_i + size_j)` glow.
    pub proximity_factor: f64,
    /// Glow reached by two bodies sitting on top of each other.
    pub proximity_peak: f64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            decay_per_frame: 0.5,
            proximity_factor: 1.5,
            proximity_peak: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub glow: f64,
    pub life_damage: f64,
    /// Frames a collision flash stays alive.
    pub event_lifetime: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            glow: 15.0,
            life_damage: 0.5,
            event_lifetime: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub burst_spawn_chance: f64,
    pub burst_cap: usize,
    pub burst_max_radius: f64,
    pub burst_growth_per_frame: f64,
    pub burst_fade_per_frame: f64,
    pub sprite_spawn_chance: f64,
    pub sprite_cap: usize,
    pub sprite_min_speed: f64,
    pub sprite_max_speed: f64,
    pub sprite_fade_per_frame: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            burst_spawn_chance: 0.003,
            burst_cap: 3,
            burst_max_radius: 90.0,
            burst_growth_per_frame: 1.5,
            burst_fade_per_frame: 0.02,
            sprite_spawn_chance: 0.004,
            sprite_cap: 2,
            sprite_min_speed: 1.0,
            sprite_max_speed: 3.0,
            sprite_fade_per_frame: 0.002,
        }
    }
}

/// Knobs for generating orbits for skills that don't specify their own.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Orbit center, in viewport percent.
    pub center: [f64; 2],
    /// Semi-major axis of the innermost orbit, in viewport percent.
    pub inner_axis: f64,
    /// Added to the semi-major axis for every orbit further out.
    pub axis_step: f64,
    pub max_eccentricity: f64,
    /// Angular rate of the innermost orbit, radians per frame. Outer orbits
    /// are slower, roughly following Kepler's third law.
    pub inner_rate: f64,
    pub base_size: f64,
    pub depth_amplitude: f64,
    pub float_amplitude: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: [50.0, 50.0],
            inner_axis: 22.0,
            axis_step: 5.0,
            max_eccentricity: 0.3,
            inner_rate: 0.006,
            base_size: 60.0,
            depth_amplitude: 250.0,
            float_amplitude: 6.0,
        }
    }
}

impl SceneConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("loaded scene configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: Default::default(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // TOML allows nan and inf; nothing downstream copes with them
        if let Some((name, value)) = self.float_fields().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }
        self.validate_projector()?;
        self.validate_effects()?;
        self.validate_layout()?;

        if self.glow.decay_per_frame < 0.0 {
            return Err(invalid(format!(
                "glow decay must be non-negative, got {}",
                self.glow.decay_per_frame
            )));
        }
        if self.collision.event_lifetime == 0 {
            return Err(invalid("collision event lifetime must be at least one frame"));
        }
        Ok(())
    }

    fn float_fields(&self) -> impl Iterator<Item = (&'static str, f64)> {
        let p = &self.projector;
        let g = &self.glow;
        let c = &self.collision;
        let e = &self.effects;
        let l = &self.layout;
        [
            ("projector.camera_distance", p.camera_distance),
            ("projector.min_scale", p.min_scale),
            ("projector.max_scale", p.max_scale),
            ("projector.size_floor", p.size_floor),
            ("projector.size_ceiling", p.size_ceiling),
            ("projector.margin", p.margin),
            ("projector.avoid_fraction", p.avoid_fraction[0]),
            ("projector.avoid_fraction", p.avoid_fraction[1]),
            ("glow.decay_per_frame", g.decay_per_frame),
            ("glow.proximity_factor", g.proximity_factor),
            ("glow.proximity_peak", g.proximity_peak),
            ("collision.glow", c.glow),
            ("collision.life_damage", c.life_damage),
            ("effects.burst_spawn_chance", e.burst_spawn_chance),
            ("effects.burst_max_radius", e.burst_max_radius),
            ("effects.burst_growth_per_frame", e.burst_growth_per_frame),
            ("effects.burst_fade_per_frame", e.burst_fade_per_frame),
            ("effects.sprite_spawn_chance", e.sprite_spawn_chance),
            ("effects.sprite_min_speed", e.sprite_min_speed),
            ("effects.sprite_max_speed", e.sprite_max_speed),
            ("effects.sprite_fade_per_frame", e.sprite_fade_per_frame),
            ("layout.center", l.center[0]),
            ("layout.center", l.center[1]),
            ("layout.inner_axis", l.inner_axis),
            ("layout.axis_step", l.axis_step),
            ("layout.max_eccentricity", l.max_eccentricity),
            ("layout.inner_rate", l.inner_rate),
            ("layout.base_size", l.base_size),
            ("layout.depth_amplitude", l.depth_amplitude),
            ("layout.float_amplitude", l.float_amplitude),
        ]
        .into_iter()
    }

    fn validate_projector(&self) -> Result<(), ConfigError> {
        let p = &self.projector;
        if p.camera_distance <= 0.0 {
            return Err(invalid(format!(
                "camera distance must be positive, got {}",
                p.camera_distance
            )));
        }
        if !(0.0 < p.min_scale && p.min_scale <= p.max_scale) {
            return Err(invalid(format!(
                "scale range must satisfy 0 < min <= max, got [{}, {}]",
                p.min_scale, p.max_scale
            )));
        }
        if !(0.0 < p.size_floor && p.size_floor <= p.size_ceiling) {
            return Err(invalid(format!(
                "size range must satisfy 0 < floor <= ceiling, got [{}, {}]",
                p.size_floor, p.size_ceiling
            )));
        }
        if p.avoid_fraction.iter().any(|f| !(0.0..1.0).contains(f)) {
            return Err(invalid(format!(
                "avoid fractions must be in [0, 1), got {:?}",
                p.avoid_fraction
            )));
        }
        Ok(())
    }

    fn validate_effects(&self) -> Result<(), ConfigError> {
        let e = &self.effects;
        for (name, chance) in [
            ("burst", e.burst_spawn_chance),
            ("sprite", e.sprite_spawn_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!(
                    "{} spawn chance must be a probability, got {}",
                    name, chance
                )));
            }
        }
        if e.sprite_min_speed > e.sprite_max_speed
            || !(e.sprite_max_speed - e.sprite_min_speed).is_finite()
        {
            return Err(invalid(format!(
                "sprite speed range is empty: [{}, {}]",
                e.sprite_min_speed, e.sprite_max_speed
            )));
        }
        if e.burst_fade_per_frame <= 0.0 || e.sprite_fade_per_frame <= 0.0 {
            return Err(invalid("fade rates must be positive"));
        }
        // A burst that never reaches its radius never starts fading
        if e.burst_growth_per_frame <= 0.0 || e.burst_max_radius <= 0.0 {
            return Err(invalid(format!(
                "burst growth and radius must be positive, got {} and {}",
                e.burst_growth_per_frame, e.burst_max_radius
            )));
        }
        Ok(())
    }

    fn validate_layout(&self) -> Result<(), ConfigError> {
        let l = &self.layout;
        if !(0.0..1.0).contains(&l.max_eccentricity) {
            return Err(invalid(format!(
                "layout eccentricity must be in [0, 1), got {}",
                l.max_eccentricity
            )));
        }
        if l.inner_axis <= 0.0 || l.base_size <= 0.0 {
            return Err(invalid("layout axis and base size must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
