use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};
use rand::Rng;

use super::Viewport;
use crate::config::EffectsConfig;

/// How far past the viewport edge a sprite may drift before it's dropped.
const SPRITE_EXIT_MARGIN: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstPhase {
    Growing,
    Fading,
}

/// An expanding ring that flares up and fades out. Decorative only.
#[derive(Debug, Clone)]
pub struct Supernova {
    pub position: Point2<f64>,
    pub radius: f64,
    pub max_radius: f64,
    pub life: f64,
    pub phase: BurstPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Comet,
    Satellite,
    Rocket,
}

/// Something drifting across the background. Decorative only.
#[derive(Debug, Clone)]
pub struct FlyingObject {
    pub kind: SpriteKind,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub rotation: f64,
    pub life: f64,
}

impl Supernova {
    fn step(&mut self, config: &EffectsConfig) {
        match self.phase {
            BurstPhase::Growing => {
                self.radius += config.burst_growth_per_frame;
                if self.radius >= self.max_radius {
                    self.radius = self.max_radius;
                    self.phase = BurstPhase::Fading;
                }
            }
            BurstPhase::Fading => {
                self.life = (self.life - config.burst_fade_per_frame).max(0.0);
            }
        }
    }
}

impl FlyingObject {
    fn step(&mut self, config: &EffectsConfig) {
        self.position += self.velocity;
        self.life = (self.life - config.sprite_fade_per_frame).max(0.0);
    }

    fn is_on_screen(&self, viewport: &Viewport) -> bool {
        let p = &self.position;
        -SPRITE_EXIT_MARGIN <= p.x
            && p.x <= viewport.width + SPRITE_EXIT_MARGIN
            && -SPRITE_EXIT_MARGIN <= p.y
            && p.y <= viewport.height + SPRITE_EXIT_MARGIN
    }
}

/// The two decorative particle pools: spawn, animate, expire. They never
/// interact with the bodies.
#[derive(Debug, Clone)]
pub struct DecorativePools {
    config: EffectsConfig,
    bursts: Vec<Supernova>,
    sprites: Vec<FlyingObject>,
}

impl DecorativePools {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            bursts: Vec::new(),
            sprites: Vec::new(),
        }
    }

    pub fn bursts(&self) -> &[Supernova] {
        &self.bursts
    }

    pub fn sprites(&self) -> &[FlyingObject] {
        &self.sprites
    }

    pub fn step(&mut self, rng: &mut impl Rng, viewport: &Viewport) {
        for burst in self.bursts.iter_mut() {
            burst.step(&self.config);
        }
        self.bursts.retain(|b| b.life > 0.0);

        for sprite in self.sprites.iter_mut() {
            sprite.step(&self.config);
        }
        self.sprites
            .retain(|s| s.life > 0.0 && s.is_on_screen(viewport));

        if !viewport.has_area() {
            return;
        }

        if self.bursts.len() < self.config.burst_cap
            && rng.random_bool(self.config.burst_spawn_chance)
        {
            let burst = self.spawn_burst(rng, viewport);
            log::debug!("supernova at ({:.0}, {:.0})", burst.position.x, burst.position.y);
            self.bursts.push(burst);
        }

        if self.sprites.len() < self.config.sprite_cap
            && rng.random_bool(self.config.sprite_spawn_chance)
        {
            let sprite = self.spawn_sprite(rng, viewport);
            log::debug!("{:?} entering at y = {:.0}", sprite.kind, sprite.position.y);
            self.sprites.push(sprite);
        }
    }

    fn spawn_burst(&self, rng: &mut impl Rng, viewport: &Viewport) -> Supernova {
        Supernova {
            position: Point2::new(
                rng.random_range(0.0..viewport.width),
                rng.random_range(0.0..viewport.height),
            ),
            radius: 0.0,
            max_radius: self.config.burst_max_radius * rng.random_range(0.5..=1.0),
            life: 1.0,
            phase: BurstPhase::Growing,
        }
    }

    fn spawn_sprite(&self, rng: &mut impl Rng, viewport: &Viewport) -> FlyingObject {
        let kind = match rng.random_range(0..3) {
            0 => SpriteKind::Comet,
            1 => SpriteKind::Satellite,
            _ => SpriteKind::Rocket,
        };

        // Enter from the left or the right edge, heading across
        let from_left = rng.random_bool(0.5);
        let speed = rng.random_range(self.config.sprite_min_speed..=self.config.sprite_max_speed);
        let drift = rng.random_range(-0.3..=0.3);
        let (x, vx) = if from_left {
            (-SPRITE_EXIT_MARGIN / 2.0, speed)
        } else {
            (viewport.width + SPRITE_EXIT_MARGIN / 2.0, -speed)
        };
        let velocity = Vector2::new(vx, drift * speed);

        FlyingObject {
            kind,
            position: Point2::new(x, rng.random_range(0.0..viewport.height)),
            velocity,
            rotation: velocity.y.atan2(velocity.x) + PI / 2.0,
            life: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn always_spawn() -> EffectsConfig {
        EffectsConfig {
            burst_spawn_chance: 1.0,
            sprite_spawn_chance: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_caps_are_respected() {
        let config = always_spawn();
        let mut pools = DecorativePools::new(config.clone());
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            pools.step(&mut rng, &VIEWPORT);
            assert!(pools.bursts().len() <= config.burst_cap);
            assert!(pools.sprites().len() <= config.sprite_cap);
        }
        assert_eq!(pools.bursts().len(), config.burst_cap);
    }

    #[test]
    fn test_burst_lifecycle() {
        let config = EffectsConfig {
            burst_max_radius: 10.0,
            burst_growth_per_frame: 5.0,
            burst_fade_per_frame: 0.5,
            ..Default::default()
        };
        let mut burst = Supernova {
            position: Point2::origin(),
            radius: 0.0,
            max_radius: 10.0,
            life: 1.0,
            phase: BurstPhase::Growing,
        };

        burst.step(&config);
        assert_eq!(burst.phase, BurstPhase::Growing);
        burst.step(&config);
        assert_eq!(burst.phase, BurstPhase::Fading);
        assert_eq!(burst.radius, 10.0);
        assert_eq!(burst.life, 1.0);

        burst.step(&config);
        burst.step(&config);
        assert_eq!(burst.life, 0.0);
    }

    #[test]
    fn test_bursts_expire() {
        let config = EffectsConfig {
            burst_spawn_chance: 1.0,
            burst_cap: 1,
            sprite_spawn_chance: 0.0,
            ..Default::default()
        };
        let mut pools = DecorativePools::new(config);
        let mut rng = StdRng::seed_from_u64(2);
        pools.step(&mut rng, &VIEWPORT);
        let first = pools.bursts()[0].position;

        // Long enough to grow to the largest radius and fade all the way
        for _ in 0..200 {
            pools.step(&mut rng, &VIEWPORT);
        }
        assert_eq!(pools.bursts().len(), 1);
        assert_ne!(pools.bursts()[0].position, first);
    }

    #[test]
    fn test_sprites_leave_the_screen() {
        let mut pools = DecorativePools::new(EffectsConfig {
            sprite_spawn_chance: 1.0,
            burst_spawn_chance: 0.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(3);
        pools.step(&mut rng, &VIEWPORT);
        pools.config.sprite_spawn_chance = 0.0;

        // Slowest sprite covers the viewport plus margins in under 1000 frames
        for _ in 0..1000 {
            pools.step(&mut rng, &VIEWPORT);
        }
        assert!(pools.sprites().is_empty());
    }

    #[test]
    fn test_degenerate_viewport_spawns_nothing() {
        let mut pools = DecorativePools::new(always_spawn());
        let mut rng = StdRng::seed_from_u64(4);
        let empty = Viewport {
            width: 0.0,
            height: 0.0,
        };
        pools.step(&mut rng, &empty);
        assert!(pools.bursts().is_empty());
        assert!(pools.sprites().is_empty());
    }

    #[test]
    fn test_non_finite_viewport_spawns_nothing() {
        let mut pools = DecorativePools::new(always_spawn());
        let mut rng = StdRng::seed_from_u64(5);
        for viewport in [
            Viewport::new(f64::INFINITY, 600.0),
            Viewport::new(800.0, f64::NAN),
            Viewport::new(f64::NAN, f64::NEG_INFINITY),
        ] {
            pools.step(&mut rng, &viewport);
            assert!(pools.bursts().is_empty());
            assert!(pools.sprites().is_empty());
        }
    }
}
