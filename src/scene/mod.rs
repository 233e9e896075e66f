use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::astro::kepler;
use crate::config::SceneConfig;
use crate::content::{layout, SkillRecord};
use crate::error::ConfigError;
use crate::math::geometry::all_finite;
use crate::model::{
    Body, BodyID, BodyInfo, BodyParams, CollisionQueue, ParticleEffect, ParticleSource,
    TransientParticle,
};

pub mod collision;
pub mod commands;
pub mod effects;
pub mod projector;
pub mod proximity;
pub mod selection;
pub mod theme;

use commands::{BodyCommand, BurstCommand, FlashCommand, RenderCommands, SpriteCommand};
use effects::DecorativePools;
use projector::PerspectiveProjector;
use selection::{SelectedBody, SelectionController};
use theme::Theme;

/// Size of the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False for zero, negative, NaN or infinite sizes, which leave nowhere
    /// to place anything.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Orbits live in a 0-100 square that gets stretched over the viewport.
    pub fn percent_to_pixels(&self, p: &Point2<f64>) -> Point2<f64> {
        Point2::new(p.x / 100.0 * self.width, p.y / 100.0 * self.height)
    }
}

/// What the host hands the scene every frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub viewport: Viewport,
    /// Wall-clock seconds since the scene started. Drives depth and floating.
    pub elapsed: f64,
    pub pointer: Option<Point2<f64>>,
    pub particles: Option<&'a [TransientParticle]>,
}

#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub frame: u64,
    pub commands: RenderCommands,
    /// For the particle owner to apply.
    pub particle_effects: Vec<ParticleEffect>,
}

/// Shared flag that stops a scene from another thread (or from the window's
/// close handler). Once stopped, always stopped.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Scene {
    config: SceneConfig,
    projector: PerspectiveProjector,
    bodies: Vec<Body>,
    events: CollisionQueue,
    pools: DecorativePools,
    rng: StdRng,
    selection: SelectionController,
    hovered: Option<BodyID>,
    theme: Theme,
    stop: StopHandle,
    frame: u64,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            projector: PerspectiveProjector::new(config.projector.clone()),
            bodies: Vec::new(),
            events: CollisionQueue::new(config.collision.event_lifetime),
            pools: DecorativePools::new(config.effects.clone()),
            rng: StdRng::seed_from_u64(config.seed),
            selection: SelectionController::new(),
            hovered: None,
            theme: Theme::default(),
            stop: StopHandle::default(),
            frame: 0,
            config,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replaces all bodies with ones built from `records`. Ids are the
    /// record's position in the list.
    pub fn load_skills(&mut self, records: Vec<SkillRecord>) {
        let built = layout::build_bodies(&records, &self.config.layout, self.config.seed);
        self.bodies = built
            .into_iter()
            .enumerate()
            .map(|(i, (info, params))| Body::new(BodyID(i), info, params))
            .collect();
        log::info!("loaded {} skill bodies", self.bodies.len());

        self.selection.forget_missing(&self.bodies);
        self.hovered = None;
    }

    pub fn add_body(&mut self, info: BodyInfo, params: BodyParams) -> BodyID {
        let id = BodyID(self.bodies.iter().map(|b| b.id.0 + 1).max().unwrap_or(0));
        self.bodies.push(Body::new(id, info, params));
        id
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyID) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            log::debug!("theme changed to {:?}", theme);
        }
        self.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn stop(&self) {
        if !self.stop.is_stopped() {
            log::info!("scene stopped after {} frames", self.frame);
        }
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn collision_events(&self) -> &CollisionQueue {
        &self.events
    }

    pub fn pools(&self) -> &DecorativePools {
        &self.pools
    }

    pub fn hovered(&self) -> Option<BodyID> {
        self.hovered
    }

    /// Runs one frame. Returns `None` once the scene has been stopped.
    pub fn tick(&mut self, inputs: FrameInputs) -> Option<FrameOutput> {
        if self.stop.is_stopped() {
            return None;
        }
        self.frame += 1;

        let FrameInputs {
            viewport,
            elapsed,
            pointer,
            particles,
        } = inputs;

        for body in self.bodies.iter_mut() {
            step_body(body, &self.projector, &self.config, elapsed, &viewport);
        }

        proximity::apply_proximity_glow(&mut self.bodies, &self.config.glow);

        let outcome = collision::detect_collisions(
            &mut self.bodies,
            particles,
            &self.config.collision,
            self.frame,
        );
        if !outcome.events.is_empty() {
            log::trace!(
                "frame {}: {} collisions",
                self.frame,
                outcome.events.len()
            );
        }
        // Only events from earlier frames age, so a new flash publishes at 0
        self.events.age_and_prune();
        self.events.extend(outcome.events);

        self.pools.step(&mut self.rng, &viewport);

        self.hovered = pointer.and_then(|p| self.pick(&p));

        Some(FrameOutput {
            frame: self.frame,
            commands: self.build_commands(),
            particle_effects: outcome.effects,
        })
    }

    /// Same as [Scene::tick], but reads particles from `source` and hands the
    /// resulting effects straight back to it.
    pub fn tick_with_source(
        &mut self,
        source: &mut impl ParticleSource,
        viewport: Viewport,
        elapsed: f64,
        pointer: Option<Point2<f64>>,
    ) -> Option<FrameOutput> {
        let output = self.tick(FrameInputs {
            viewport,
            elapsed,
            pointer,
            particles: source.particles(),
        })?;
        source.apply_effects(&output.particle_effects);
        Some(output)
    }

    /// The body drawn on top at `point`, if any. Closer bodies win.
    pub fn pick(&self, point: &Point2<f64>) -> Option<BodyID> {
        self.bodies
            .iter()
            .filter(|b| b.hit_test(point))
            .max_by(|a, b| a.scale().total_cmp(&b.scale()))
            .map(|b| b.id)
    }

    /// Selects whatever is under `point`. A miss leaves the selection alone.
    pub fn select_at(&mut self, point: &Point2<f64>) -> Option<BodyID> {
        let id = self.pick(point)?;
        self.select(id)
    }

    pub fn select(&mut self, id: BodyID) -> Option<BodyID> {
        match self.bodies.iter().find(|b| b.id == id) {
            Some(body) => Some(self.selection.select(body).id),
            None => {
                log::warn!("tried to select unknown body {:?}", id);
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> Option<&SelectedBody> {
        self.selection.selected()
    }

    fn build_commands(&self) -> RenderCommands {
        let palette = self.theme.palette();
        let selected = self.selection.selected_id();

        // Far to near, so the host can just paint in order
        let mut order: Vec<&Body> = self.bodies.iter().collect();
        order.sort_by(|a, b| b.depth().total_cmp(&a.depth()));

        let bodies = order
            .into_iter()
            .map(|body| BodyCommand {
                id: body.id,
                position: body.screen_position(),
                size: body.size(),
                rotation: body.rotation(),
                color: body.info.color,
                glow: body.glow(),
                label_visible: Some(body.id) == self.hovered || Some(body.id) == selected,
                label: body.info.name.clone(),
                icon: body.info.icon.clone(),
            })
            .collect();

        let flashes = self
            .events
            .iter()
            .map(|event| {
                let progress = self.events.progress(event);
                FlashCommand {
                    position: event.position,
                    radius: event.intensity * (1.0 + 2.0 * progress),
                    inner_color: event.particle_color,
                    outer_color: event.body_color,
                    alpha: (1.0 - progress) as f32,
                }
            })
            .collect();

        let bursts = self
            .pools
            .bursts()
            .iter()
            .map(|burst| BurstCommand {
                position: burst.position,
                radius: burst.radius,
                color: palette.burst,
                alpha: burst.life as f32,
            })
            .collect();

        let sprites = self
            .pools
            .sprites()
            .iter()
            .map(|sprite| SpriteCommand {
                kind: sprite.kind,
                position: sprite.position,
                rotation: sprite.rotation,
                color: palette.sprite,
                alpha: sprite.life as f32,
            })
            .collect();

        RenderCommands {
            background: palette.background,
            label_color: palette.label,
            bodies,
            flashes,
            bursts,
            sprites,
        }
    }
}

/// Integrate, float, project, decay, rotate. If anything comes out
/// non-finite the body keeps its last good position for this frame.
fn step_body(
    body: &mut Body,
    projector: &PerspectiveProjector,
    config: &SceneConfig,
    elapsed: f64,
    viewport: &Viewport,
) {
    let step = kepler::advance(body.orbit());
    if step.mean_anomaly.is_finite() && all_finite(&step.position) {
        body.orbit_mut().set_mean_anomaly(step.mean_anomaly);
        body.set_orbit_position(step.position);

        let pixels = viewport.percent_to_pixels(&step.position) + body.float_offset(elapsed);
        let projection = projector.project(
            pixels,
            body.base_size(),
            body.base_depth(),
            body.depth_oscillation(),
            elapsed,
            viewport,
        );

        // Clamping would quietly turn a NaN into an edge, so check the input too
        let finite = all_finite(&pixels)
            && all_finite(&projection.position)
            && projection.size.is_finite()
            && projection.depth.is_finite();
        if finite {
            body.set_projection(
                projection.position,
                projection.size,
                projection.scale,
                projection.depth,
            );
        } else {
            log::warn!(
                "{} ({:?}) projected to a non-finite position, keeping the last one",
                body.info.name,
                body.id
            );
        }
    } else {
        log::warn!(
            "{} ({:?}) has a non-finite orbit step, keeping the last position",
            body.info.name,
            body.id
        );
    }

    body.decay_glow(config.glow.decay_per_frame);
    body.advance_rotation();
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::*;
    use crate::model::Oscillator;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    fn info(name: &str) -> BodyInfo {
        BodyInfo {
            name: String::from(name),
            color: Point3::new(0.2, 0.6, 0.9),
            icon: None,
        }
    }

    fn inputs(elapsed: f64) -> FrameInputs<'static> {
        FrameInputs {
            viewport: VIEWPORT,
            elapsed,
            pointer: None,
            particles: None,
        }
    }

    fn quiet_scene() -> Scene {
        let mut config = SceneConfig::default();
        config.effects.burst_spawn_chance = 0.0;
        config.effects.sprite_spawn_chance = 0.0;
        Scene::new(config).unwrap()
    }

    #[test]
    fn test_percent_to_pixels() {
        assert_eq!(
            VIEWPORT.percent_to_pixels(&Point2::new(50.0, 25.0)),
            Point2::new(500.0, 200.0)
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = SceneConfig::default();
        config.effects.burst_spawn_chance = 2.0;
        assert!(Scene::new(config).is_err());
    }

    #[test]
    fn test_tick_advances_the_orbit() {
        let mut scene = quiet_scene();
        let id = scene.add_body(
            info("Rust"),
            BodyParams {
                angular_rate: 0.1,
                ..Default::default()
            },
        );

        let output = scene.tick(inputs(0.0)).unwrap();
        assert_eq!(output.frame, 1);
        assert_relative_eq!(scene.body(id).unwrap().orbit().mean_anomaly(), 0.1);
        assert_eq!(output.commands.bodies.len(), 1);
    }

    #[test]
    fn test_add_body_ids_are_unique() {
        let mut scene = quiet_scene();
        let a = scene.add_body(info("a"), BodyParams::default());
        let b = scene.add_body(info("b"), BodyParams::default());
        assert_ne!(a, b);
    }

    #[test]
    fn test_bodies_sorted_far_to_near() {
        let mut scene = quiet_scene();
        let near = scene.add_body(
            info("near"),
            BodyParams {
                base_depth: -200.0,
                ..Default::default()
            },
        );
        let far = scene.add_body(
            info("far"),
            BodyParams {
                semimajor_axis: 30.0,
                base_depth: 400.0,
                ..Default::default()
            },
        );
        let output = scene.tick(inputs(0.0)).unwrap();
        let ids: Vec<_> = output.commands.bodies.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![far, near]);
    }

    #[test]
    fn test_non_finite_body_is_isolated() {
        let mut scene = quiet_scene();
        let good = scene.add_body(info("good"), BodyParams::default());
        let bad = scene.add_body(
            info("bad"),
            BodyParams {
                semimajor_axis: 30.0,
                // rate * t overflows to infinity, and sin(inf) is NaN
                float_x: Oscillator::new(1.0, f64::MAX, 0.0),
                ..Default::default()
            },
        );

        scene.tick(inputs(0.0)).unwrap();
        let before = scene.body(bad).unwrap().screen_position();
        assert!(all_finite(&before));

        scene.tick(inputs(2.0)).unwrap();
        assert_eq!(scene.body(bad).unwrap().screen_position(), before);
        assert!(all_finite(&scene.body(good).unwrap().screen_position()));
    }

    #[test]
    fn test_hover_shows_label() {
        let mut scene = quiet_scene();
        let id = scene.add_body(info("Go"), BodyParams::default());
        scene.tick(inputs(0.0)).unwrap();
        let position = scene.body(id).unwrap().screen_position();

        let output = scene
            .tick(FrameInputs {
                pointer: Some(position),
                ..inputs(0.0)
            })
            .unwrap();
        assert_eq!(scene.hovered(), Some(id));
        assert!(output.commands.bodies[0].label_visible);

        let output = scene.tick(inputs(0.0)).unwrap();
        assert!(!output.commands.bodies[0].label_visible);
    }

    #[test]
    fn test_theme_only_changes_colors() {
        let mut scene = quiet_scene();
        scene.add_body(info("Zig"), BodyParams::default());
        let dark = scene.tick(inputs(0.0)).unwrap().commands;
        scene.set_theme(Theme::Light);
        let light = scene.tick(inputs(0.0)).unwrap().commands;
        assert_ne!(dark.background, light.background);
        assert_eq!(dark.bodies.len(), light.bodies.len());
        assert_eq!(dark.bodies[0].color, light.bodies[0].color);
    }

    #[test]
    fn test_stop_handle_from_elsewhere() {
        let mut scene = quiet_scene();
        let handle = scene.stop_handle();
        assert!(scene.tick(inputs(0.0)).is_some());
        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert!(scene.tick(inputs(0.0)).is_none());
        assert_eq!(scene.frame(), 1);
    }
}
