use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use kiss3d::event::EventManager;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::meteors::MeteorShower;
use self::renderer::ScreenRenderer;
use crate::content::SkillRecord;
use crate::model::ParticleSource;
use crate::scene::commands::RenderCommands;
use crate::scene::{Scene, Viewport};

mod controller;
pub mod meteors;
mod renderer;
mod utils;

/// The interactive window: owns the scene, a meteor shower to throw at it,
/// and whatever skills are still on their way in.
pub struct Viewer {
    scene: Scene,
    meteors: MeteorShower,
    controller: Controller,
    renderer: ScreenRenderer,
    skills: Option<Receiver<Vec<SkillRecord>>>,
    // Only advances while unpaused
    elapsed: f64,
    last_frame: Instant,
    last_commands: Option<RenderCommands>,
}

impl Viewer {
    pub fn new(scene: Scene, skills: Receiver<Vec<SkillRecord>>) -> Self {
        let seed = scene.config().seed;
        Self {
            scene,
            meteors: MeteorShower::new(seed.wrapping_add(1)),
            controller: Controller::new(),
            renderer: ScreenRenderer::new(),
            skills: Some(skills),
            elapsed: 0.0,
            last_frame: Instant::now(),
            last_commands: None,
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.scene);
        }
    }

    fn poll_skills(&mut self) {
        let receiver = match &self.skills {
            Some(receiver) => receiver,
            None => return,
        };
        match receiver.try_recv() {
            Ok(records) => {
                self.scene.load_skills(records);
                self.skills = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::warn!("skill fetch went away without an answer");
                self.skills = None;
            }
        }
    }
}

impl State for Viewer {
    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        if self.scene.is_stopped() {
            window.close();
            return;
        }
        self.poll_skills();

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let viewport = Viewport::new(window.width() as f64, window.height() as f64);
        if !self.controller.is_paused() {
            self.elapsed += dt;
            self.meteors.step(&viewport);
            let cursor = self.controller.cursor();
            if let Some(output) =
                self.scene
                    .tick_with_source(&mut self.meteors, viewport, self.elapsed, cursor)
            {
                self.last_commands = Some(output.commands);
            }
        }

        if let Some(commands) = &self.last_commands {
            self.renderer.draw(
                window,
                commands,
                self.meteors.particles().unwrap_or(&[]),
                self.scene.selection(),
                self.controller.rates(),
            );
        }
        self.controller.record_frame(dt, self.scene.frame());
    }
}
