use std::f32::consts::PI;

use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3};

use super::controller::Rates;
use super::utils::{blend, draw_path, path_iter_parametric, to_planar};
use crate::model::TransientParticle;
use crate::scene::commands::RenderCommands;
use crate::scene::effects::SpriteKind;
use crate::scene::selection::SelectedBody;

const CIRCLE_SEGMENTS: usize = 48;
const GLOW_RINGS: usize = 4;
// no idea why text wants twice the coordinates, but it does
const TEXT_COORD_SCALE: f32 = 2.0;
const LABEL_SIZE: f32 = 40.0;
const PANEL_SIZE: f32 = 48.0;

/// Paints a frame's worth of [RenderCommands] with kiss3d's planar lines.
pub struct ScreenRenderer {
    font: std::rc::Rc<Font>,
}

impl ScreenRenderer {
    pub fn new() -> Self {
        Self {
            font: Font::default(),
        }
    }

    pub fn draw(
        &self,
        window: &mut Window,
        commands: &RenderCommands,
        meteors: &[TransientParticle],
        selection: Option<&SelectedBody>,
        rates: Rates,
    ) {
        let (width, height) = (window.width() as f64, window.height() as f64);
        let background = commands.background;
        window.set_background_color(background.x, background.y, background.z);

        for burst in commands.bursts.iter() {
            let center = to_planar(&burst.position, width, height);
            let color = blend(&background, &burst.color, burst.alpha);
            draw_circle(window, center, burst.radius as f32, &color);
        }

        for sprite in commands.sprites.iter() {
            let center = to_planar(&sprite.position, width, height);
            let color = blend(&background, &sprite.color, sprite.alpha);
            draw_sprite(window, center, sprite.rotation as f32, sprite.kind, &color);
        }

        for meteor in meteors.iter() {
            let head = to_planar(&meteor.position, width, height);
            let color = blend(&background, &meteor.color, meteor.life as f32);
            draw_circle(window, head, (meteor.size / 2.0) as f32, &color);
        }

        for body in commands.bodies.iter() {
            let center = to_planar(&body.position, width, height);
            let radius = (body.size / 2.0) as f32;

            // Rings spread further out the harder the body glows
            for ring in 1..=GLOW_RINGS {
                let spread = body.glow as f32 * ring as f32 / GLOW_RINGS as f32;
                if spread <= 0.0 {
                    break;
                }
                let fade = 1.0 - ring as f32 / (GLOW_RINGS + 1) as f32;
                let color = blend(&background, &body.color, fade);
                draw_circle(window, center, radius + spread, &color);
            }

            draw_circle(window, center, radius, &body.color);

            // A spoke so the self-rotation is visible
            let rotation = body.rotation as f32;
            let rim = center + nalgebra::Vector2::new(rotation.cos(), rotation.sin()) * radius;
            window.draw_planar_line(&center, &rim, &body.color);

            if body.label_visible {
                let text_pos = Point2::new(
                    (body.position.x as f32 - radius) * TEXT_COORD_SCALE,
                    (body.position.y as f32 + radius) * TEXT_COORD_SCALE,
                );
                window.draw_text(
                    &body.label,
                    &text_pos,
                    LABEL_SIZE,
                    &self.font,
                    &commands.label_color,
                );
            }
        }

        for flash in commands.flashes.iter() {
            let center = to_planar(&flash.position, width, height);
            let outer = blend(&background, &flash.outer_color, flash.alpha);
            let inner = blend(&background, &flash.inner_color, flash.alpha);
            draw_circle(window, center, flash.radius as f32, &outer);
            draw_circle(window, center, flash.radius as f32 / 2.0, &inner);
        }

        if let Some(selected) = selection {
            window.draw_text(
                &selection_text(selected),
                &Point2::origin(),
                PANEL_SIZE,
                &self.font,
                &commands.label_color,
            );
        }

        window.draw_text(
            &format!("FPS: {:.0}  ticks/s: {:.0}", rates.frames, rates.ticks),
            &Point2::new(width as f32 * TEXT_COORD_SCALE - 300.0, 0.0),
            PANEL_SIZE,
            &self.font,
            &commands.label_color,
        );
    }
}

fn draw_circle(window: &mut Window, center: Point2<f32>, radius: f32, color: &Point3<f32>) {
    let points = path_iter_parametric(
        |theta: f32| center + nalgebra::Vector2::new(theta.cos(), theta.sin()) * radius,
        0.0,
        2.0 * PI,
        CIRCLE_SEGMENTS,
    );
    draw_path(window, points, color);
}

fn draw_sprite(
    window: &mut Window,
    center: Point2<f32>,
    rotation: f32,
    kind: SpriteKind,
    color: &Point3<f32>,
) {
    // Outlines in local coordinates, nose pointing up
    let outline: &[(f32, f32)] = match kind {
        SpriteKind::Comet => &[(0.0, 6.0), (4.0, 0.0), (0.0, -24.0), (-4.0, 0.0), (0.0, 6.0)],
        SpriteKind::Satellite => &[
            (-14.0, 3.0),
            (14.0, 3.0),
            (14.0, -3.0),
            (-14.0, -3.0),
            (-14.0, 3.0),
        ],
        SpriteKind::Rocket => &[
            (0.0, 12.0),
            (5.0, 2.0),
            (5.0, -10.0),
            (-5.0, -10.0),
            (-5.0, 2.0),
            (0.0, 12.0),
        ],
    };

    let rotation = nalgebra::Rotation2::new(-rotation);
    let points = outline
        .iter()
        .map(|&(x, y)| center + rotation * nalgebra::Vector2::new(x, y));
    draw_path(window, points, color);
}

fn selection_text(selected: &SelectedBody) -> String {
    let readout = &selected.readout;
    let period = match readout.period {
        Some(period) => format!("{:.0} frames", period),
        None => String::from("-"),
    };
    format!(
        "{}\na = {:.1}  e = {:.2}\nr = {:.1}\napo = {:.1}  peri = {:.1}\nv = {:.3}\nmass = {:.1}\nperiod = {}",
        selected.name,
        selected.semimajor_axis,
        selected.eccentricity,
        readout.radial_distance,
        readout.aphelion,
        readout.perihelion,
        readout.orbital_velocity,
        readout.mass,
        period,
    )
}
