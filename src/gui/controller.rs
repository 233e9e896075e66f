use kiss3d::event::{Action, Event, Key, MouseButton, WindowEvent};
use nalgebra::Point2;

use crate::scene::Scene;

// Key config, all in one place
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_THEME: Key = Key::T;
const KEY_CLEAR_SELECTION: Key = Key::Escape;
const KEY_QUIT: Key = Key::Q;

pub struct Controller {
    paused: bool,
    cursor: Option<Point2<f64>>,
    rates: RateMeter,
}

/// Frames drawn and scene ticks per second, averaged over the last full
/// window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rates {
    pub frames: f64,
    pub ticks: f64,
}

/// Measures [Rates] from the frame times it's fed, rather than reading the
/// clock itself. Ticks are counted off the scene's frame number, so pausing
/// shows up as a tick rate of zero.
pub struct RateMeter {
    window_seconds: f64,
    elapsed: f64,
    frames: u32,
    first_tick: Option<u64>,
    current: Rates,
}

impl RateMeter {
    pub fn new(window_seconds: f64) -> Self {
        RateMeter {
            window_seconds,
            elapsed: 0.0,
            frames: 0,
            first_tick: None,
            current: Rates::default(),
        }
    }

    pub fn rates(&self) -> Rates {
        self.current
    }

    pub fn record(&mut self, dt: f64, scene_frame: u64) {
        self.elapsed += dt;
        self.frames += 1;
        let first = *self.first_tick.get_or_insert(scene_frame);

        if self.elapsed >= self.window_seconds && self.elapsed > 0.0 {
            self.current = Rates {
                frames: f64::from(self.frames) / self.elapsed,
                ticks: scene_frame.saturating_sub(first) as f64 / self.elapsed,
            };
            self.elapsed = 0.0;
            self.frames = 0;
            self.first_tick = Some(scene_frame);
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            paused: false,
            cursor: None,
            rates: RateMeter::new(1.0),
        }
    }

    pub fn process_event(&mut self, event: Event, scene: &mut Scene) {
        match event.value {
            WindowEvent::CursorPos(x, y, _) => {
                self.cursor = Some(Point2::new(x, y));
            }
            WindowEvent::CursorEnter(false) => {
                self.cursor = None;
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                if let Some(cursor) = self.cursor {
                    if let Some(id) = scene.select_at(&cursor) {
                        if let Some(selected) = scene.selection() {
                            log::info!("selected {} ({:?})", selected.name, id);
                        }
                    }
                }
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_TOGGLE_THEME, Action::Press, _) => {
                scene.set_theme(scene.theme().toggled());
            }
            WindowEvent::Key(KEY_CLEAR_SELECTION, Action::Press, _) => {
                scene.clear_selection();
            }
            WindowEvent::Key(KEY_QUIT, Action::Press, _) | WindowEvent::Close => {
                scene.stop();
            }
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn cursor(&self) -> Option<Point2<f64>> {
        self.cursor
    }

    pub fn rates(&self) -> Rates {
        self.rates.rates()
    }

    pub fn record_frame(&mut self, dt: f64, scene_frame: u64) {
        self.rates.record(dt, scene_frame);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_rates_wait_for_a_full_window() {
        let mut meter = RateMeter::new(1.0);
        for frame in 0..30 {
            meter.record(1.0 / 60.0, frame);
        }
        assert_eq!(meter.rates(), Rates::default());
    }

    #[test]
    fn test_paused_scene_has_no_ticks() {
        let mut meter = RateMeter::new(0.5);
        // 32 drawn frames at 64 Hz, but the scene ticked only for the first 10
        for i in 0..32u64 {
            meter.record(1.0 / 64.0, i.min(10));
        }
        let rates = meter.rates();
        assert_relative_eq!(rates.frames, 64.0);
        assert_relative_eq!(rates.ticks, 20.0);

        for _ in 0..32 {
            meter.record(1.0 / 64.0, 10);
        }
        assert_eq!(meter.rates().ticks, 0.0);
    }
}
