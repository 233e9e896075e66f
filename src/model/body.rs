use nalgebra::{Point2, Point3};

/// Eccentricities are clamped to this at creation; anything closer to 1 makes
/// the 3-step Kepler solve visibly jittery near periapsis.
pub const MAX_ECCENTRICITY: f64 = 0.99;

const DEFAULT_BASE_SIZE: f64 = 60.0;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => -1.0,
            Direction::CounterClockwise => 1.0,
        }
    }
}

// All the descriptive info about a body; never touched by the simulation
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub color: Point3<f32>,
    pub icon: Option<String>,
}

/// A sinusoid `amplitude * sin(rate * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oscillator {
    pub amplitude: f64,
    pub rate: f64,
    pub phase: f64,
}

impl Oscillator {
    pub fn new(amplitude: f64, rate: f64, phase: f64) -> Self {
        Self {
            amplitude,
            rate,
            phase,
        }
    }

    pub fn at(&self, t: f64) -> f64 {
        self.amplitude * (self.rate * t + self.phase).sin()
    }

    fn sanitized(self, what: &str) -> Self {
        Self {
            amplitude: finite_or(self.amplitude, 0.0, what),
            rate: finite_or(self.rate, 0.0, what),
            phase: finite_or(self.phase, 0.0, what),
        }
    }
}

/// Raw, unvalidated parameters for a body. Anything non-finite or out of
/// range gets replaced when the body is built.
#[derive(Debug, Clone)]
pub struct BodyParams {
    /// Orbit center, viewport percent.
    pub center: [f64; 2],
    /// Viewport percent.
    pub semimajor_axis: f64,
    pub eccentricity: f64,
    pub mean_anomaly: f64,
    /// Radians per frame. A negative rate flips the direction.
    pub angular_rate: f64,
    pub direction: Direction,
    /// Visual diameter in pixels, before perspective.
    pub base_size: f64,
    pub base_depth: f64,
    pub depth: Oscillator,
    pub float_x: Oscillator,
    pub float_y: Oscillator,
    /// Radians per frame.
    pub rotation_rate: f64,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            center: [50.0, 50.0],
            semimajor_axis: 20.0,
            eccentricity: 0.0,
            mean_anomaly: 0.0,
            angular_rate: 0.005,
            direction: Direction::CounterClockwise,
            base_size: DEFAULT_BASE_SIZE,
            base_depth: 0.0,
            depth: Oscillator::default(),
            float_x: Oscillator::default(),
            float_y: Oscillator::default(),
            rotation_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitElements {
    center: Point2<f64>,
    semimajor_axis: f64,
    semiminor_axis: f64,
    eccentricity: f64,
    mean_anomaly: f64,
    angular_rate: f64,
    direction: Direction,
}

impl OrbitElements {
    pub fn new(
        center: Point2<f64>,
        semimajor_axis: f64,
        eccentricity: f64,
        mean_anomaly: f64,
        angular_rate: f64,
        direction: Direction,
    ) -> Self {
        let center = Point2::new(
            finite_or(center.x, 50.0, "orbit center"),
            finite_or(center.y, 50.0, "orbit center"),
        );
        let semimajor_axis = finite_or(semimajor_axis, 0.0, "semi-major axis").abs();
        let eccentricity = clamp_eccentricity(eccentricity);
        let mean_anomaly = finite_or(mean_anomaly, 0.0, "mean anomaly");
        let angular_rate = finite_or(angular_rate, 0.0, "angular rate");

        // Fold the sign of the rate into the direction
        let (angular_rate, direction) = if angular_rate < 0.0 {
            let flipped = match direction {
                Direction::Clockwise => Direction::CounterClockwise,
                Direction::CounterClockwise => Direction::Clockwise,
            };
            (-angular_rate, flipped)
        } else {
            (angular_rate, direction)
        };

        Self {
            center,
            semimajor_axis,
            semiminor_axis: semimajor_axis * (1.0 - eccentricity * eccentricity).sqrt(),
            eccentricity,
            mean_anomaly,
            angular_rate,
            direction,
        }
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn semimajor_axis(&self) -> f64 {
        self.semimajor_axis
    }

    pub fn semiminor_axis(&self) -> f64 {
        self.semiminor_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    pub fn angular_rate(&self) -> f64 {
        self.angular_rate
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn aphelion(&self) -> f64 {
        self.semimajor_axis * (1.0 + self.eccentricity)
    }

    pub fn perihelion(&self) -> f64 {
        self.semimajor_axis * (1.0 - self.eccentricity)
    }

    pub(crate) fn set_mean_anomaly(&mut self, mean_anomaly: f64) {
        self.mean_anomaly = mean_anomaly;
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    orbit: OrbitElements,
    base_size: f64,
    base_depth: f64,
    depth_oscillation: Oscillator,
    float_x: Oscillator,
    float_y: Oscillator,
    rotation: f64,
    rotation_rate: f64,
    glow: f64,
    last_collision: Option<u64>,
    // -- derived every frame --
    orbit_position: Point2<f64>,
    depth: f64,
    screen_position: Point2<f64>,
    size: f64,
    scale: f64,
}

impl Body {
    pub fn new(id: BodyID, info: BodyInfo, params: BodyParams) -> Self {
        let orbit = OrbitElements::new(
            Point2::new(params.center[0], params.center[1]),
            params.semimajor_axis,
            params.eccentricity,
            params.mean_anomaly,
            params.angular_rate,
            params.direction,
        );

        let base_size = finite_or(params.base_size, DEFAULT_BASE_SIZE, "base size");
        let base_size = if base_size > 0.0 {
            base_size
        } else {
            DEFAULT_BASE_SIZE
        };

        // Start out sitting at periapsis-ish; the first tick fixes it up
        let orbit_position = orbit.center + nalgebra::Vector2::new(orbit.semimajor_axis, 0.0);

        Self {
            id,
            info,
            orbit,
            base_size,
            base_depth: finite_or(params.base_depth, 0.0, "base depth"),
            depth_oscillation: params.depth.sanitized("depth oscillation"),
            float_x: params.float_x.sanitized("horizontal float"),
            float_y: params.float_y.sanitized("vertical float"),
            rotation: 0.0,
            rotation_rate: finite_or(params.rotation_rate, 0.0, "rotation rate"),
            glow: 0.0,
            last_collision: None,
            orbit_position,
            depth: 0.0,
            screen_position: Point2::origin(),
            size: base_size,
            scale: 1.0,
        }
    }

    pub fn orbit(&self) -> &OrbitElements {
        &self.orbit
    }

    pub fn base_size(&self) -> f64 {
        self.base_size
    }

    pub fn base_depth(&self) -> f64 {
        self.base_depth
    }

    pub fn depth_oscillation(&self) -> &Oscillator {
        &self.depth_oscillation
    }

    /// Horizontal and vertical bobbing offsets at time `t`, in pixels.
    pub fn float_offset(&self, t: f64) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.float_x.at(t), self.float_y.at(t))
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn glow(&self) -> f64 {
        self.glow
    }

    pub fn last_collision(&self) -> Option<u64> {
        self.last_collision
    }

    /// Position along the orbit, in viewport percent.
    pub fn orbit_position(&self) -> Point2<f64> {
        self.orbit_position
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Projected position, in pixels.
    pub fn screen_position(&self) -> Point2<f64> {
        self.screen_position
    }

    /// Projected diameter, in pixels.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn orbit_mut(&mut self) -> &mut OrbitElements {
        &mut self.orbit
    }

    pub(crate) fn set_orbit_position(&mut self, position: Point2<f64>) {
        self.orbit_position = position;
    }

    pub(crate) fn set_projection(
        &mut self,
        screen_position: Point2<f64>,
        size: f64,
        scale: f64,
        depth: f64,
    ) {
        self.screen_position = screen_position;
        self.size = size;
        self.scale = scale;
        self.depth = depth;
    }

    /// Glow only goes up through here. Decay is the scene's job.
    pub(crate) fn raise_glow(&mut self, glow: f64) {
        if glow > self.glow {
            self.glow = glow;
        }
    }

    pub(crate) fn decay_glow(&mut self, amount: f64) {
        self.glow = (self.glow - amount).max(0.0);
    }

    pub(crate) fn advance_rotation(&mut self) {
        self.rotation += self.rotation_rate;
    }

    pub(crate) fn mark_collision(&mut self, frame: u64) {
        self.last_collision = Some(frame);
    }

    /// Whether `point` (pixels) lands on the projected disk.
    pub fn hit_test(&self, point: &Point2<f64>) -> bool {
        nalgebra::distance(&self.screen_position, point) <= self.size / 2.0
    }
}

fn clamp_eccentricity(e: f64) -> f64 {
    if !e.is_finite() {
        log::warn!("non-finite eccentricity {}, using a circular orbit", e);
        return 0.0;
    }
    if !(0.0..=MAX_ECCENTRICITY).contains(&e) {
        log::warn!(
            "eccentricity {} outside [0, {}], clamping",
            e,
            MAX_ECCENTRICITY
        );
    }
    nalgebra::clamp(e, 0.0, MAX_ECCENTRICITY)
}

fn finite_or(value: f64, default: f64, what: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::warn!("non-finite {} ({}), using {}", what, value, default);
        default
    }
}
