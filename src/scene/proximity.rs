use crate::config::GlowConfig;
use crate::model::Body;

/// Makes bodies glow when they get near each other. Purely visual: nothing is
/// pushed apart, and glow is only ever raised here.
pub fn apply_proximity_glow(bodies: &mut [Body], config: &GlowConfig) {
    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let distance =
                nalgebra::distance(&bodies[i].screen_position(), &bodies[j].screen_position());
            let threshold = config.proximity_factor * (bodies[i].size() + bodies[j].size());

            if distance < threshold {
                let glow = config.proximity_peak * (1.0 - distance / threshold);
                bodies[i].raise_glow(glow);
                bodies[j].raise_glow(glow);
            }
        }
    }
}
