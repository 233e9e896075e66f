/// Runs Newton's method for exactly `num_iterations` steps, starting from
/// `guess`. There's no convergence check: callers that run this once per frame
/// want a fixed cost more than they want the last few digits.
///
/// If a step would divide by a zero derivative, or produce a non-finite value,
/// we stop early and return the last finite guess.
pub fn newton_fixed_steps(
    f_and_f_prime: impl Fn(f64) -> (f64, f64),
    mut guess: f64,
    num_iterations: usize,
) -> f64 {
    for _ in 0..num_iterations {
        let (f, f_prime) = f_and_f_prime(guess);
        if f_prime == 0.0 {
            break;
        }

        let next_guess = guess - f / f_prime;
        if !next_guess.is_finite() {
            break;
        }
        guess = next_guess;
    }

    guess
}
