//! Sweeping all-pass phase shifter used to decorrelate the rear feeds.
//!
//! Four first-order all-pass stages share one break frequency. The break
//! frequency sweeps geometrically between a lower and upper bound, bouncing
//! back and forth forever, so each rear component carries a slowly wandering
//! phase offset relative to the front channels.

use std::f64::consts::PI;

/// Sweep range in octaves above the lower bound.
const SWEEP_DEPTH: f64 = 4.0;
/// Sets the lower bound: `Wp_min = π · SWEEP_DELAY_MS / fs`.
const SWEEP_DELAY_MS: f64 = 100.0;
/// Full-range sweeps per second.
const SWEEP_RATE_HZ: f64 = 0.1;

/// Number of cascaded all-pass stages.
pub const STAGES: usize = 4;

/// History and sweep position for one decorrelated sub-signal.
#[derive(Debug, Clone, Default)]
pub struct PhaseShiftState {
    lx: [f32; STAGES],
    ly: [f32; STAGES],
    wp: f64,
    min_wp: f64,
    max_wp: f64,
    sweep_factor: f64,
    rising_factor: f64,
    initialized: bool,
}

impl PhaseShiftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep bounds for `sample_rate`. Only the first call after
    /// construction or [`reset`](Self::reset) has an effect.
    pub fn ensure_initialized(&mut self, sample_rate: f64) {
        if self.initialized {
            return;
        }
        let range = 2.0_f64.powf(SWEEP_DEPTH);
        self.min_wp = PI * SWEEP_DELAY_MS / sample_rate;
        self.max_wp = self.min_wp * range;
        self.wp = self.min_wp;
        self.rising_factor = range.powf(SWEEP_RATE_HZ / (sample_rate / 2.0));
        self.sweep_factor = self.rising_factor;
        self.initialized = true;
    }

    /// Run one sample through the all-pass chain, negating the result when
    /// `invert` is set, then advance the sweep by one step.
    #[inline]
    pub fn apply(&mut self, sample: f32, sample_rate: f64, invert: bool) -> f32 {
        self.ensure_initialized(sample_rate);

        let coef = ((1.0 - self.wp) / (1.0 + self.wp)) as f32;
        let mut x = sample;
        for stage in 0..STAGES {
            let y = coef * (self.ly[stage] + x) - self.lx[stage];
            self.lx[stage] = x;
            self.ly[stage] = y;
            x = y;
        }

        self.tick();

        if invert { -x } else { x }
    }

    /// Advance the break frequency one sample. Bounds are checked after the
    /// multiply, so `wp` can overshoot a bound by one step before turning.
    #[inline]
    fn tick(&mut self) {
        self.wp *= self.sweep_factor;
        if self.wp > self.max_wp {
            self.sweep_factor = 1.0 / self.rising_factor;
        } else if self.wp < self.min_wp {
            self.sweep_factor = self.rising_factor;
        }
    }

    /// Clear history and sweep position; bounds are re-derived on next use.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current normalised break frequency.
    pub fn wp(&self) -> f64 {
        self.wp
    }

    /// `(min_wp, max_wp)` once initialized.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_wp, self.max_wp)
    }

    /// True while the break frequency is rising.
    pub fn is_rising(&self) -> bool {
        self.sweep_factor > 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    #[test]
    fn initializes_lazily() {
        let mut ps = PhaseShiftState::new();
        assert!(!ps.is_initialized());

        ps.apply(0.0, SR, false);
        assert!(ps.is_initialized());

        let (min_wp, max_wp) = ps.bounds();
        assert!((min_wp - PI * 100.0 / SR).abs() < 1e-15);
        assert!((max_wp - min_wp * 16.0).abs() < 1e-15);
    }

    #[test]
    fn init_only_once() {
        let mut ps = PhaseShiftState::new();
        ps.ensure_initialized(SR);
        let bounds = ps.bounds();
        ps.ensure_initialized(96000.0);
        assert_eq!(ps.bounds(), bounds);

        ps.reset();
        ps.ensure_initialized(96000.0);
        assert_ne!(ps.bounds(), bounds);
    }

    #[test]
    fn invert_negates_output() {
        let mut a = PhaseShiftState::new();
        let mut b = PhaseShiftState::new();
        for i in 0..500 {
            let x = ((i * 37) % 101) as f32 - 50.0;
            assert_eq!(a.apply(x, SR, false), -b.apply(x, SR, true));
        }
    }

    #[test]
    fn allpass_preserves_energy() {
        // Broadband input: output energy matches input energy once the
        // impulse response has fully decayed.
        let mut ps = PhaseShiftState::new();
        let mut e_in = 0.0_f64;
        let mut e_out = 0.0_f64;
        for i in 0..20000 {
            let x = if i < 1000 { ((i * 7919) % 200) as f32 / 100.0 - 1.0 } else { 0.0 };
            let y = ps.apply(x, SR, false);
            e_in += (x as f64).powi(2);
            e_out += (y as f64).powi(2);
        }
        let ratio = e_out / e_in;
        assert!(
            (ratio - 1.0).abs() < 0.05,
            "All-pass should preserve energy, ratio {ratio}"
        );
    }

    #[test]
    fn sweep_step_matches_rate() {
        let mut ps = PhaseShiftState::new();
        ps.ensure_initialized(SR);
        assert_eq!(ps.rising_factor, 16f64.powf(0.1 / 24000.0));
        assert_eq!(ps.sweep_factor, ps.rising_factor);
    }

    /// Ticks until the sweep direction flips, asserting the overshoot past
    /// either bound never exceeds one step.
    fn ticks_until_turn(ps: &mut PhaseShiftState, limit: usize) -> usize {
        let (min_wp, max_wp) = ps.bounds();
        let step = ps.rising_factor;
        let rising = ps.is_rising();
        for n in 1..=limit {
            ps.apply(0.0, SR, false);
            assert!(ps.wp() <= max_wp * step * (1.0 + 1e-9));
            assert!(ps.wp() >= min_wp / step * (1.0 - 1e-9));
            if ps.is_rising() != rising {
                return n;
            }
        }
        panic!("sweep did not turn within {limit} ticks");
    }

    #[test]
    fn sweep_half_period_is_five_seconds() {
        // 16x range at 0.1 Hz over fs/2: each leg takes fs / (2 · 0.1) ticks.
        let mut ps = PhaseShiftState::new();
        ps.ensure_initialized(SR);
        assert!(ps.is_rising());

        let limit = SR as usize * 6;
        assert_eq!(ticks_until_turn(&mut ps, limit), 240_000, "up-sweep length");
        assert!(!ps.is_rising());
        assert_eq!(ticks_until_turn(&mut ps, limit), 240_000, "down-sweep length");
        assert!(ps.is_rising());
        assert_eq!(ticks_until_turn(&mut ps, limit), 240_000, "second up-sweep length");
    }

    #[test]
    fn instances_are_independent() {
        let mut a = PhaseShiftState::new();
        let mut b = PhaseShiftState::new();
        for _ in 0..100 {
            a.apply(1.0, SR, false);
        }
        b.apply(1.0, SR, false);
        assert!(a.wp() > b.wp());
    }
}
