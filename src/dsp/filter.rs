//! Linkwitz-Riley 4th-order filter — 24 dB/oct low-pass and high-pass.
//!
//! Coefficients come from the bilinear transform of the analog LR4
//! prototype (two cascaded 2nd-order Butterworth sections). The filter runs
//! as a single direct-form I section with four taps of history on each side.

use std::f64::consts::{PI, SQRT_2};

/// Low-pass cutoffs are clamped to this fraction of the sample rate.
pub const LOW_PASS_NYQUIST_LIMIT: f64 = 0.475;

/// Feed-forward (`a`) and feedback (`b`) taps for one cutoff at one rate.
///
/// `b[0]` corresponds to B1; the leading feedback tap is normalised to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    pub a: [f64; 5],
    pub b: [f64; 4],
}

impl Default for FilterCoefficients {
    /// Identity (pass-through) response.
    fn default() -> Self {
        Self {
            a: [1.0, 0.0, 0.0, 0.0, 0.0],
            b: [0.0; 4],
        }
    }
}

impl FilterCoefficients {
    /// LR4 low-pass. The cutoff is clamped to 0.475·fs to keep the
    /// prewarped `tan` term well away from its pole at Nyquist.
    pub fn low_pass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        let fc = cutoff_hz.min(sample_rate_hz * LOW_PASS_NYQUIST_LIMIT);
        let p = Prototype::new(fc, sample_rate_hz);
        let wc4 = p.wc4;

        Self {
            a: [
                wc4 / p.norm,
                4.0 * wc4 / p.norm,
                6.0 * wc4 / p.norm,
                4.0 * wc4 / p.norm,
                wc4 / p.norm,
            ],
            b: p.feedback(),
        }
    }

    /// LR4 high-pass. Unlike [`low_pass`](Self::low_pass) the cutoff is used
    /// as given; a cutoff at or above Nyquist yields ill-conditioned taps.
    pub fn high_pass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        let p = Prototype::new(cutoff_hz, sample_rate_hz);
        let k4 = p.k4;

        Self {
            a: [
                k4 / p.norm,
                -4.0 * k4 / p.norm,
                6.0 * k4 / p.norm,
                -4.0 * k4 / p.norm,
                k4 / p.norm,
            ],
            b: p.feedback(),
        }
    }
}

/// Shared bilinear-transform terms for one (cutoff, rate) pair.
struct Prototype {
    wc2: f64,
    wc4: f64,
    k2: f64,
    k4: f64,
    sq_tmp1: f64,
    sq_tmp2: f64,
    norm: f64,
}

impl Prototype {
    fn new(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        let wc = 2.0 * PI * cutoff_hz;
        let wc2 = wc * wc;
        let wc3 = wc2 * wc;
        let wc4 = wc2 * wc2;

        // Prewarped analog frequency scale.
        let k = wc / (PI * cutoff_hz / sample_rate_hz).tan();
        let k2 = k * k;
        let k3 = k2 * k;
        let k4 = k2 * k2;

        let sq_tmp1 = SQRT_2 * wc3 * k;
        let sq_tmp2 = SQRT_2 * wc * k3;
        let norm = 4.0 * wc2 * k2 + 2.0 * sq_tmp1 + k4 + 2.0 * sq_tmp2 + wc4;

        Self {
            wc2,
            wc4,
            k2,
            k4,
            sq_tmp1,
            sq_tmp2,
            norm,
        }
    }

    fn feedback(&self) -> [f64; 4] {
        let Self {
            wc2,
            wc4,
            k2,
            k4,
            sq_tmp1,
            sq_tmp2,
            norm,
        } = *self;

        [
            4.0 * (wc4 + sq_tmp1 - k4 - sq_tmp2) / norm,
            (6.0 * wc4 - 8.0 * wc2 * k2 + 6.0 * k4) / norm,
            4.0 * (wc4 - sq_tmp1 + sq_tmp2 - k4) / norm,
            (k4 - 2.0 * sq_tmp1 + wc4 - 2.0 * sq_tmp2 + 4.0 * wc2 * k2) / norm,
        ]
    }
}

/// Input and output history (`x[n-1..n-4]`, `y[n-1..n-4]`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    xm: [f64; 4],
    ym: [f64; 4],
}

impl FilterState {
    /// Run one sample through `coeffs`, then shift both histories.
    #[inline]
    pub fn apply(&mut self, sample: f32, coeffs: &FilterCoefficients) -> f32 {
        let x = sample as f64;
        let FilterCoefficients { a, b } = coeffs;
        let xm = &mut self.xm;
        let ym = &mut self.ym;

        let y = a[0] * x + a[1] * xm[0] + a[2] * xm[1] + a[3] * xm[2] + a[4] * xm[3]
            - b[0] * ym[0]
            - b[1] * ym[1]
            - b[2] * ym[2]
            - b[3] * ym[3];

        xm[3] = xm[2];
        xm[2] = xm[1];
        xm[1] = xm[0];
        xm[0] = x;

        ym[3] = ym[2];
        ym[2] = ym[1];
        ym[1] = ym[0];
        ym[0] = y;

        y as f32
    }

    /// Zero both histories.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
