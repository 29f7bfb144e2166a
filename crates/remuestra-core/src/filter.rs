//! Windowed-sinc kernel design.
//!
//! A kernel holds one wing of a symmetric, unity-DC-gain lowpass impulse
//! response sampled at [`NPC`](crate::fixed::NPC) entries per zero
//! crossing, quantized to 16-bit coefficients, together with a
//! forward-difference table that lets the evaluator interpolate between
//! adjacent table phases. Tables are built once per [`Resampler`] and are
//! immutable afterwards.
//!
//! [`Resampler`]: crate::Resampler

use alloc::vec::Vec;

use libm::{floor, sin, sqrt};

use crate::fixed::{NHG, NHXN, NLPSCL, NPC};

/// Convergence bound for the Kaiser window Bessel series.
const IZERO_EPSILON: f64 = 1e-21;

/// Kernel quality presets.
///
/// Both are Kaiser-windowed sinc designs; they trade wing length (CPU per
/// output sample) against rolloff sharpness and stopband attenuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// 13 zero-crossing span, 0.90 rolloff, beta 6.0. Good general default.
    Standard,
    /// 65 zero-crossing span, 0.945 rolloff, beta 9.25. Mastering grade,
    /// roughly five times the per-sample cost of [`Quality::Standard`].
    High,
}

impl Quality {
    /// Length of the filter in zero crossings of the sinc (always odd).
    pub(crate) fn nmult(self) -> usize {
        match self {
            Quality::Standard => 13,
            Quality::High => 65,
        }
    }

    fn rolloff(self) -> f64 {
        match self {
            Quality::Standard => 0.90,
            Quality::High => 0.945,
        }
    }

    fn beta(self) -> f64 {
        match self {
            Quality::Standard => 6.0,
            Quality::High => 9.25,
        }
    }
}

/// One quantized wing of the symmetric lowpass kernel.
pub struct FilterKernel {
    /// Impulse response taps, full scale at the filter center.
    pub(crate) imp: Vec<i16>,
    /// Forward differences `imp[i + 1] - imp[i]`, last entry closes to zero.
    pub(crate) imp_diff: Vec<i16>,
    /// Number of taps in the wing.
    pub(crate) nwing: usize,
    /// Zero-crossing span the wing covers.
    pub(crate) nmult: usize,
    /// Unity-gain normalization scalar applied after the guard-bit shift.
    pub(crate) lp_scale: i32,
}

impl FilterKernel {
    /// Design the kernel for a quality preset.
    ///
    /// The ideal lowpass response is windowed by a truncated Kaiser window
    /// (the last window value stays nonzero, which lowers the first
    /// sidelobe), then scaled so the phase-0 polyphase row sums to full
    /// scale. `lp_scale` is derived from the quantized taps so that DC
    /// passes the whole fixed-point pipeline at unity within one LSB.
    pub fn design(quality: Quality) -> Self {
        let nmult = quality.nmult();
        let nwing = NPC * (nmult - 1) / 2;
        let frq = quality.rolloff() / 2.0;
        let beta = quality.beta();

        let mut ideal = Vec::with_capacity(nwing);
        ideal.push(2.0 * frq);
        for i in 1..nwing {
            let t = core::f64::consts::PI * i as f64 / NPC as f64;
            ideal.push(sin(2.0 * t * frq) / t);
        }

        let ibeta = 1.0 / izero(beta);
        let inm1 = 1.0 / (nwing - 1) as f64;
        for (i, c) in ideal.iter_mut().enumerate().skip(1) {
            let t = i as f64 * inm1;
            *c *= izero(beta * sqrt(1.0 - t * t)) * ibeta;
        }

        // Scale so the phase-0 row (the only one that sees a DC input
        // exactly) quantizes to full scale.
        let mut dc_gain = 0.0;
        let mut i = NPC;
        while i < nwing {
            dc_gain += ideal[i];
            i += NPC;
        }
        dc_gain = 2.0 * dc_gain + ideal[0];
        let scale = f64::from(i16::MAX) / dc_gain;

        let imp: Vec<i16> = ideal.iter().map(|&c| floor(c * scale + 0.5) as i16).collect();
        let mut imp_diff: Vec<i16> = imp.windows(2).map(|w| w[1] - w[0]).collect();
        imp_diff.push(-imp[nwing - 1]);

        // Normalization against the quantized DC gain, so rounding in the
        // taps does not bias the passband.
        let mut quantized_gain = i32::from(imp[0]);
        let mut i = NPC;
        while i < nwing {
            quantized_gain += 2 * i32::from(imp[i]);
            i += NPC;
        }
        let lp_scale =
            floor((1u64 << (NHXN + NHG + NLPSCL)) as f64 / f64::from(quantized_gain) + 0.5) as i32;

        Self { imp, imp_diff, nwing, nmult, lp_scale }
    }

    /// Number of taps in one wing.
    pub fn wing_len(&self) -> usize {
        self.nwing
    }
}

/// Zeroth-order modified Bessel function of the first kind, by its power
/// series. Converges quickly for the beta range used here.
fn izero(x: f64) -> f64 {
    let half = x / 2.0;
    let mut sum = 1.0;
    let mut u = 1.0;
    let mut n = 1.0;
    loop {
        let t = half / n;
        n += 1.0;
        u *= t * t;
        sum += u;
        if u < IZERO_EPSILON * sum {
            return sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wing_lengths_match_presets() {
        assert_eq!(FilterKernel::design(Quality::Standard).wing_len(), 1536);
        assert_eq!(FilterKernel::design(Quality::High).wing_len(), 8192);
    }

    #[test]
    fn center_tap_is_full_scale_peak() {
        let k = FilterKernel::design(Quality::Standard);
        let peak = k.imp.iter().map(|&c| i32::from(c).abs()).max().unwrap();
        assert_eq!(peak, i32::from(k.imp[0]));
        // Wing tail has decayed to a tiny fraction of the peak.
        assert!(i32::from(k.imp[k.nwing - 1]).abs() < peak / 100);
    }

    #[test]
    fn difference_table_is_consistent() {
        let k = FilterKernel::design(Quality::Standard);
        for i in 0..k.nwing - 1 {
            assert_eq!(i32::from(k.imp[i]) + i32::from(k.imp_diff[i]), i32::from(k.imp[i + 1]));
        }
        assert_eq!(k.imp_diff[k.nwing - 1], -k.imp[k.nwing - 1]);
    }

    #[test]
    fn quantized_dc_gain_is_full_scale() {
        for quality in [Quality::Standard, Quality::High] {
            let k = FilterKernel::design(quality);
            let mut gain = i32::from(k.imp[0]);
            let mut i = NPC;
            while i < k.nwing {
                gain += 2 * i32::from(k.imp[i]);
                i += NPC;
            }
            // Quantization may move the sum a few counts off full scale.
            assert!((gain - i32::from(i16::MAX)).abs() <= 8, "gain {gain} for {quality:?}");
        }
    }

    #[test]
    fn normalization_scalar_inverts_dc_gain() {
        let k = FilterKernel::design(Quality::Standard);
        let mut gain = i64::from(k.imp[0]);
        let mut i = NPC;
        while i < k.nwing {
            gain += 2 * i64::from(k.imp[i]);
            i += NPC;
        }
        let product = gain * i64::from(k.lp_scale);
        let unity = 1i64 << (NHXN + NHG + NLPSCL);
        assert!((product - unity).abs() <= gain / 2);
    }
}
