//! Per-channel run producers.
//!
//! A run advances the fixed-point time cursor across one chunk of the
//! input window, emitting one output sample per step until the cursor
//! reaches the chunk end or the bounded output slice fills. The cursor is
//! left where the run stopped so the controller can fold the residual
//! whole-sample advance (creep) into the next window shift.

use crate::filter::FilterKernel;
use crate::fixed::{self, NA, NHG, NLPSCL, NP, NPC, PMASK};
use crate::wing::{self, Wing};

/// Fixed-point cursor increment for one output sample at the given ratio.
#[inline]
pub(crate) fn time_increment(factor: f64) -> u32 {
    ((1.0 / factor) * f64::from(1u32 << NP) + 0.5) as u32
}

/// Linear interpolation run: blend the two bracketing input samples by the
/// sub-sample phase. Cheapest strategy, no anti-aliasing, exact when the
/// blend fraction is zero.
pub(crate) fn run_linear(
    x: &[i16],
    y: &mut [i16],
    factor: f64,
    time: &mut u32,
    nx: usize,
) -> usize {
    let dtb = time_increment(factor);
    let end_time = *time + ((nx as u32) << NP);

    let mut produced = 0;
    while *time < end_time && produced < y.len() {
        let xi = (*time >> NP) as usize;
        let frac = (*time & PMASK) as i32;
        let v = i32::from(x[xi]) * ((1 << NP) - frac) + i32::from(x[xi + 1]) * frac;
        y[produced] = fixed::word_to_sample(v, NP);
        produced += 1;
        *time += dtb;
    }
    produced
}

/// Filtered run for output rate >= input rate: both wings walk the kernel
/// table at its native spacing.
pub(crate) fn run_filtered_up(
    kernel: &FilterKernel,
    interp: bool,
    lp_scale: i32,
    x: &[i16],
    y: &mut [i16],
    factor: f64,
    time: &mut u32,
    nx: usize,
) -> usize {
    let dtb = time_increment(factor);
    let end_time = *time + ((nx as u32) << NP);

    let mut produced = 0;
    while *time < end_time && produced < y.len() {
        let xi = (*time >> NP) as usize;
        let mut v = wing::wing_up(kernel, interp, x, xi, *time & PMASK, Wing::Left);
        v += wing::wing_up(kernel, interp, x, xi + 1, time.wrapping_neg() & PMASK, Wing::Right);
        v >>= NHG;
        v *= lp_scale;
        y[produced] = fixed::word_to_sample(v, NLPSCL);
        produced += 1;
        *time += dtb;
    }
    produced
}

/// Filtered run for any ratio: tap addresses step by the kernel sampling
/// period scaled to the ratio, interpolating between table entries.
pub(crate) fn run_filtered_arb(
    kernel: &FilterKernel,
    interp: bool,
    lp_scale: i32,
    x: &[i16],
    y: &mut [i16],
    factor: f64,
    time: &mut u32,
    nx: usize,
) -> usize {
    let dtb = time_increment(factor);
    let end_time = *time + ((nx as u32) << NP);

    // Kernel sampling period: compressed when down-sampling so the
    // passband shrinks to the output Nyquist.
    let dh = (factor * NPC as f64).min(NPC as f64);
    let dhb = (dh * f64::from(1u32 << NA) + 0.5) as u32;

    let mut produced = 0;
    while *time < end_time && produced < y.len() {
        let xi = (*time >> NP) as usize;
        let mut v = wing::wing_arb(kernel, interp, x, xi, *time & PMASK, Wing::Left, dhb);
        v += wing::wing_arb(
            kernel,
            interp,
            x,
            xi + 1,
            time.wrapping_neg() & PMASK,
            Wing::Right,
            dhb,
        );
        v >>= NHG;
        v *= lp_scale;
        y[produced] = fixed::word_to_sample(v, NLPSCL);
        produced += 1;
        *time += dtb;
    }
    produced
}
