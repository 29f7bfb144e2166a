//! Filter-kernel evaluator: one convolution wing per call.
//!
//! An output sample is the sum of a left and a right wing around the
//! fractional input position. The left wing walks toward older samples
//! starting at the sample nearest the output time; the right wing walks
//! toward newer samples starting one later. When the phase is exactly
//! zero the two wings would both see the filter center, so the right wing
//! skips one tap spacing; it also drops its final coefficient so a
//! half-sample phase is not overcounted.
//!
//! All walks are index arithmetic over the window slice. The controller
//! sizes the history/lookahead margins so every index a wing can form is
//! in bounds.

use crate::filter::FilterKernel;
use crate::fixed::{AMASK, NA, NHXN, NP, NPC};

/// Which side of the filter center a wing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wing {
    /// Walk toward older input samples.
    Left,
    /// Walk toward newer input samples, skipping the shared center tap.
    Right,
}

impl Wing {
    fn step(self) -> isize {
        match self {
            Wing::Left => -1,
            Wing::Right => 1,
        }
    }
}

/// Round the guard cut to nearest, then shift a tap product down.
#[inline]
fn scale_product(mut t: i32) -> i32 {
    if t & (1 << (NHXN - 1)) != 0 {
        t += 1 << (NHXN - 1);
    }
    t >> NHXN
}

/// Table-aligned wing sum: the up-sampling path, where the tap stride is
/// exactly one table phase ([`NPC`] entries).
///
/// `center` is the window index of the sample nearest the output time and
/// `phase` its sub-sample fraction (already negated for the right wing).
/// With `interp` set, each coefficient is corrected from the difference
/// table by the sub-table address bits of the phase.
pub(crate) fn wing_up(
    kernel: &FilterKernel,
    interp: bool,
    x: &[i16],
    center: usize,
    phase: u32,
    wing: Wing,
) -> i32 {
    let mut hi = (phase >> NA) as usize;
    let a = (phase & AMASK) as i32;
    let mut end = kernel.nwing;
    if wing == Wing::Right {
        end -= 1;
        if phase == 0 {
            hi += NPC;
        }
    }

    let mut v = 0i32;
    let mut xi = center as isize;
    while hi < end {
        let mut t = i32::from(kernel.imp[hi]);
        if interp {
            t += (i32::from(kernel.imp_diff[hi]) * a) >> NA;
        }
        t *= i32::from(x[xi as usize]);
        v += scale_product(t);
        hi += NPC;
        xi += wing.step();
    }
    v
}

/// Arbitrary-ratio wing sum: the tap address is itself a fixed-point
/// accumulator stepped by `dhb`, the kernel sampling period scaled by the
/// rate ratio, so each fetched coefficient pair is interpolated by the
/// fractional address against the difference table.
pub(crate) fn wing_arb(
    kernel: &FilterKernel,
    interp: bool,
    x: &[i16],
    center: usize,
    phase: u32,
    wing: Wing,
    dhb: u32,
) -> i32 {
    let mut ho = (phase * dhb) >> NP;
    let mut end = kernel.nwing;
    if wing == Wing::Right {
        end -= 1;
        if phase == 0 {
            ho += dhb;
        }
    }

    let mut v = 0i32;
    let mut xi = center as isize;
    loop {
        let hi = (ho >> NA) as usize;
        if hi >= end {
            return v;
        }
        let mut t = i32::from(kernel.imp[hi]);
        if interp {
            let a = (ho & AMASK) as i32;
            t += (i32::from(kernel.imp_diff[hi]) * a) >> NA;
        }
        t *= i32::from(x[xi as usize]);
        v += scale_product(t);
        ho += dhb;
        xi += wing.step();
    }
}
