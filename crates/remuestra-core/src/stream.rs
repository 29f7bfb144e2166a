//! Streaming controller: sliding windows, chunk loop, history carry.
//!
//! The controller pulls input through two fixed-capacity stack windows
//! (left/right channel), runs the selected producer over one chunk at a
//! time, and slides each window left so the last `xoff` consumed samples
//! become the history region of the next chunk. Getting that carry right
//! is what makes a chunked conversion numerically identical to a
//! single-shot one: the filter wings must see true history and lookahead
//! at every chunk boundary.
//!
//! Whole-sample cursor drift beyond the chunk width ("creep") is folded
//! into the shift amount, so the cursor always re-enters the next chunk
//! inside the history region with only its fraction intact.

use crate::filter::{FilterKernel, Quality};
use crate::fixed::NP;
use crate::run;

/// Input window capacity per channel, in samples.
pub const WINDOW_LEN: usize = 4096;

/// Margin added to the filter half-width when sizing the history region,
/// leaving room for cursor creep.
const XOFF_PAD: usize = 10;

/// Run strategy for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Two-point linear interpolation. O(1) per output sample, exact at
    /// identity ratio, no anti-aliasing. Adequate for near-unity ratios
    /// or when CPU matters more than aliasing.
    Linear,
    /// Polyphase windowed-sinc filtering.
    Filtered {
        /// Kernel preset to design.
        quality: Quality,
        /// Interpolate kernel coefficients between adjacent table phases.
        /// Costs one multiply per tap, buys sub-phase accuracy; mostly
        /// relevant for arbitrary (non up-sampling) ratios.
        coeff_interp: bool,
    },
}

impl Strategy {
    /// Filtered conversion with coefficient interpolation on: the right
    /// default wherever the linear path's aliasing is not acceptable.
    pub fn filtered(quality: Quality) -> Self {
        Strategy::Filtered { quality, coeff_interp: true }
    }
}

/// A sample-rate converter for 16-bit PCM.
///
/// Construction designs the kernel tables (for the filtered strategy);
/// the converter itself carries no mutable state, so one instance can be
/// reused for any number of independent conversions.
pub struct Resampler {
    strategy: Strategy,
    kernel: Option<FilterKernel>,
}

impl Resampler {
    /// Create a converter for the given strategy.
    pub fn new(strategy: Strategy) -> Self {
        let kernel = match strategy {
            Strategy::Linear => None,
            Strategy::Filtered { quality, .. } => Some(FilterKernel::design(quality)),
        };
        Self { strategy, kernel }
    }

    /// The strategy this converter was built with.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Convert `input_left` (and `input_right` for stereo) from
    /// `input_rate` to `output_rate`, writing up to `num_samples` samples
    /// per output channel. Returns the number of samples actually written
    /// to each output buffer.
    ///
    /// The produced count is less than `num_samples` exactly when the
    /// input is exhausted first; that silent under-run is normal stream
    /// end, not an error, and callers that care must compare the counts.
    ///
    /// Both stereo channels advance on one shared time cursor (derived
    /// from the left channel), so they stay phase-locked; the right
    /// channel reuses the cursor against its own window history.
    ///
    /// # Panics
    ///
    /// On contract violations: zero rates, output capacity below
    /// `num_samples`, mismatched stereo buffers, or a down-ratio so
    /// extreme that the filter support would not fit half the window.
    pub fn resample(
        &self,
        input_left: &[i16],
        input_right: Option<&[i16]>,
        input_rate: u32,
        output_left: &mut [i16],
        mut output_right: Option<&mut [i16]>,
        output_rate: u32,
        num_samples: usize,
    ) -> usize {
        assert!(input_rate > 0 && output_rate > 0, "sample rates must be positive");
        assert!(output_left.len() >= num_samples, "output capacity below requested length");
        assert_eq!(
            input_right.is_some(),
            output_right.is_some(),
            "stereo needs both an input and an output right channel"
        );
        if let Some(right) = input_right {
            assert_eq!(right.len(), input_left.len(), "stereo inputs must be equal length");
        }
        if let Some(right) = output_right.as_deref() {
            assert!(right.len() >= num_samples, "output capacity below requested length");
        }

        let factor = f64::from(output_rate) / f64::from(input_rate);
        let xoff = self.history_len(factor);
        assert!(2 * xoff < WINDOW_LEN, "rate ratio too extreme for the filter window");

        if num_samples == 0 {
            return 0;
        }

        // Down-sampling stretches the kernel by 1/factor; compensate its
        // gain once here rather than per sample.
        let lp_scale = match &self.kernel {
            Some(k) if factor < 1.0 => (f64::from(k.lp_scale) * factor + 0.5) as i32,
            Some(k) => k.lp_scale,
            None => 0,
        };

        let stereo = input_right.is_some();
        let mut x1 = [0i16; WINDOW_LEN];
        let mut x2 = [0i16; WINDOW_LEN];

        let mut nx = WINDOW_LEN - 2 * xoff;
        let mut time: u32 = (xoff as u32) << NP;
        let mut xread = xoff;
        let mut consumed = 0usize;
        let mut final_end: Option<usize> = None;
        let mut ycount = 0usize;

        loop {
            if final_end.is_none() {
                // Pull fresh samples in just past the history region.
                let want = WINDOW_LEN - xread;
                let n = want.min(input_left.len() - consumed);
                x1[xread..xread + n].copy_from_slice(&input_left[consumed..consumed + n]);
                if let Some(right) = input_right {
                    x2[xread..xread + n].copy_from_slice(&right[consumed..consumed + n]);
                }
                consumed += n;
                if consumed == input_left.len() {
                    // Final chunk: remember where valid input ends and pad
                    // the rest with silence for the right wing's lookahead.
                    x1[xread + n..].fill(0);
                    if stereo {
                        x2[xread + n..].fill(0);
                    }
                    final_end = Some(xread + n);
                }
            }
            if let Some(end) = final_end {
                let left = end.saturating_sub(xoff);
                if left < nx {
                    nx = left;
                    if nx == 0 {
                        break; // drained
                    }
                }
            }

            let remaining = num_samples - ycount;
            let mut right_time = time;
            let nout = {
                let out = &mut output_left[ycount..ycount + remaining];
                self.produce(&x1, out, factor, &mut time, nx, lp_scale)
            };
            if let Some(right) = output_right.as_deref_mut() {
                // Identical increment and bounds, so the right channel
                // lands on exactly the same count.
                let out = &mut right[ycount..ycount + nout];
                let nout_right = self.produce(&x2, out, factor, &mut right_time, nx, lp_scale);
                debug_assert_eq!(nout_right, nout);
            }

            ycount += nout;
            if ycount >= num_samples {
                break;
            }

            // The cursor sits at or past the chunk end. Rebase it onto the
            // next window and fold whole-sample creep into the shift.
            time -= (nx as u32) << NP;
            let creep = (time >> NP) as usize - xoff;
            if creep > 0 {
                time -= (creep as u32) << NP;
            }
            let shift = nx + creep;
            x1.copy_within(shift.., 0);
            if stereo {
                x2.copy_within(shift.., 0);
            }
            xread = WINDOW_LEN - shift;
            if let Some(end) = final_end.as_mut() {
                *end = end.saturating_sub(shift);
                // The shift can drag stale samples past the stream end
                // into view; keep everything beyond it silent.
                x1[*end..].fill(0);
                if stereo {
                    x2[*end..].fill(0);
                }
            }
        }

        ycount
    }

    /// History (and lookahead) samples the window must carry for this
    /// ratio: the filter half-width, stretched by 1/factor when
    /// down-sampling, plus creep room. The linear path only brackets one
    /// sample but keeps the same margin structure.
    fn history_len(&self, factor: f64) -> usize {
        let half_width = match &self.kernel {
            Some(k) => (k.nmult + 1) / 2,
            None => 1,
        };
        let reach = half_width as f64 * (1.0 / factor).max(1.0);
        reach as usize + XOFF_PAD
    }

    fn produce(
        &self,
        x: &[i16],
        y: &mut [i16],
        factor: f64,
        time: &mut u32,
        nx: usize,
        lp_scale: i32,
    ) -> usize {
        let interp = matches!(self.strategy, Strategy::Filtered { coeff_interp: true, .. });
        match &self.kernel {
            None => run::run_linear(x, y, factor, time, nx),
            Some(k) if factor >= 1.0 => {
                run::run_filtered_up(k, interp, lp_scale, x, y, factor, time, nx)
            }
            Some(k) => run::run_filtered_arb(k, interp, lp_scale, x, y, factor, time, nx),
        }
    }
}
