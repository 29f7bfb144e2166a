//! Remuestra Core - streaming fixed-point sample-rate conversion
//!
//! Converts a sequence of 16-bit PCM samples from one rate to another in
//! bounded memory: input is pulled through a fixed-capacity sliding window,
//! one chunk at a time, and the filter support (history and lookahead) is
//! carried across chunk boundaries so a multi-chunk stream is sample-exact
//! with a hypothetical single-shot conversion.
//!
//! # Architecture
//!
//! - [`fixed`] - the fixed-point time/phase formats and the rounding,
//!   saturating sample conversion shared by every path
//! - [`filter`] - Kaiser windowed-sinc kernel design: one wing of the
//!   symmetric lowpass impulse response plus its first-difference table
//! - [`stream`] - the chunk loop: window reads, per-channel runs on a
//!   shared time cursor, creep-folded window shifts, drain and under-run
//!
//! Two run strategies are available per conversion:
//!
//! - [`Strategy::Linear`] - two-point interpolation, O(1) per output
//!   sample, exact at identity ratio. No anti-aliasing.
//! - [`Strategy::Filtered`] - polyphase windowed-sinc convolution with
//!   optional sub-phase coefficient interpolation, with a table-aligned
//!   fast path when the output rate is at least the input rate.
//!
//! # Example
//!
//! ```rust
//! use remuestra_core::{Resampler, Strategy};
//!
//! let input: Vec<i16> = (0..4000).map(|i| (i % 128) as i16 * 16).collect();
//! let mut output = vec![0i16; 8000];
//!
//! let resampler = Resampler::new(Strategy::Linear);
//! let produced = resampler.resample(&input, None, 8000, &mut output, None, 16000, 8000);
//! assert_eq!(produced, 8000);
//! ```
//!
//! # Design Principles
//!
//! - **Drift-free timing**: the input position is an integer accumulator
//!   with 15 fractional bits, so long streams never accumulate float error
//! - **Bounded memory**: per-call working state is two stack windows; the
//!   only heap use is the one-time kernel table built in [`Resampler::new`]
//! - **Everything by value**: exhausted input is a short return count, not
//!   an error (callers compare produced against requested)
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded targets; kernel design
//! uses `libm` and `alloc` only.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod filter;
pub mod fixed;
pub mod stream;

mod run;
mod wing;

pub use filter::{FilterKernel, Quality};
pub use stream::{Resampler, Strategy, WINDOW_LEN};
