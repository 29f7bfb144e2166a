//! Host boundary for the remuestra pitch pipeline.
//!
//! This crate owns everything that sits between a PCM-producing host and
//! the DSP core:
//!
//! - **Engine lifecycle**: [`PitchHost`] installs, reconfigures, and tears
//!   down a [`PitchEngine`] collaborator, and drives it through the single
//!   [`PitchHost::process_block`] boundary.
//! - **Marshalling**: [`pcm_to_float`], [`float_to_pcm`], [`mix_voiced`],
//!   and [`downmix_stereo`] for crossing the 16-bit boundary.
//! - **Rate conversion**: [`resample_block`], a mono convenience wrapper
//!   over [`remuestra_core::Resampler`].

pub mod engine;
pub mod marshal;

pub use engine::{EngineParams, HostError, PitchEngine, PitchHost};
pub use marshal::{downmix_stereo, float_to_pcm, mix_voiced, pcm_to_float};
pub use remuestra_core::{Quality, Resampler, Strategy};

/// Convert a mono PCM block between sample rates, filling as much of
/// `output` as the input allows. Returns the number of samples written.
pub fn resample_block(
    resampler: &Resampler,
    input: &[i16],
    input_rate: u32,
    output: &mut [i16],
    output_rate: u32,
) -> usize {
    let request = output.len();
    resampler.resample(input, None, input_rate, output, None, output_rate, request)
}
