//! Pitch-engine lifecycle and the block-processing boundary.
//!
//! The host owns at most one engine at a time. Installing a new one drops
//! the old (its teardown runs exactly once, on drop), and every call site
//! goes through [`PitchHost::process_block`], which marshals PCM to floats,
//! runs the engine, optionally blends a dry signal back in, and marshals
//! the result out.

use tracing::{debug, warn};

use crate::marshal;

/// Tuning and correction parameters applied to an installed engine.
///
/// Field meanings follow the usual auto-tune conventions; all of them are
/// plain values so a host can build one from any parameter source.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    /// Reference tuning frequency in Hz.
    pub concert_a: f32,
    /// Key letter for the correction scale ('a'..'g', 'x' for chromatic).
    pub key: char,
    /// Fixed target pitch offset, in semitones.
    pub fixed_pitch: f32,
    /// Pull strength toward the fixed pitch, 0..1.
    pub fixed_pull: f32,
    /// Correction strength toward the scale, 0..1.
    pub correct_strength: f32,
    /// Correction smoothing time constant, 0..1.
    pub correct_smooth: f32,
    /// Output pitch shift in semitones.
    pub pitch_shift: f32,
    /// Rotation of the correction scale, in scale steps.
    pub scale_rotate: i32,
    /// Vibrato depth in semitones.
    pub lfo_depth: f32,
    /// Vibrato rate in Hz.
    pub lfo_rate: f32,
    /// Vibrato waveform: 0 sine, 1 square, -1 saw.
    pub lfo_shape: f32,
    /// Vibrato rise/fall symmetry, -1..1.
    pub lfo_symmetry: f32,
    /// Quantize the vibrato to scale steps when nonzero.
    pub lfo_quantize: i32,
    /// Enable formant preservation.
    pub formant_correct: bool,
    /// Formant warp factor in semitones.
    pub formant_warp: f32,
    /// Wet/dry mix, 0..1.
    pub mix: f32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            concert_a: 440.0,
            key: 'c',
            fixed_pitch: 0.0,
            fixed_pull: 0.0,
            correct_strength: 1.0,
            correct_smooth: 0.0,
            pitch_shift: 0.0,
            scale_rotate: 0,
            lfo_depth: 0.0,
            lfo_rate: 5.0,
            lfo_shape: 0.0,
            lfo_symmetry: 0.0,
            lfo_quantize: 0,
            formant_correct: false,
            formant_warp: 0.0,
            mix: 1.0,
        }
    }
}

/// A pitch-processing collaborator the host can drive.
///
/// Implementations are constructed at a fixed sample rate elsewhere;
/// teardown is their `Drop` impl.
pub trait PitchEngine {
    /// Apply a parameter set. Called on install and on reconfigure.
    fn apply(&mut self, params: &EngineParams);
    /// Process one mono block in place, samples in `[-1.0, 1.0)`.
    fn process(&mut self, samples: &mut [f32]);
}

/// Errors from the host boundary.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The dry block must be exactly as long as the processed block.
    #[error("dry signal length {dry} does not match block length {block}")]
    DryLengthMismatch {
        /// Length of the dry slice supplied.
        dry: usize,
        /// Length of the PCM block being processed.
        block: usize,
    },
}

/// Owner handle for a pitch engine and its scratch buffers.
pub struct PitchHost<E> {
    engine: Option<E>,
    wet: Vec<f32>,
    dry: Vec<f32>,
}

impl<E: PitchEngine> Default for PitchHost<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PitchEngine> PitchHost<E> {
    /// An empty host with no engine installed.
    pub fn new() -> Self {
        Self { engine: None, wet: Vec::new(), dry: Vec::new() }
    }

    /// Install an engine, applying `params` to it. Any previously
    /// installed engine is dropped.
    pub fn install(&mut self, mut engine: E, params: &EngineParams) {
        engine.apply(params);
        debug!(replacing = self.engine.is_some(), "pitch engine installed");
        self.engine = Some(engine);
    }

    /// Re-apply a parameter set to the installed engine, if any.
    pub fn reconfigure(&mut self, params: &EngineParams) {
        match self.engine.as_mut() {
            Some(engine) => engine.apply(params),
            None => warn!("no pitch engine installed; parameters dropped"),
        }
    }

    /// Whether an engine is currently installed.
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Remove and return the installed engine.
    pub fn take(&mut self) -> Option<E> {
        self.engine.take()
    }

    /// Process one PCM block in place.
    ///
    /// With `dry` supplied, the processed signal is blended with it using
    /// the non-clipping voiced mix before conversion back to PCM. Without
    /// an installed engine the block passes through untouched (logged at
    /// warn level); that keeps an audio callback glitch-free while the
    /// host is being set up or torn down.
    pub fn process_block(
        &mut self,
        samples: &mut [i16],
        dry: Option<&[i16]>,
    ) -> Result<(), HostError> {
        if let Some(d) = dry {
            if d.len() != samples.len() {
                return Err(HostError::DryLengthMismatch { dry: d.len(), block: samples.len() });
            }
        }
        let Some(engine) = self.engine.as_mut() else {
            warn!("no pitch engine installed; passing block through");
            return Ok(());
        };

        self.wet.resize(samples.len(), 0.0);
        marshal::pcm_to_float(samples, &mut self.wet);
        engine.process(&mut self.wet);
        if let Some(d) = dry {
            self.dry.resize(d.len(), 0.0);
            marshal::pcm_to_float(d, &mut self.dry);
            marshal::mix_voiced(&mut self.wet, &self.dry);
        }
        marshal::float_to_pcm(&self.wet, samples);
        Ok(())
    }
}
