//! Sample marshalling between the 16-bit PCM boundary and f32 DSP buffers.
//!
//! The two directions are deliberately asymmetric: PCM comes in over the
//! full two's-complement range (divide by 32768), but goes back out scaled
//! by 32767 so a +1.0 peak lands exactly on `i16::MAX`.

/// Convert a PCM block to floats in `[-1.0, 1.0)`.
pub fn pcm_to_float(pcm: &[i16], out: &mut [f32]) {
    debug_assert_eq!(pcm.len(), out.len());
    for (o, &s) in out.iter_mut().zip(pcm) {
        *o = f32::from(s) / 32768.0;
    }
}

/// Convert a float block back to PCM, rounding to nearest and clamping to
/// the 16-bit range.
pub fn float_to_pcm(samples: &[f32], out: &mut [i16]) {
    debug_assert_eq!(samples.len(), out.len());
    for (o, &s) in out.iter_mut().zip(samples) {
        *o = (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
    }
}

/// Blend the processed (voiced) signal with a dry signal without clipping:
/// `v + d - v*d`. For same-sign unit-range inputs the result stays in
/// range; opposing signs partially cancel.
pub fn mix_voiced(voiced: &mut [f32], dry: &[f32]) {
    debug_assert_eq!(voiced.len(), dry.len());
    for (v, &d) in voiced.iter_mut().zip(dry) {
        *v = (*v + d) - (*v * d);
    }
}

/// Fold an interleaved-as-two-slices stereo pair down to mono at half gain
/// per channel, so the sum cannot overflow.
pub fn downmix_stereo(left: &[i16], right: &[i16], out: &mut [i16]) {
    debug_assert_eq!(left.len(), right.len());
    debug_assert_eq!(left.len(), out.len());
    for (o, (&l, &r)) in out.iter_mut().zip(left.iter().zip(right)) {
        *o = l / 2 + r / 2;
    }
}
