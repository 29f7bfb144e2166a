//! End-to-end conversion scenarios for remuestra-core.
//!
//! Exercises the full streaming controller: window priming, multi-chunk
//! history carry, drain, under-run, and both run strategies.

use remuestra_core::{Quality, Resampler, Strategy, WINDOW_LEN};

/// Deterministic wideband-ish test signal within a safe amplitude.
fn signal(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f64 / 48_000.0;
            let v = (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 9000.0
                + (2.0 * std::f64::consts::PI * 1370.0 * t).sin() * 4000.0;
            v as i16
        })
        .collect()
}

#[test]
fn identity_ratio_reproduces_input_exactly() {
    let input = signal(1000);
    let mut output = vec![0i16; 1000];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(&input, None, 8000, &mut output, None, 8000, 1000);

    assert_eq!(produced, 1000);
    assert_eq!(output, input);
}

/// Window continuity: an input long enough to span several internal
/// chunks must still come back bit-exact at identity ratio, which only
/// holds if the history carried across every chunk boundary is correct.
#[test]
fn identity_survives_chunk_boundaries() {
    let len = WINDOW_LEN * 3;
    let input = signal(len);
    let mut output = vec![0i16; len];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(&input, None, 44_100, &mut output, None, 44_100, len);

    assert_eq!(produced, len);
    assert_eq!(output, input);
}

/// The 8000 -> 16000 doubling scenario: every even output is an input
/// sample, every odd output the rounded midpoint of its neighbors.
#[test]
fn doubling_interpolates_between_samples() {
    let input = signal(4000);
    let mut output = vec![0i16; 8000];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(&input, None, 8000, &mut output, None, 16_000, 8000);

    assert_eq!(produced, 8000);
    for i in 0..4000 {
        assert_eq!(output[2 * i], input[i], "even output {i}");
    }
    for i in 0..3999 {
        let mid = ((i32::from(input[i]) + i32::from(input[i + 1]) + 1) >> 1) as i16;
        assert_eq!(output[2 * i + 1], mid, "odd output {i}");
    }
}

/// Halving with integer alignment decimates exactly, across chunk
/// boundaries too.
#[test]
fn halving_keeps_every_other_sample() {
    let len = 10_000;
    let input = signal(len);
    let mut output = vec![0i16; len / 2];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(&input, None, 16_000, &mut output, None, 8000, len / 2);

    assert_eq!(produced, len / 2);
    for i in 0..len / 2 {
        assert_eq!(output[i], input[2 * i], "output {i}");
    }
}

#[test]
fn stereo_identity_keeps_channels_separate() {
    let left = signal(1000);
    let right: Vec<i16> = left.iter().map(|&s| s.wrapping_mul(-1)).collect();
    let mut out_left = vec![0i16; 1000];
    let mut out_right = vec![0i16; 1000];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(
        &left,
        Some(&right),
        22_050,
        &mut out_left,
        Some(&mut out_right),
        22_050,
        1000,
    );

    assert_eq!(produced, 1000);
    assert_eq!(out_left, left);
    assert_eq!(out_right, right);
}

/// Exhausted input is a short count, not an error.
#[test]
fn underrun_returns_short_count() {
    let input = signal(1000);
    let mut output = vec![0i16; 2000];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(&input, None, 8000, &mut output, None, 8000, 2000);

    assert_eq!(produced, 1000);
    assert_eq!(&output[..1000], &input[..]);
}

#[test]
fn request_shorter_than_available_is_honored_exactly() {
    let input = signal(4000);
    let mut output = vec![0i16; 500];

    let resampler = Resampler::new(Strategy::Linear);
    let produced = resampler.resample(&input, None, 8000, &mut output, None, 8000, 500);

    assert_eq!(produced, 500);
    assert_eq!(&output[..], &input[..500]);
}

/// DC through the filtered path comes out at unity gain once the kernel
/// has real history on both sides.
#[test]
fn filtered_upsampling_dc_unity() {
    let level = 16_000i16;
    let input = vec![level; 3000];
    let mut output = vec![0i16; 3200];

    let resampler = Resampler::new(Strategy::filtered(Quality::Standard));
    let produced = resampler.resample(&input, None, 44_100, &mut output, None, 48_000, 3200);

    assert_eq!(produced, 3200);
    // Skip the zero-history ramp-in and the zero-padded tail.
    for (i, &s) in output[200..3000].iter().enumerate() {
        assert!(
            (i32::from(s) - i32::from(level)).abs() <= 200,
            "sample {}: {s}",
            i + 200
        );
    }
}

/// A sine survives the filtered arbitrary-ratio (down-sampling) path with
/// its amplitude and phase intact: the symmetric kernel is zero-delay, so
/// the output can be compared against the ideal continuous signal.
#[test]
fn filtered_downsampling_tracks_ideal_sine() {
    let in_rate = 48_000u32;
    let out_rate = 44_100u32;
    let len = 6000;
    let amp = 12_000.0f64;
    let freq = 440.0f64;
    let input: Vec<i16> = (0..len)
        .map(|i| (amp * (2.0 * std::f64::consts::PI * freq * i as f64 / in_rate as f64).sin()) as i16)
        .collect();
    let request = 5000;
    let mut output = vec![0i16; request];

    let resampler = Resampler::new(Strategy::filtered(Quality::High));
    let produced =
        resampler.resample(&input, None, in_rate, &mut output, None, out_rate, request);

    assert_eq!(produced, request);
    for (m, &s) in output.iter().enumerate().take(4500).skip(500) {
        let t = m as f64 / out_rate as f64;
        let ideal = amp * (2.0 * std::f64::consts::PI * freq * t).sin();
        assert!(
            (f64::from(s) - ideal).abs() < amp * 0.02,
            "sample {m}: got {s}, ideal {ideal:.1}"
        );
    }
}

/// Full-scale input through the unity-gain kernel must clamp at the top
/// of the range, never wrap to the bottom.
#[test]
fn filtered_full_scale_saturates_cleanly() {
    let input = vec![i16::MAX; 3000];
    let mut output = vec![0i16; 2500];

    let resampler = Resampler::new(Strategy::filtered(Quality::Standard));
    let produced = resampler.resample(&input, None, 48_000, &mut output, None, 44_100, 2500);

    assert_eq!(produced, 2500);
    // Steady state: at or near positive full scale. A wrap would show up
    // as a large negative value here.
    for (m, &s) in output.iter().enumerate().take(2300).skip(300) {
        assert!(s > 30_000, "sample {m} fell to {s}");
    }
}

/// Filtered path across several window refills stays continuous: no
/// clicks (large sample-to-sample jumps) at chunk boundaries.
#[test]
fn filtered_multi_chunk_is_smooth() {
    let in_rate = 32_000u32;
    let out_rate = 48_000u32;
    let len = WINDOW_LEN * 2 + 1234;
    let amp = 10_000.0f64;
    let input: Vec<i16> = (0..len)
        .map(|i| (amp * (2.0 * std::f64::consts::PI * 220.0 * i as f64 / in_rate as f64).sin()) as i16)
        .collect();
    let request = len * out_rate as usize / in_rate as usize - 100;
    let mut output = vec![0i16; request];

    let resampler = Resampler::new(Strategy::filtered(Quality::Standard));
    let produced =
        resampler.resample(&input, None, in_rate, &mut output, None, out_rate, request);

    assert_eq!(produced, request);
    // 220 Hz at 48 kHz moves at most ~2% of full swing per sample; allow
    // generous slack for kernel ripple.
    let max_step = (2.0 * std::f64::consts::PI * 220.0 / out_rate as f64 * amp * 3.0) as i32;
    for pair in output[100..produced - 100].windows(2) {
        let step = (i32::from(pair[1]) - i32::from(pair[0])).abs();
        assert!(step < max_step, "discontinuity {step} (limit {max_step})");
    }
}

#[test]
fn stereo_filtered_channels_stay_phase_locked() {
    let len = 3000;
    let base = signal(len);
    let left = base.clone();
    let right = base;
    let mut out_left = vec![0i16; 3200];
    let mut out_right = vec![0i16; 3200];

    let resampler = Resampler::new(Strategy::filtered(Quality::Standard));
    let produced = resampler.resample(
        &left,
        Some(&right),
        44_100,
        &mut out_left,
        Some(&mut out_right),
        48_000,
        3200,
    );

    assert_eq!(produced, 3200);
    // Identical inputs on a shared cursor must give identical outputs.
    assert_eq!(out_left, out_right);
}
