use std::f32::consts::TAU;

use resona::ResonatorError;
use resona::bank::{ResonatorBank, ResonatorBankVec, TASK_STRIDE};

fn chromatic(n: usize) -> Vec<f32> {
    (0..n).map(|i| 220.0 * (i as f32 / 12.0).exp2()).collect()
}

fn two_tone_mix(fs: f32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / fs;
            0.4 * (TAU * 330.0 * t).sin() + 0.3 * (TAU * 660.0 * t).sin()
        })
        .collect()
}

fn assert_each_close(seq: &[f32], other: &[f32], rel: f32, what: &str) {
    assert_eq!(seq.len(), other.len());
    for (i, (&a, &b)) in seq.iter().zip(other).enumerate() {
        let tol = rel * a.abs() + 1e-9;
        assert!((a - b).abs() <= tol, "{what} i={i} a={a:e} b={b:e}");
    }
}

#[test]
fn concurrent_frame_matches_sequential() {
    let fs = 48_000.0;
    let n = 3 * TASK_STRIDE;
    let frequencies = chromatic(n);
    let alphas = vec![0.01; n];
    let mut seq = ResonatorBank::new(&frequencies, &alphas, &alphas, fs).unwrap();
    let mut par = ResonatorBank::new(&frequencies, &alphas, &alphas, fs).unwrap();

    let frame = two_tone_mix(fs, 512);
    for _ in 0..8 {
        seq.process_frame(&frame, 1);
        par.process_frame_concurrent(&frame, 1);
    }

    let mut seq_powers = vec![0.0; n];
    let mut par_powers = vec![0.0; n];
    seq.get_powers(&mut seq_powers).unwrap();
    par.get_powers(&mut par_powers).unwrap();
    assert_each_close(&seq_powers, &par_powers, 1e-6, "power");
}

#[test]
fn split_bank_matches_resonator_bank() {
    let fs = 48_000.0;
    let n = 24;
    let frequencies = chromatic(n);
    let alphas = vec![0.015; n];
    let betas = vec![0.005; n];
    let mut scalar = ResonatorBank::new(&frequencies, &alphas, &betas, fs).unwrap();
    let mut split = ResonatorBankVec::new(&frequencies, &alphas, &betas, fs).unwrap();

    let frame = two_tone_mix(fs, 480);
    for _ in 0..16 {
        scalar.process_frame(&frame, 1);
        split.process_frame(&frame, 1);
    }

    let mut scalar_powers = vec![0.0; n];
    let mut split_powers = vec![0.0; n];
    scalar.get_powers(&mut scalar_powers).unwrap();
    split.get_powers(&mut split_powers).unwrap();
    assert_each_close(&scalar_powers, &split_powers, 1e-5, "power");

    let mut scalar_amps = vec![0.0; n];
    let mut split_amps = vec![0.0; n];
    scalar.get_amplitudes(&mut scalar_amps).unwrap();
    split.get_amplitudes(&mut split_amps).unwrap();
    assert_each_close(&scalar_amps, &split_amps, 1e-5, "amplitude");
}

#[test]
fn strided_frames_agree_across_banks() {
    let fs = 48_000.0;
    let n = 12;
    let frequencies = chromatic(n);
    let alphas = vec![0.02; n];
    let mut scalar = ResonatorBank::new(&frequencies, &alphas, &alphas, fs).unwrap();
    let mut split = ResonatorBankVec::new(&frequencies, &alphas, &alphas, fs).unwrap();

    // Interleaved stereo with junk in the right channel; both banks read
    // only the left.
    let mono = two_tone_mix(fs, 256);
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &x in &mono {
        stereo.push(x);
        stereo.push(99.0);
    }

    scalar.process_frame(&stereo, 2);
    split.process_frame(&stereo, 2);

    let mut scalar_powers = vec![0.0; n];
    let mut split_powers = vec![0.0; n];
    scalar.get_powers(&mut scalar_powers).unwrap();
    split.get_powers(&mut split_powers).unwrap();
    assert_each_close(&scalar_powers, &split_powers, 1e-5, "power");
}

#[test]
fn error_reports_agree_across_banks() {
    let fs = 48_000.0;
    let frequencies = [440.0, 880.0];
    let alphas = [0.1, 0.1];

    let expected = ResonatorError::MismatchedLengths {
        frequencies: 2,
        alphas: 2,
        betas: 1,
    };
    assert_eq!(
        ResonatorBank::new(&frequencies, &alphas, &[0.1], fs).unwrap_err(),
        expected
    );
    assert_eq!(
        ResonatorBankVec::new(&frequencies, &alphas, &[0.1], fs).unwrap_err(),
        expected
    );

    assert_eq!(
        ResonatorBank::new(&frequencies, &[2.0, 0.1], &alphas, fs).unwrap_err(),
        ResonatorError::AlphaOutOfRange
    );
    assert_eq!(
        ResonatorBankVec::new(&frequencies, &[2.0, 0.1], &alphas, fs).unwrap_err(),
        ResonatorError::AlphaOutOfRange
    );

    let mut scalar = ResonatorBank::new(&frequencies, &alphas, &alphas, fs).unwrap();
    let mut split = ResonatorBankVec::new(&frequencies, &alphas, &alphas, fs).unwrap();
    let oob = ResonatorError::IndexOutOfBounds { index: 5, len: 2 };
    assert_eq!(scalar.power_value(5).unwrap_err(), oob);
    assert_eq!(split.power_value(5).unwrap_err(), oob);

    let mut short = [0.0; 1];
    let too_small = ResonatorError::BufferTooSmall {
        required: 2,
        provided: 1,
    };
    assert_eq!(scalar.get_powers(&mut short).unwrap_err(), too_small);
    assert_eq!(split.get_powers(&mut short).unwrap_err(), too_small);

    // A rejected bulk retune leaves both banks processing with the old
    // factors.
    assert_eq!(
        scalar.set_all_alphas(1.5).unwrap_err(),
        ResonatorError::AlphaOutOfRange
    );
    assert_eq!(
        split.set_all_alphas(1.5).unwrap_err(),
        ResonatorError::AlphaOutOfRange
    );
    let frame = two_tone_mix(fs, 128);
    scalar.process_frame(&frame, 1);
    split.process_frame(&frame, 1);
    let mut scalar_powers = vec![0.0; 2];
    let mut split_powers = vec![0.0; 2];
    scalar.get_powers(&mut scalar_powers).unwrap();
    split.get_powers(&mut split_powers).unwrap();
    assert_each_close(&scalar_powers, &split_powers, 1e-5, "power");
}

#[test]
fn empty_banks_are_usable() {
    let fs = 48_000.0;
    let mut scalar = ResonatorBank::new(&[], &[], &[], fs).unwrap();
    let mut split = ResonatorBankVec::new(&[], &[], &[], fs).unwrap();
    assert!(scalar.is_empty());
    assert!(split.is_empty());

    let frame = two_tone_mix(fs, 64);
    scalar.process_frame_concurrent(&frame, 1);
    split.process_frame(&frame, 1);
    scalar.get_powers(&mut []).unwrap();
    split.get_amplitudes(&mut []).unwrap();
}
