use resona::frequencies::closest_frequency;
use resona::phase::wrap_angle_diff;
use resona::phasor::Phasor;

#[test]
fn long_run_magnitude_stays_bounded() {
    let fs = 44_100.0;
    for f in [55.0, 441.0, 1000.0, 7040.0] {
        let mut phasor = Phasor::new(f, fs);
        // Two seconds of audio, measuring the drift each window accumulates
        // before the correction runs.
        for window in 0..20 {
            for _ in 0..4096 {
                phasor.increment_phase();
            }
            let (zc, zs) = phasor.z();
            let drift = (zc * zc + zs * zs - 1.0).abs();
            assert!(drift < 1e-3, "f={f} window={window} drift={drift:e}");
            phasor.stabilize();
        }
    }
}

#[test]
fn whole_sample_period_returns_to_start() {
    let fs = 44_100.0;
    let f = closest_frequency(440.0, fs);
    assert_eq!(f, 441.0);

    // 441 Hz at 44.1 kHz is exactly 100 samples per cycle.
    let mut phasor = Phasor::new(f, fs);
    for _ in 0..100 {
        phasor.increment_phase();
    }
    let (zc, zs) = phasor.z();
    assert!((zc - 1.0).abs() < 1e-4, "zc={zc}");
    assert!(zs.abs() < 1e-4, "zs={zs}");
}

#[test]
fn retune_keeps_phase_and_changes_rate() {
    let fs = 48_000.0;
    let mut phasor = Phasor::new(500.0, fs);
    for _ in 0..1000 {
        phasor.increment_phase();
    }
    let before = phasor.z();

    phasor.set_frequency(750.0);
    assert_eq!(phasor.z(), before);

    // Sixteen steps at 750 Hz advance exactly a quarter turn.
    for _ in 0..16 {
        phasor.increment_phase();
    }
    let after = phasor.z();
    let swept = wrap_angle_diff(after.1.atan2(after.0) - before.1.atan2(before.0));
    let expected = std::f32::consts::FRAC_PI_2;
    assert!(
        (swept - expected).abs() < 1e-3,
        "swept={swept} expected={expected}"
    );
}
