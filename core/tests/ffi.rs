mod helpers;
use helpers::{add, linspace, negate, ramp, triangle};

use dpvut::{Buf, CDpvOptions, alloc, analyze_dpv, classify_scan, free_};
use serde_json::Value;

fn empty_buf() -> Buf {
    Buf {
        ptr: std::ptr::null_mut(),
        len: 0,
    }
}

fn take_json(buf: &Buf) -> Value {
    let bytes = unsafe { std::slice::from_raw_parts(buf.ptr, buf.len) };
    let v = serde_json::from_slice(bytes).unwrap();
    unsafe { free_(buf.ptr, buf.len) };
    v
}

fn defaults() -> CDpvOptions {
    CDpvOptions {
        strategy: 2,
        polynomial_order: 3,
        iterations: 100,
        min_peak_duration: 10,
        ignored_boundary_points: 5,
        peak_prominence_threshold: 1e-9,
        final_prominence_threshold: 1e-10,
        peak_distance: 5,
        general_peak_distance: 10,
        smoothing_window: 9,
        smoothing_polynomial: 5,
        tangent_mode: 0,
        overlap_policy: 0,
        scan_protocol: 0,
    }
}

// Test: null options run the defaults and the JSON carries the peak report
#[test]
fn analyze_writes_report() {
    let xs = linspace(-0.2, 0.8, 100);
    let ys = add(&ramp(0.0, 5.0, 100), &triangle(100, 50, 5.0, 10.0));
    let mut out = empty_buf();
    let rc = unsafe { analyze_dpv(xs.as_ptr(), ys.as_ptr(), 100, std::ptr::null(), &mut out) };
    assert_eq!(rc, 0);

    let v = take_json(&out);
    assert_eq!(v["direction"], 1);
    assert_eq!(v["peakIndices"], serde_json::json!([50]));
    assert_eq!(v["baseline"].as_array().unwrap().len(), 100);
    assert_eq!(v["peakPotentials"][0].as_f64().unwrap(), xs[50]);
    assert!((v["peakCurrents"][0].as_f64().unwrap() - 10.0).abs() < 0.06);
}

// Test: explicit options with out-of-range fields fall back to defaults
#[test]
fn analyze_with_options_and_reductive_trace() {
    let xs = linspace(-0.2, 0.8, 100);
    let ys = negate(&add(&ramp(0.0, 5.0, 100), &triangle(100, 50, 5.0, 10.0)));
    let mut o = defaults();
    o.iterations = -1;
    o.peak_prominence_threshold = f64::NAN;
    o.tangent_mode = 1;
    let mut out = empty_buf();
    let rc = unsafe { analyze_dpv(xs.as_ptr(), ys.as_ptr(), 100, &o, &mut out) };
    assert_eq!(rc, 0);

    let v = take_json(&out);
    assert_eq!(v["direction"], -1);
    assert_eq!(v["peakIndices"], serde_json::json!([50]));
    assert!(v["peakCurrents"][0].as_f64().unwrap() < -9.9);
}

// Test: order 0 is a valid request and fits a constant baseline
#[test]
fn polynomial_order_zero_is_honored() {
    let xs = linspace(0.0, 1.0, 30);
    let ys = ramp(0.0, 29.0, 30);
    let mut o = defaults();
    o.strategy = 0;
    o.polynomial_order = 0;
    let mut out = empty_buf();
    let rc = unsafe { analyze_dpv(xs.as_ptr(), ys.as_ptr(), 30, &o, &mut out) };
    assert_eq!(rc, 0);

    let v = take_json(&out);
    let baseline: Vec<f64> = v["baseline"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b.as_f64().unwrap())
        .collect();
    assert_eq!(baseline.len(), 30);
    assert!(baseline.iter().all(|b| (b - baseline[0]).abs() < 1e-9));
    assert!(baseline[0] < 14.5);

    // the default cubic follows the ramp exactly
    o.polynomial_order = -1;
    let rc = unsafe { analyze_dpv(xs.as_ptr(), ys.as_ptr(), 30, &o, &mut out) };
    assert_eq!(rc, 0);
    let v = take_json(&out);
    assert!((v["baseline"][29].as_f64().unwrap() - 29.0).abs() < 1e-9);
}

#[test]
fn analyze_error_codes() {
    let xs = linspace(0.0, 1.0, 10);
    let ys = vec![0.0; 10];
    let mut out = empty_buf();
    let rc = unsafe {
        analyze_dpv(
            std::ptr::null(),
            ys.as_ptr(),
            10,
            std::ptr::null(),
            &mut out,
        )
    };
    assert_eq!(rc, 1);

    // too short for the default windows
    let rc = unsafe { analyze_dpv(xs.as_ptr(), ys.as_ptr(), 10, std::ptr::null(), &mut out) };
    assert_eq!(rc, 1);

    let xs = linspace(0.0, 1.0, 30);
    let ys = vec![1.0; 30];
    let mut o = defaults();
    o.strategy = 0;
    o.polynomial_order = 40;
    let rc = unsafe { analyze_dpv(xs.as_ptr(), ys.as_ptr(), 30, &o, &mut out) };
    assert_eq!(rc, 3);
}

#[test]
fn classify_scan_codes() {
    let pos = [1.0, 2.0, -1.0];
    let neg = [-1.0, -2.0, 1.0];
    assert_eq!(unsafe { classify_scan(pos.as_ptr(), 3) }, 1);
    assert_eq!(unsafe { classify_scan(neg.as_ptr(), 3) }, -1);
    assert_eq!(unsafe { classify_scan(std::ptr::null(), 3) }, 0);
    let bad = [1.0, f64::NAN];
    assert_eq!(unsafe { classify_scan(bad.as_ptr(), 2) }, 0);
}

#[test]
fn alloc_and_free_roundtrip() {
    unsafe {
        assert!(alloc(0).is_null());
        let p = alloc(64);
        assert!(!p.is_null());
        free_(p, 64);
    }
}
