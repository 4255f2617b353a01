use core::ffi::c_int;
use serde_json::json;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    ptr, slice,
};

pub mod utilities;
use utilities::{
    analyze_dpv::{DpvOptions, analyze_trace},
    calculate_baseline::BaselineStrategy,
    classify_scan::{ScanProtocol, classify_scan as classify_scan_rs},
    errors::DpvError,
    linear_baseline::{OverlapPolicy, TangentMode},
    structs::{ScanDirection, Trace},
};

const OK: c_int = 0;
const ERR_INVALID_ARGS: c_int = 1;
const ERR_PANIC: c_int = 2;
const ERR_FIT: c_int = 3;
const ERR_SERIALIZE: c_int = 4;

#[repr(C)]
pub struct Buf {
    pub ptr: *mut u8,
    pub len: usize,
}

/// Host-side mirror of `DpvOptions`; out-of-range fields fall back to the defaults.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CDpvOptions {
    // 0 polynomial, 1 modified polynomial, else linear tangent
    pub strategy: c_int,
    pub polynomial_order: c_int,
    pub iterations: c_int,
    pub min_peak_duration: c_int,
    pub ignored_boundary_points: c_int,
    pub peak_prominence_threshold: f64,
    pub final_prominence_threshold: f64,
    pub peak_distance: c_int,
    pub general_peak_distance: c_int,
    pub smoothing_window: c_int,
    pub smoothing_polynomial: c_int,
    pub tangent_mode: c_int,
    /// 0 drop later, 1 prefer better fit, 2 merge.
    pub overlap_policy: c_int,
    pub scan_protocol: c_int,
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return core::ptr::null_mut();
    }
    let mut v = Vec::<u8>::with_capacity(size);
    let p = v.as_mut_ptr();
    core::mem::forget(v);
    p
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_(ptr_raw: *mut u8, size: usize) {
    if !ptr_raw.is_null() {
        let _ = unsafe { Vec::<u8>::from_raw_parts(ptr_raw, size, size) };
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyze_dpv(
    x_ptr: *const f64,
    y_ptr: *const f64,
    len: usize,
    options: *const CDpvOptions,
    out_json: *mut Buf,
) -> c_int {
    if x_ptr.is_null() || y_ptr.is_null() || out_json.is_null() || len == 0 {
        return ERR_INVALID_ARGS;
    }
    let run = || -> Result<(), c_int> {
        let xs = unsafe { slice::from_raw_parts(x_ptr, len) };
        let ys = unsafe { slice::from_raw_parts(y_ptr, len) };
        let trace = Trace::new(xs.to_vec(), ys.to_vec()).map_err(error_code)?;
        let opts = build_dpv_options(options);
        let analysis = analyze_trace(&trace, &opts).map_err(error_code)?;

        let direction = match analysis.direction {
            ScanDirection::Oxidative => 1,
            ScanDirection::Reductive => -1,
        };
        let s = json!({
            "direction": direction,
            "baseline": analysis.baseline,
            "baselineSubtractedCurrent": analysis.baseline_subtracted_current,
            "peakIndices": analysis.peak_indices,
            "peakPotentials": analysis.peak_potentials(&trace.potential),
            "peakCurrents": analysis.peak_currents(),
        });
        let s = serde_json::to_string(&s).map_err(|_| ERR_SERIALIZE)?;
        write_buf(out_json, s.into_bytes().into_boxed_slice());
        Ok(())
    };
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

/// `1` oxidative, `-1` reductive, `0` for invalid arguments.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn classify_scan(y_ptr: *const f64, len: usize) -> c_int {
    if y_ptr.is_null() || len == 0 {
        return 0;
    }
    let compute = || {
        let ys = unsafe { slice::from_raw_parts(y_ptr, len) };
        if ys.iter().any(|y| !y.is_finite()) {
            return 0;
        }
        match classify_scan_rs(ys) {
            ScanDirection::Oxidative => 1,
            ScanDirection::Reductive => -1,
        }
    };
    catch_unwind(AssertUnwindSafe(compute)).unwrap_or(0)
}

fn error_code(e: DpvError) -> c_int {
    log::warn!("analyze_dpv: {e}");
    match e {
        DpvError::MalformedInput(_) => ERR_INVALID_ARGS,
        DpvError::Fitting(_) => ERR_FIT,
        DpvError::Trace { source, .. } => error_code(*source),
    }
}

fn write_buf(out: *mut Buf, bytes: Box<[u8]>) {
    let len = bytes.len();
    let ptr_bytes = Box::into_raw(bytes) as *mut u8;
    unsafe {
        ptr::write_unaligned(
            out,
            Buf {
                ptr: ptr_bytes,
                len,
            },
        )
    };
}

#[inline]
fn pos_usize(raw: c_int, def_: usize) -> usize {
    if raw > 0 { raw as usize } else { def_ }
}

#[inline]
fn non_neg_usize(raw: c_int, def_: usize) -> usize {
    if raw >= 0 { raw as usize } else { def_ }
}

#[inline]
fn pos_f64(raw: f64, def_: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 { raw } else { def_ }
}

#[inline]
fn odd_at_least(v: usize, min_: usize) -> usize {
    let v = v.max(min_);
    if v % 2 == 0 { v | 1 } else { v }
}

fn build_dpv_options(options: *const CDpvOptions) -> DpvOptions {
    let d = DpvOptions::default();
    if options.is_null() {
        return d;
    }
    let o = unsafe { *options };
    let strategy = match o.strategy {
        0 => BaselineStrategy::Polynomial,
        1 => BaselineStrategy::ModifiedPolynomial,
        _ => BaselineStrategy::LinearTangent,
    };
    let tangent_mode = match o.tangent_mode {
        1 => TangentMode::SinglePeak,
        _ => TangentMode::MultiPeak,
    };
    let overlap_policy = match o.overlap_policy {
        1 => OverlapPolicy::PreferBetterFit,
        2 => OverlapPolicy::Merge,
        _ => OverlapPolicy::DropLater,
    };
    let scan_protocol = match o.scan_protocol {
        1 => ScanProtocol::Cyclic,
        _ => ScanProtocol::Dpv,
    };
    DpvOptions {
        strategy,
        polynomial_order: non_neg_usize(o.polynomial_order, d.polynomial_order),
        iterations: pos_usize(o.iterations, d.iterations),
        min_peak_duration: pos_usize(o.min_peak_duration, d.min_peak_duration),
        ignored_boundary_points: non_neg_usize(o.ignored_boundary_points, d.ignored_boundary_points),
        peak_prominence_threshold: pos_f64(o.peak_prominence_threshold, d.peak_prominence_threshold),
        final_prominence_threshold: pos_f64(
            o.final_prominence_threshold,
            d.final_prominence_threshold,
        ),
        peak_distance: pos_usize(o.peak_distance, d.peak_distance),
        general_peak_distance: pos_usize(o.general_peak_distance, d.general_peak_distance),
        smoothing_window: odd_at_least(pos_usize(o.smoothing_window, d.smoothing_window), 5),
        smoothing_polynomial: pos_usize(o.smoothing_polynomial, d.smoothing_polynomial),
        tangent_mode,
        overlap_policy,
        scan_protocol,
    }
}
