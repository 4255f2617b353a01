use rayon::{ThreadPoolBuilder, prelude::*};
use serde::{Deserialize, Serialize};

use crate::utilities::calculate_baseline::{BaselineStrategy, calculate_baseline};
use crate::utilities::classify_scan::{ScanProtocol, classify_with};
use crate::utilities::errors::{DpvError, DpvResult};
use crate::utilities::find_peaks::find_peak_general;
use crate::utilities::get_boundaries::BoundariesOptions;
use crate::utilities::linear_baseline::{LinearBaselineOptions, OverlapPolicy, TangentMode};
use crate::utilities::scan_for_peaks::{DetectPeaksOptions, ScanPeaksOptions, scan_for_peaks};
use crate::utilities::structs::{DpvAnalysis, ScanDirection, Trace};
use crate::utilities::utilities::subtract;

pub const MIN_TRACE_LEN: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DpvOptions {
    pub strategy: BaselineStrategy,
    pub polynomial_order: usize,
    pub iterations: usize,
    pub min_peak_duration: usize,
    pub ignored_boundary_points: usize,
    pub peak_prominence_threshold: f64,
    pub final_prominence_threshold: f64,
    pub peak_distance: usize,
    pub general_peak_distance: usize,
    pub smoothing_window: usize,
    pub smoothing_polynomial: usize,
    pub tangent_mode: TangentMode,
    pub overlap_policy: OverlapPolicy,
    pub scan_protocol: ScanProtocol,
}

impl Default for DpvOptions {
    fn default() -> Self {
        Self {
            strategy: BaselineStrategy::LinearTangent,
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
            tangent_mode: TangentMode::MultiPeak,
            overlap_policy: OverlapPolicy::DropLater,
            scan_protocol: ScanProtocol::Dpv,
        }
    }
}

impl DpvOptions {
    pub fn minimum_length(&self) -> usize {
        MIN_TRACE_LEN.max(self.min_peak_duration + 2 * self.ignored_boundary_points)
    }

    pub fn detect_options(&self) -> DetectPeaksOptions {
        DetectPeaksOptions {
            window_size: self.smoothing_window,
            polynomial: self.smoothing_polynomial,
            prominence: self.peak_prominence_threshold,
            distance: self.peak_distance,
            ignored_boundary_points: self.ignored_boundary_points,
        }
    }

    pub fn boundaries_options(&self) -> BoundariesOptions {
        BoundariesOptions {
            min_peak_duration: self.min_peak_duration,
            ignored_boundary_points: self.ignored_boundary_points,
        }
    }

    pub fn linear_options(&self) -> LinearBaselineOptions {
        LinearBaselineOptions {
            detect: self.detect_options(),
            boundaries: self.boundaries_options(),
            mode: self.tangent_mode,
            overlap: self.overlap_policy,
        }
    }

    pub fn scan_options(&self) -> ScanPeaksOptions {
        ScanPeaksOptions {
            window_size: self.smoothing_window,
            polynomial: self.smoothing_polynomial,
            prominence: self.final_prominence_threshold,
            distance: self.peak_distance,
        }
    }
}

fn validate(potential: &[f64], current: &[f64], options: &DpvOptions) -> DpvResult<()> {
    if potential.len() != current.len() {
        return Err(DpvError::malformed(format!(
            "analysis: potential has {} samples but current has {}",
            potential.len(),
            current.len()
        )));
    }
    let need = options.minimum_length();
    if current.len() < need {
        return Err(DpvError::malformed(format!(
            "analysis: {} samples, need at least {need} for min_peak_duration {} and ignored_boundary_points {}",
            current.len(),
            options.min_peak_duration,
            options.ignored_boundary_points
        )));
    }
    if let Some(i) = potential
        .iter()
        .zip(current.iter())
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(DpvError::malformed(format!(
            "analysis: non-finite sample at index {i}"
        )));
    }
    Ok(())
}

/// A trace without peaks yields `baseline == current` and no peak indices.
pub fn analyze_dpv(
    potential: &[f64],
    current: &[f64],
    direction: ScanDirection,
    options: &DpvOptions,
) -> DpvResult<DpvAnalysis> {
    validate(potential, current, options)?;

    let fit = calculate_baseline(potential, current, direction, options)?;
    let windows = fit.windows().to_vec();
    let baseline = fit.into_baseline(current);
    let baseline_subtracted_current = subtract(current, &baseline);

    let oriented = direction.orient(&baseline_subtracted_current);
    let peak_indices = match options.strategy {
        BaselineStrategy::LinearTangent => find_peak_general(
            &oriented,
            options.final_prominence_threshold,
            options.general_peak_distance,
        ),
        BaselineStrategy::Polynomial | BaselineStrategy::ModifiedPolynomial => {
            scan_for_peaks(&oriented, Some(options.scan_options()))?
        }
    };

    Ok(DpvAnalysis {
        direction,
        baseline,
        baseline_subtracted_current,
        peak_indices,
        windows,
    })
}

pub fn analyze_trace(trace: &Trace, options: &DpvOptions) -> DpvResult<DpvAnalysis> {
    let direction = classify_with(options.scan_protocol, &trace.current)?;
    analyze_dpv(&trace.potential, &trace.current, direction, options)
}

/// Results keep the input order; failures carry the index of their trace.
pub fn analyze_batch(
    traces: &[Trace],
    options: &DpvOptions,
    cores: usize,
) -> Vec<DpvResult<DpvAnalysis>> {
    log::info!("analyzing {} traces on {} cores", traces.len(), cores.max(1));
    let f = |(index, trace): (usize, &Trace)| {
        analyze_trace(trace, options).map_err(|e| {
            log::warn!("trace {index} skipped: {e}");
            e.in_trace(index)
        })
    };
    if cores <= 1 || traces.len() < 2 {
        return traces.iter().enumerate().map(f).collect();
    }
    match ThreadPoolBuilder::new().num_threads(cores).build() {
        Ok(pool) => pool.install(|| traces.par_iter().enumerate().map(f).collect()),
        Err(e) => {
            log::warn!("thread pool unavailable ({e}), analyzing sequentially");
            traces.iter().enumerate().map(f).collect()
        }
    }
}
