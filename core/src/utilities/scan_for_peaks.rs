use std::collections::BTreeMap;

use crate::utilities::errors::DpvResult;
use crate::utilities::find_peaks::{FindPeaksOptions, find_peaks, peak_prominence};
use crate::utilities::sgg::{SggOptions, sgg};
use crate::utilities::structs::{PeakCandidate, PeakSource};
use crate::utilities::utilities::{index_grid, odd_in_range};

#[derive(Clone, Copy, Debug)]
pub struct DetectPeaksOptions {
    pub window_size: usize,
    pub polynomial: usize,
    pub prominence: f64,
    pub distance: usize,
    pub ignored_boundary_points: usize,
}

impl Default for DetectPeaksOptions {
    fn default() -> Self {
        Self {
            window_size: 9,
            polynomial: 5,
            prominence: 1e-9,
            distance: 5,
            ignored_boundary_points: 5,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ScanPeaksOptions {
    pub window_size: usize,
    pub polynomial: usize,
    pub prominence: f64,
    pub distance: usize,
}

impl Default for ScanPeaksOptions {
    fn default() -> Self {
        Self {
            window_size: 9,
            polynomial: 5,
            prominence: 1e-10,
            distance: 5,
        }
    }
}

// too short for the smallest window: raw signal and forward differences
fn smooth_and_differentiate(
    ys: &[f64],
    window_size: usize,
    polynomial: usize,
) -> DpvResult<(Vec<f64>, Vec<f64>)> {
    let n = ys.len();
    let Some(ws) = odd_in_range(window_size, n) else {
        let mut dy: Vec<f64> = ys.windows(2).map(|w| w[1] - w[0]).collect();
        dy.push(0.0);
        return Ok((ys.to_vec(), dy));
    };
    let polynomial = polynomial.clamp(1, ws - 2);
    let xs = index_grid(n);
    let smooth = sgg(
        ys,
        &xs,
        SggOptions {
            window_size: ws,
            derivative: 0,
            polynomial,
        },
    )?;
    let dy = sgg(
        ys,
        &xs,
        SggOptions {
            window_size: ws,
            derivative: 1,
            polynomial,
        },
    )?;
    Ok((smooth, dy))
}

/// Maxima of the smoothed signal and of its first derivative, merged by index
/// with signal hits winning. Peaks point up.
pub fn detect_peaks(
    potential: &[f64],
    current: &[f64],
    options: Option<DetectPeaksOptions>,
) -> DpvResult<Vec<PeakCandidate>> {
    let o = options.unwrap_or_default();
    let n = current.len();
    if n < 3 || potential.len() != n {
        return Ok(Vec::new());
    }

    let (smooth, dy) = smooth_and_differentiate(current, o.window_size, o.polynomial)?;
    let fp = FindPeaksOptions {
        prominence: o.prominence,
        distance: o.distance,
    };

    let mut merged: BTreeMap<usize, (f64, PeakSource)> = BTreeMap::new();
    for p in find_peaks(&smooth, Some(fp)) {
        merged.insert(p.index, (p.prominence, PeakSource::Signal));
    }
    for p in find_peaks(&dy, Some(fp)) {
        merged
            .entry(p.index)
            .or_insert((p.prominence, PeakSource::Derivative));
    }

    let lo = o.ignored_boundary_points;
    let hi = n.saturating_sub(o.ignored_boundary_points);
    Ok(merged
        .into_iter()
        .filter(|&(i, _)| i >= lo && i < hi)
        .map(|(index, (prominence, source))| PeakCandidate {
            index,
            potential: potential[index],
            current: current[index],
            prominence,
            source,
        })
        .collect())
}

pub fn scan_for_peaks(ys: &[f64], options: Option<ScanPeaksOptions>) -> DpvResult<Vec<usize>> {
    let o = options.unwrap_or_default();
    let n = ys.len();
    if n < 3 {
        return Ok(Vec::new());
    }
    let (smooth, dy) = smooth_and_differentiate(ys, o.window_size, o.polynomial)?;

    let mut out: Vec<usize> = Vec::new();
    for k in 0..(n - 1) {
        let (a, b) = (dy[k], dy[k + 1]);
        let turns = (a > 0.0 && b <= 0.0) || (a >= 0.0 && b < 0.0);
        if !turns {
            continue;
        }
        let i = if smooth[k + 1] > smooth[k] { k + 1 } else { k };
        if i == 0 || i == n - 1 || peak_prominence(&smooth, i) < o.prominence {
            continue;
        }
        match out.last_mut() {
            Some(last) if i - *last < o.distance.max(1) => {
                if smooth[i] > smooth[*last] {
                    *last = i;
                }
            }
            _ => out.push(i),
        }
    }
    Ok(out)
}
