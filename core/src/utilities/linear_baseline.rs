use serde::{Deserialize, Serialize};

use crate::utilities::errors::DpvResult;
use crate::utilities::get_boundaries::{BoundariesOptions, get_boundaries};
use crate::utilities::scan_for_peaks::{DetectPeaksOptions, detect_peaks};
use crate::utilities::structs::{BoundaryPair, FitResult, PeakCandidate, PeakSource, PeakWindow};
use crate::utilities::utilities::line_at;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TangentMode {
    #[default]
    MultiPeak,
    SinglePeak,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlapPolicy {
    #[default]
    DropLater,
    // fewer wrong-side samples wins, the earlier window on ties
    PreferBetterFit,
    Merge,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LinearBaselineOptions {
    pub detect: DetectPeaksOptions,
    pub boundaries: BoundariesOptions,
    pub mode: TangentMode,
    pub overlap: OverlapPolicy,
}

pub fn find_linear_baseline(
    potential: &[f64],
    current: &[f64],
    options: Option<LinearBaselineOptions>,
) -> DpvResult<FitResult> {
    let o = options.unwrap_or_default();

    let mut candidates = detect_peaks(potential, current, Some(o.detect))?;
    if candidates.is_empty() {
        log::debug!("no peak found in data");
        return Ok(FitResult::NoPeak);
    }
    if o.mode == TangentMode::SinglePeak {
        candidates = most_prominent(&candidates).into_iter().collect();
    }
    log::debug!(
        "initial peak indices: {:?}",
        candidates.iter().map(|c| c.index).collect::<Vec<_>>()
    );

    let windows: Vec<PeakWindow> = candidates
        .iter()
        .filter_map(|c| get_boundaries(potential, current, c.index, Some(o.boundaries)))
        .collect();
    if windows.is_empty() {
        log::debug!("no baseline window found for any peak");
        return Ok(FitResult::NoPeak);
    }

    let kept = resolve_overlaps(windows, o.overlap);
    log::debug!("peak windows: {kept:?}");

    let bounds: Vec<BoundaryPair> = kept.iter().map(|w| w.bounds).collect();
    let baseline = assemble_baseline(potential, current, &bounds);
    Ok(FitResult::Found {
        baseline,
        windows: bounds,
    })
}

fn most_prominent(candidates: &[PeakCandidate]) -> Option<PeakCandidate> {
    let pick = |source: PeakSource| {
        candidates
            .iter()
            .filter(|c| c.source == source)
            .fold(None::<PeakCandidate>, |best, c| match best {
                Some(b) if b.prominence >= c.prominence => Some(b),
                _ => Some(*c),
            })
    };
    pick(PeakSource::Signal).or_else(|| pick(PeakSource::Derivative))
}

/// Sorts windows by left edge and walks them once, resolving every window
/// whose left edge is at or before the kept window's right edge.
pub fn resolve_overlaps(mut windows: Vec<PeakWindow>, policy: OverlapPolicy) -> Vec<PeakWindow> {
    windows.sort_by_key(|w| (w.bounds.left, w.bounds.right));

    let mut kept: Vec<PeakWindow> = Vec::with_capacity(windows.len());
    for w in windows {
        let Some(last) = kept.last_mut() else {
            kept.push(w);
            continue;
        };
        if w.bounds.left > last.bounds.right {
            kept.push(w);
            continue;
        }
        match policy {
            OverlapPolicy::DropLater => {}
            OverlapPolicy::PreferBetterFit => {
                if w.wrong_side < last.wrong_side {
                    *last = w;
                }
            }
            OverlapPolicy::Merge => {
                last.bounds.right = last.bounds.right.max(w.bounds.right);
                last.wrong_side = last.wrong_side.max(w.wrong_side);
            }
        }
    }
    kept
}

// windows must be sorted and disjoint
pub fn assemble_baseline(potential: &[f64], current: &[f64], windows: &[BoundaryPair]) -> Vec<f64> {
    let mut baseline = current.to_vec();
    for w in windows {
        let (x0, y0) = (potential[w.left], current[w.left]);
        let (x1, y1) = (potential[w.right], current[w.right]);
        for i in w.left..=w.right {
            baseline[i] = line_at(x0, y0, x1, y1, potential[i]);
        }
    }
    baseline
}
