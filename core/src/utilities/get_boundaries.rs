use crate::utilities::structs::{BoundaryPair, PeakWindow};
use crate::utilities::utilities::line_at;

// a span of w samples tolerates fewer than w / WRONG_SIDE_DIVISOR points below its line
const WRONG_SIDE_DIVISOR: usize = 15;
const BUCKET_DIVISOR: usize = 10;
const ON_LINE_TOLERANCE: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
pub struct BoundariesOptions {
    pub min_peak_duration: usize,
    pub ignored_boundary_points: usize,
}

impl Default for BoundariesOptions {
    fn default() -> Self {
        Self {
            min_peak_duration: 10,
            ignored_boundary_points: 5,
        }
    }
}

/// Pairs straddling `peak` are scored by the samples of `[left, right)` below
/// their chord. The lowest non-empty score bucket wins, and inside it the
/// widest span (first found on ties).
pub fn get_boundaries(
    potential: &[f64],
    current: &[f64],
    peak: usize,
    options: Option<BoundariesOptions>,
) -> Option<PeakWindow> {
    let o = options.unwrap_or_default();
    let n = current.len();
    let lo = o.ignored_boundary_points;
    let hi = n.saturating_sub(o.ignored_boundary_points);
    if n != potential.len() || peak < lo + 2 || peak + 2 >= hi {
        return None;
    }

    let mut buckets: Vec<Vec<BoundaryPair>> = vec![Vec::new(); (n / BUCKET_DIVISOR).max(1)];
    let mut best = buckets.len();

    for right in (peak + 2)..hi {
        for left in (lo..=(peak - 2)).rev() {
            let span = right - left;
            if span < o.min_peak_duration {
                continue;
            }
            let budget = (span / WRONG_SIDE_DIVISOR).min(best + 1);
            if budget == 0 {
                continue;
            }
            if let Some(score) = count_wrong_side(potential, current, left, right, budget) {
                if score < buckets.len() {
                    buckets[score].push(BoundaryPair { left, right });
                    best = best.min(score);
                }
            }
        }
    }

    buckets
        .iter()
        .enumerate()
        .find(|(_, pairs)| !pairs.is_empty())
        .and_then(|(score, pairs)| {
            let mut widest: Option<BoundaryPair> = None;
            for &p in pairs {
                if widest.is_none_or(|w| p.width() > w.width()) {
                    widest = Some(p);
                }
            }
            widest.map(|bounds| PeakWindow {
                peak,
                bounds,
                wrong_side: score,
            })
        })
}

fn count_wrong_side(
    potential: &[f64],
    current: &[f64],
    left: usize,
    right: usize,
    budget: usize,
) -> Option<usize> {
    let (x0, y0) = (potential[left], current[left]);
    let (x1, y1) = (potential[right], current[right]);
    let mut count = 0usize;
    for i in left..right {
        let line = line_at(x0, y0, x1, y1, potential[i]);
        let y = current[i];
        if line - y > ON_LINE_TOLERANCE * (1.0 + line.abs().max(y.abs())) {
            count += 1;
            if count >= budget {
                return None;
            }
        }
    }
    Some(count)
}
