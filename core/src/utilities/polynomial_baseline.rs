use crate::utilities::errors::DpvResult;
use crate::utilities::polyfit::polyfit;
use crate::utilities::structs::ScanDirection;
use crate::utilities::utilities::index_grid;

/// Clip-and-refit for a fixed number of rounds; the last fit is the baseline,
/// returned in the caller's frame.
pub fn polynomial_baseline(
    potential: &[f64],
    current: &[f64],
    order: usize,
    iterations: usize,
    direction: ScanDirection,
) -> DpvResult<Vec<f64>> {
    let scale = direction.scale();
    let mut working = direction.orient(current);
    let mut baseline = Vec::new();

    for _ in 0..iterations.max(1) {
        let fit = polyfit(potential, &working, order)?;
        baseline = fit.eval_all(potential);
        for (w, b) in working.iter_mut().zip(baseline.iter()) {
            if *w > *b {
                *w = *b;
            }
        }
    }

    baseline.iter_mut().for_each(|b| *b *= scale);
    Ok(baseline)
}

#[derive(Clone, Copy, Debug)]
pub struct ModPolyOptions {
    pub order: usize,
    pub max_iterations: usize,
    pub gradient: f64,
}

impl Default for ModPolyOptions {
    fn default() -> Self {
        Self {
            order: 2,
            max_iterations: 100,
            gradient: 1e-3,
        }
    }
}

pub fn mod_poly_baseline(
    current: &[f64],
    direction: ScanDirection,
    opts: ModPolyOptions,
) -> DpvResult<Vec<f64>> {
    let scale = direction.scale();
    let xs: Vec<f64> = index_grid(current.len()).iter().map(|i| i + 1.0).collect();
    let mut working = direction.orient(current);

    let mut baseline = polyfit(&xs, &working, opts.order)?.eval_all(&xs);
    let mut rounds = 1usize;
    while rounds < opts.max_iterations.max(1) {
        let mut moved = 0.0f64;
        let mut norm = 0.0f64;
        for (w, b) in working.iter_mut().zip(baseline.iter()) {
            norm += *w * *w;
            if *w > *b {
                moved += (*w - *b) * (*w - *b);
                *w = *b;
            }
        }
        if norm == 0.0 || (moved / norm).sqrt() < opts.gradient {
            break;
        }
        baseline = polyfit(&xs, &working, opts.order)?.eval_all(&xs);
        rounds += 1;
    }
    log::debug!("modified polynomial baseline settled after {rounds} rounds");

    baseline.iter_mut().for_each(|b| *b *= scale);
    Ok(baseline)
}
