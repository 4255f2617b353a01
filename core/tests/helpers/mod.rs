// tests/helpers/mod.rs
use dpvut::utilities::structs::Trace;

/// Get one Gaussian value at x (bell curve). `base` lifts the whole curve.
#[inline]
pub fn gaussian_value(x: f64, mu: f64, sigma: f64, amp: f64, base: f64) -> f64 {
    base + amp * (-0.5 * ((x - mu) / sigma).powi(2)).exp()
}

/// Sum of Gaussians `(mu, sigma, amp)` over `xs`, added on top of `background`.
#[allow(dead_code)]
pub fn gaussian_mixture(xs: &[f64], peaks: &[(f64, f64, f64)], background: &[f64]) -> Vec<f64> {
    xs.iter()
        .zip(background.iter())
        .map(|(&x, &b)| {
            peaks
                .iter()
                .fold(b, |y, &(mu, sigma, amp)| y + gaussian_value(x, mu, sigma, amp, 0.0))
        })
        .collect()
}

/// Make an even grid from start to end with n points (inclusive).
pub fn make_grid(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    (0..n)
        .map(|i| start + (end - start) * (i as f64) / ((n - 1) as f64))
        .collect()
}

/// Same as `make_grid`, named like NumPy for familiarity.
#[allow(dead_code)]
pub fn linspace(from: f64, to: f64, n: usize) -> Vec<f64> {
    make_grid(from, to, n)
}

/// Straight line from `from` at index 0 to `to` at index `n - 1`.
#[allow(dead_code)]
pub fn ramp(from: f64, to: f64, n: usize) -> Vec<f64> {
    make_grid(from, to, n)
}

/// Triangle of `height` centered on sample `center`, zero beyond `half_width` samples.
#[allow(dead_code)]
pub fn triangle(n: usize, center: usize, half_width: f64, height: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let d = (i as f64 - center as f64).abs();
            (height * (1.0 - d / half_width)).max(0.0)
        })
        .collect()
}

/// Upward-opening parabola `k (i - vertex)^2` over sample indices.
#[allow(dead_code)]
pub fn parabola(n: usize, vertex: f64, k: f64) -> Vec<f64> {
    (0..n).map(|i| k * (i as f64 - vertex).powi(2)).collect()
}

/// Gaussian over sample indices, handy for peaks placed at exact samples.
#[allow(dead_code)]
pub fn index_gaussian(n: usize, mu: f64, sigma: f64, amp: f64) -> Vec<f64> {
    (0..n).map(|i| gaussian_value(i as f64, mu, sigma, amp, 0.0)).collect()
}

#[allow(dead_code)]
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
}

#[allow(dead_code)]
pub fn negate(a: &[f64]) -> Vec<f64> {
    a.iter().map(|y| -y).collect()
}

/// Check two numbers are close within a simple absolute tolerance.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Build a `Trace` from potential and current vectors.
#[allow(dead_code)]
pub fn trace(potential: Vec<f64>, current: Vec<f64>) -> Trace {
    Trace { potential, current }
}

/// Two Gaussians (sigma 4 samples) at indices 60 and 140 over a parabola with
/// vertex at 100; their windows do not touch.
#[allow(dead_code)]
pub fn two_separated_peaks(amp_left: f64, amp_right: f64) -> (Vec<f64>, Vec<f64>) {
    let n = 200;
    let xs = linspace(-0.5, 0.5, n);
    let bg = parabola(n, 100.0, 1e-3);
    let ys = add(
        &add(&bg, &index_gaussian(n, 60.0, 4.0, amp_left)),
        &index_gaussian(n, 140.0, 4.0, amp_right),
    );
    (xs, ys)
}

/// Installs a test logger once; `RUST_LOG=debug` shows the fitter's trail.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
