#[inline]
pub fn index_grid(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// Largest odd window `<= w` that fits into `n` samples, never below 5.
#[inline]
pub fn odd_in_range(w: usize, n: usize) -> Option<usize> {
    if n < 5 || w < 5 {
        return None;
    }
    let w = w.min(n);
    let o = if w % 2 == 0 { w - 1 } else { w };
    if o >= 5 { Some(o) } else { None }
}

#[inline]
pub fn line_at(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let dx = x1 - x0;
    if dx == 0.0 {
        return 0.5 * (y0 + y1);
    }
    y0 + (y1 - y0) * ((x - x0) / dx)
}

#[inline]
pub fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()
}
