use crate::utilities::errors::{DpvError, DpvResult};

#[derive(Clone, Copy, Debug)]
pub struct SggOptions {
    pub window_size: usize,
    pub derivative: usize,
    pub polynomial: usize,
}

impl Default for SggOptions {
    fn default() -> Self {
        Self {
            window_size: 9,
            derivative: 0,
            polynomial: 3,
        }
    }
}

pub fn sgg(ys: &[f64], xs: &[f64], opts: SggOptions) -> DpvResult<Vec<f64>> {
    let window_size = opts.window_size;
    let derivative = opts.derivative;
    let polynomial = opts.polynomial;

    if window_size % 2 == 0 || window_size < 5 {
        return Err(DpvError::malformed(format!(
            "smoothing: window size {window_size} must be odd and at least 5"
        )));
    }
    if ys.is_empty() || xs.len() != ys.len() {
        return Err(DpvError::malformed(format!(
            "smoothing: {} x values for {} y values",
            xs.len(),
            ys.len()
        )));
    }
    if window_size > ys.len() {
        return Err(DpvError::malformed(format!(
            "smoothing: window size is higher than the data length {}>{}",
            window_size,
            ys.len()
        )));
    }
    if polynomial < 1 || polynomial >= window_size {
        return Err(DpvError::malformed(format!(
            "smoothing: polynomial {polynomial} must be in 1..{window_size}"
        )));
    }
    if polynomial >= 6 {
        log::warn!(
            "smoothing polynomial {polynomial} > 5 may oscillate unless the data arises from such a model"
        );
    }

    let half = window_size / 2;
    let n = ys.len();

    let hs = get_hs(xs, half, derivative);
    let weights = full_weights(window_size, polynomial, derivative);

    let mut ans = vec![0.0f64; n];

    for i in 0..half {
        let wl = &weights[half - i - 1];
        let wr = &weights[half + i + 1];

        let mut dl = 0.0f64;
        let mut dr = 0.0f64;

        for l in 0..window_size {
            dl += wl[l] * ys[l];
            dr += wr[l] * ys[n - window_size + l];
        }

        let idx_l = half - i - 1;
        let idx_r = n - half + i;

        ans[idx_l] = dl / hs[idx_l];
        ans[idx_r] = dr / hs[idx_r];
    }

    let wc = &weights[half];
    for i in window_size..=n {
        let d: f64 = (0..window_size)
            .map(|l| wc[l] * ys[l + i - window_size])
            .sum();
        let idx = i - half - 1;
        ans[idx] = d / hs[idx];
    }

    Ok(ans)
}

fn get_hs(xs: &[f64], half: usize, derivative: usize) -> Vec<f64> {
    let n = xs.len();
    if derivative == 0 || n < 2 {
        return vec![1.0f64; n];
    }

    let mut pref = vec![0.0f64; n];
    for i in 0..(n - 1) {
        pref[i + 1] = pref[i] + (xs[i + 1] - xs[i]);
    }

    let mut hs = vec![1.0f64; n];
    for c in 0..n {
        let start = c.saturating_sub(half);
        let end_excl = (c + half).min(n - 1);
        let count = end_excl.saturating_sub(start);
        let avg = if count > 0 {
            (pref[end_excl] - pref[start]) / (count as f64)
        } else {
            1.0
        };
        hs[c] = if avg == 0.0 {
            1.0
        } else {
            avg.powi(derivative as i32)
        };
    }
    hs
}

fn full_weights(m: usize, n: usize, s: usize) -> Vec<Vec<f64>> {
    let half = (m / 2) as i32;
    let n_i = n as i32;
    let s_i = s as i32;

    let gi: Vec<Vec<f64>> = (0..m)
        .map(|idx| {
            let tbl = gram_table(idx as i32 - half, half, n_i, 0);
            (0..=n).map(|k| tbl[k][0]).collect()
        })
        .collect();

    let gt: Vec<Vec<f64>> = (0..m)
        .map(|idx| {
            let tbl = gram_table(idx as i32 - half, half, n_i, s_i);
            (0..=n).map(|k| tbl[k][s]).collect()
        })
        .collect();

    let two_m = 2 * half;
    let coef: Vec<f64> = (0..=n_i)
        .map(|k| {
            let num = gen_fact(two_m, k);
            let den = gen_fact(two_m + k + 1, k + 1);
            (2 * k + 1) as f64 * (num / den)
        })
        .collect();

    let mut w = vec![vec![0.0f64; m]; m];
    for t_idx in 0..m {
        for j_idx in 0..m {
            w[t_idx][j_idx] = (0..=n)
                .map(|k| coef[k] * gi[j_idx][k] * gt[t_idx][k])
                .sum();
        }
    }
    w
}

fn gram_table(i: i32, m: i32, n_max: i32, s_max: i32) -> Vec<Vec<f64>> {
    let nm = (n_max as usize) + 1;
    let sm = (s_max as usize) + 1;
    let mut g = vec![vec![0.0f64; sm]; nm];
    g[0][0] = 1.0;

    for k in 1..=n_max {
        let kf = k as f64;
        let denom = kf * (2 * m - k + 1) as f64;
        let a = (4 * k - 2) as f64 / denom;
        let b = ((k - 1) as f64 * (2 * m + k) as f64) / denom;

        for s in 0..=s_max {
            let su = s as usize;
            let prev = (k - 1) as usize;
            let term1 = (i as f64) * g[prev][su];
            let term2 = if s > 0 {
                (s as f64) * g[prev][su - 1]
            } else {
                0.0
            };
            let term3 = if k >= 2 { g[(k - 2) as usize][su] } else { 0.0 };
            g[k as usize][su] = a * (term1 + term2) - b * term3;
        }
    }
    g
}

fn gen_fact(a: i32, b: i32) -> f64 {
    if a >= b {
        ((a - b + 1)..=a).map(|j| j as f64).product()
    } else {
        1.0
    }
}
