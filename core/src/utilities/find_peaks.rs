#[derive(Clone, Copy, Debug)]
pub struct FindPeaksOptions {
    pub prominence: f64,
    pub distance: usize,
}

impl Default for FindPeaksOptions {
    fn default() -> Self {
        Self {
            prominence: 1e-9,
            distance: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalPeak {
    pub index: usize,
    pub height: f64,
    pub prominence: f64,
}

// flat tops report their middle sample; distance runs before prominence
pub fn find_peaks(ys: &[f64], options: Option<FindPeaksOptions>) -> Vec<LocalPeak> {
    let o = options.unwrap_or_default();
    let mut peaks = local_maxima(ys);
    if peaks.is_empty() {
        return Vec::new();
    }

    if o.distance > 1 && peaks.len() > 1 {
        peaks = select_by_distance(ys, &peaks, o.distance);
    }

    let mut out = Vec::with_capacity(peaks.len());
    for p in peaks {
        let prominence = peak_prominence(ys, p);
        if prominence >= o.prominence {
            out.push(LocalPeak {
                index: p,
                height: ys[p],
                prominence,
            });
        }
    }
    out
}

pub fn find_peak_general(ys: &[f64], prominence: f64, distance: usize) -> Vec<usize> {
    find_peaks(
        ys,
        Some(FindPeaksOptions {
            prominence,
            distance,
        }),
    )
    .into_iter()
    .map(|p| p.index)
    .collect()
}

fn local_maxima(ys: &[f64]) -> Vec<usize> {
    let n = ys.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }
    let mut i = 1usize;
    let i_max = n - 1;
    while i < i_max {
        if ys[i - 1] < ys[i] {
            let mut ahead = i + 1;
            while ahead < i_max && ys[ahead] == ys[i] {
                ahead += 1;
            }
            if ys[ahead] < ys[i] {
                let left = i;
                let right = ahead - 1;
                out.push((left + right) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    out
}

fn select_by_distance(ys: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let m = peaks.len();
    let mut keep = vec![true; m];
    let mut order: Vec<usize> = (0..m).collect();
    // stable: among equal heights the later peak takes priority
    order.sort_by(|&a, &b| {
        ys[peaks[a]]
            .partial_cmp(&ys[peaks[b]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < m && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

pub fn peak_prominence(ys: &[f64], peak: usize) -> f64 {
    let top = ys[peak];

    let mut left_min = top;
    let mut i = peak;
    loop {
        if ys[i] > top {
            break;
        }
        if ys[i] < left_min {
            left_min = ys[i];
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = top;
    for &y in &ys[peak..] {
        if y > top {
            break;
        }
        if y < right_min {
            right_min = y;
        }
    }

    top - left_min.max(right_min)
}
