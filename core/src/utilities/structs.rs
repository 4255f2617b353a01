use serde::{Deserialize, Serialize};

use crate::utilities::errors::{DpvError, DpvResult};
use crate::utilities::sgg::{SggOptions, sgg};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub potential: Vec<f64>,
    pub current: Vec<f64>,
}

impl Trace {
    pub fn new(potential: Vec<f64>, current: Vec<f64>) -> DpvResult<Self> {
        if potential.len() != current.len() {
            return Err(DpvError::malformed(format!(
                "trace: potential has {} samples but current has {}",
                potential.len(),
                current.len()
            )));
        }
        if let Some(i) = potential
            .iter()
            .zip(current.iter())
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(DpvError::malformed(format!(
                "trace: non-finite sample at index {i}"
            )));
        }
        Ok(Self { potential, current })
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Keeps the samples whose potential lies inside `[min, max]`; a missing bound is open.
    pub fn crop(&self, min: Option<f64>, max: Option<f64>) -> Trace {
        let lo = min.unwrap_or(f64::NEG_INFINITY);
        let hi = max.unwrap_or(f64::INFINITY);
        let mut potential = Vec::with_capacity(self.len());
        let mut current = Vec::with_capacity(self.len());
        for (&x, &y) in self.potential.iter().zip(self.current.iter()) {
            if lo <= x && x <= hi {
                potential.push(x);
                current.push(y);
            }
        }
        Trace { potential, current }
    }

    pub fn scaled(&self, factor: f64) -> Trace {
        Trace {
            potential: self.potential.clone(),
            current: self.current.iter().map(|y| y * factor).collect(),
        }
    }

    pub fn smoothed(&self, window_size: usize, polynomial: usize) -> DpvResult<Trace> {
        let current = sgg(
            &self.current,
            &self.potential,
            SggOptions {
                window_size,
                derivative: 0,
                polynomial,
            },
        )?;
        Ok(Trace {
            potential: self.potential.clone(),
            current,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanDirection {
    Oxidative,
    Reductive,
}

impl ScanDirection {
    /// Sign that turns the analyte peak into a local maximum.
    #[inline]
    pub fn scale(self) -> f64 {
        match self {
            ScanDirection::Oxidative => 1.0,
            ScanDirection::Reductive => -1.0,
        }
    }

    pub fn orient(self, ys: &[f64]) -> Vec<f64> {
        let s = self.scale();
        ys.iter().map(|y| s * y).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakSource {
    Signal,
    Derivative,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PeakCandidate {
    pub index: usize,
    pub potential: f64,
    pub current: f64,
    pub prominence: f64,
    pub source: PeakSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryPair {
    pub left: usize,
    pub right: usize,
}

impl BoundaryPair {
    #[inline]
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PeakWindow {
    pub peak: usize,
    pub bounds: BoundaryPair,
    pub wrong_side: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FitResult {
    Found {
        baseline: Vec<f64>,
        windows: Vec<BoundaryPair>,
    },
    NoPeak,
}

impl FitResult {
    pub fn is_no_peak(&self) -> bool {
        matches!(self, FitResult::NoPeak)
    }

    /// `NoPeak` resolves to the signal itself, i.e. nothing is subtracted.
    pub fn into_baseline(self, current: &[f64]) -> Vec<f64> {
        match self {
            FitResult::Found { baseline, .. } => baseline,
            FitResult::NoPeak => current.to_vec(),
        }
    }

    pub fn windows(&self) -> &[BoundaryPair] {
        match self {
            FitResult::Found { windows, .. } => windows,
            FitResult::NoPeak => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DpvAnalysis {
    pub direction: ScanDirection,
    pub baseline: Vec<f64>,
    pub baseline_subtracted_current: Vec<f64>,
    pub peak_indices: Vec<usize>,
    pub windows: Vec<BoundaryPair>,
}

impl DpvAnalysis {
    pub fn peak_potentials(&self, potential: &[f64]) -> Vec<f64> {
        self.peak_indices
            .iter()
            .filter_map(|&i| potential.get(i).copied())
            .collect()
    }

    pub fn peak_currents(&self) -> Vec<f64> {
        self.peak_indices
            .iter()
            .filter_map(|&i| self.baseline_subtracted_current.get(i).copied())
            .collect()
    }

    pub fn best_peak(&self) -> Option<usize> {
        let s = self.direction.scale();
        let mut best: Option<(usize, f64)> = None;
        for &i in &self.peak_indices {
            let v = s * self.baseline_subtracted_current[i];
            match best {
                Some((_, bv)) if bv >= v => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }
}
