use nalgebra::{DMatrix, DVector};

use crate::utilities::errors::{DpvError, DpvResult};

// coefficients are over t = (x - center) / half_range
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
    center: f64,
    half_range: f64,
}

impl Polynomial {
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.half_range;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }

    pub fn eval_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

pub fn polyfit(xs: &[f64], ys: &[f64], order: usize) -> DpvResult<Polynomial> {
    let n = xs.len();
    if n != ys.len() {
        return Err(DpvError::malformed(format!(
            "polyfit: {} x values for {} y values",
            n,
            ys.len()
        )));
    }
    if order >= n {
        return Err(DpvError::fitting(format!(
            "polyfit: order {order} needs more than {order} points, got {n}"
        )));
    }

    let (lo, hi) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let center = 0.5 * (lo + hi);
    let half_range = if hi > lo { 0.5 * (hi - lo) } else { 1.0 };

    let mut vandermonde = DMatrix::<f64>::zeros(n, order + 1);
    for (i, &x) in xs.iter().enumerate() {
        let t = (x - center) / half_range;
        let mut p = 1.0;
        for j in 0..=order {
            vandermonde[(i, j)] = p;
            p *= t;
        }
    }

    let at = vandermonde.transpose();
    let ata = &at * &vandermonde;
    let rhs = &at * DVector::from_column_slice(ys);
    let singular = || {
        DpvError::fitting(format!(
            "polyfit: singular normal equations for order {order} over {n} points"
        ))
    };
    let solution = ata.lu().solve(&rhs).ok_or_else(singular)?;
    if solution.iter().any(|c| !c.is_finite()) {
        return Err(singular());
    }

    Ok(Polynomial {
        coefficients: solution.iter().copied().collect(),
        center,
        half_range,
    })
}
