use serde::{Deserialize, Serialize};

use crate::utilities::analyze_dpv::DpvOptions;
use crate::utilities::errors::DpvResult;
use crate::utilities::linear_baseline::find_linear_baseline;
use crate::utilities::polynomial_baseline::{ModPolyOptions, mod_poly_baseline, polynomial_baseline};
use crate::utilities::structs::{FitResult, ScanDirection};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaselineStrategy {
    Polynomial,
    ModifiedPolynomial,
    #[default]
    LinearTangent,
}

pub fn calculate_baseline(
    potential: &[f64],
    current: &[f64],
    direction: ScanDirection,
    options: &DpvOptions,
) -> DpvResult<FitResult> {
    match options.strategy {
        BaselineStrategy::Polynomial => {
            let baseline = polynomial_baseline(
                potential,
                current,
                options.polynomial_order,
                options.iterations,
                direction,
            )?;
            Ok(FitResult::Found {
                baseline,
                windows: Vec::new(),
            })
        }
        BaselineStrategy::ModifiedPolynomial => {
            let baseline = mod_poly_baseline(
                current,
                direction,
                ModPolyOptions {
                    order: options.polynomial_order,
                    ..Default::default()
                },
            )?;
            Ok(FitResult::Found {
                baseline,
                windows: Vec::new(),
            })
        }
        BaselineStrategy::LinearTangent => {
            let oriented = direction.orient(current);
            let fit = find_linear_baseline(potential, &oriented, Some(options.linear_options()))?;
            Ok(match fit {
                FitResult::Found { baseline, windows } => FitResult::Found {
                    baseline: direction.orient(&baseline),
                    windows,
                },
                FitResult::NoPeak => FitResult::NoPeak,
            })
        }
    }
}
