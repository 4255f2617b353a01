use serde::{Deserialize, Serialize};

use crate::utilities::errors::DpvResult;
use crate::utilities::sgg::{SggOptions, sgg};
use crate::utilities::structs::ScanDirection;
use crate::utilities::utilities::{index_grid, odd_in_range};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanProtocol {
    #[default]
    Dpv,
    Cyclic,
}

// strict majority of negative samples is reductive
pub fn classify_scan(current: &[f64]) -> ScanDirection {
    let negatives = current.iter().filter(|&&y| y < 0.0).count();
    if 2 * negatives > current.len() {
        ScanDirection::Reductive
    } else {
        ScanDirection::Oxidative
    }
}

/// Cyclic-voltammetry classifier: a scan whose smoothed current rises over the
/// first 10% of samples opens reductive.
pub fn classify_cyclic_scan(current: &[f64]) -> DpvResult<ScanDirection> {
    let n = current.len();
    let head = (n / 10).max(1);
    let slope = match odd_in_range(9, n) {
        Some(ws) => sgg(
            current,
            &index_grid(n),
            SggOptions {
                window_size: ws,
                derivative: 1,
                polynomial: 3.min(ws - 2),
            },
        )?,
        None => current.windows(2).map(|w| w[1] - w[0]).collect(),
    };
    let window = &slope[..head.min(slope.len())];
    let rising = window.iter().filter(|&&d| d > 0.0).count();
    if 2 * rising > window.len() {
        Ok(ScanDirection::Reductive)
    } else {
        Ok(ScanDirection::Oxidative)
    }
}

pub fn classify_with(protocol: ScanProtocol, current: &[f64]) -> DpvResult<ScanDirection> {
    match protocol {
        ScanProtocol::Dpv => Ok(classify_scan(current)),
        ScanProtocol::Cyclic => classify_cyclic_scan(current),
    }
}
