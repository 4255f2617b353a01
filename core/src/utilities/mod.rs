pub mod analyze_dpv;
pub use analyze_dpv::{DpvOptions, analyze_batch, analyze_dpv, analyze_trace};

pub mod calculate_baseline;
pub use calculate_baseline::{BaselineStrategy, calculate_baseline};

pub mod classify_scan;
pub use classify_scan::{ScanProtocol, classify_cyclic_scan, classify_scan, classify_with};

pub mod errors;
pub use errors::{DpvError, DpvResult};

pub mod find_peaks;
pub use find_peaks::{find_peak_general, find_peaks};

pub mod get_boundaries;
pub use get_boundaries::get_boundaries;

pub mod linear_baseline;
pub use linear_baseline::find_linear_baseline;

pub mod polyfit;
pub use polyfit::{Polynomial, polyfit};

pub mod polynomial_baseline;
pub use polynomial_baseline::{mod_poly_baseline, polynomial_baseline};

pub mod scan_for_peaks;
pub use scan_for_peaks::{detect_peaks, scan_for_peaks};

pub mod sgg;

pub mod structs;

pub mod utilities;
pub use utilities::{line_at, odd_in_range};
