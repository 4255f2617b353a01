use dpvut::utilities::find_peaks::{FindPeaksOptions, find_peak_general, find_peaks};
use dpvut::utilities::scan_for_peaks::{
    DetectPeaksOptions, ScanPeaksOptions, detect_peaks, scan_for_peaks,
};
use dpvut::utilities::structs::PeakSource;

mod helpers;
use helpers::{add, index_gaussian, linspace};

// empty input should return no peaks
#[test]
fn empty_input_returns_empty() {
    assert!(find_peaks(&[], None).is_empty());
    assert!(find_peak_general(&[], 1e-9, 10).is_empty());
    assert!(detect_peaks(&[], &[], None).unwrap().is_empty());
    assert!(scan_for_peaks(&[], None).unwrap().is_empty());
}

// perfectly flat series has no peaks anywhere
#[test]
fn constant_series_no_peaks() {
    let ys = vec![0.0; 101];
    let xs = linspace(0.0, 1.0, 101);
    assert!(find_peaks(&ys, None).is_empty());
    assert!(detect_peaks(&xs, &ys, None).unwrap().is_empty());
    assert!(scan_for_peaks(&ys, None).unwrap().is_empty());
}

// one gaussian should be detected at its center with full prominence
#[test]
fn single_gaussian_peak_detected() {
    let ys = index_gaussian(80, 40.0, 3.0, 2.0);
    let peaks = find_peaks(&ys, None);
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 40);
    assert!((peaks[0].height - 2.0).abs() < 1e-12);
    assert!(peaks[0].prominence > 1.99);
}

// distance filter keeps the taller of two close peaks
#[test]
fn general_search_respects_distance() {
    let ys = add(
        &index_gaussian(100, 40.0, 2.0, 1.0),
        &index_gaussian(100, 47.0, 2.0, 3.0),
    );
    assert_eq!(find_peak_general(&ys, 1e-9, 1), vec![40, 47]);
    assert_eq!(find_peak_general(&ys, 1e-9, 10), vec![47]);
}

// prominence floor drops small ripples riding on a peak flank
#[test]
fn prominence_floor_applies() {
    let mut ys = index_gaussian(60, 30.0, 5.0, 4.0);
    ys[10] += 0.05;
    let low = find_peaks(
        &ys,
        Some(FindPeaksOptions {
            prominence: 1e-9,
            distance: 1,
        }),
    );
    assert_eq!(low.iter().map(|p| p.index).collect::<Vec<_>>(), vec![10, 30]);
    let high = find_peaks(
        &ys,
        Some(FindPeaksOptions {
            prominence: 0.5,
            distance: 1,
        }),
    );
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].index, 30);
}

// detector reports the apex from the smoothed signal and a shoulder from the derivative
#[test]
fn detector_merges_signal_and_derivative_hits() {
    let xs = linspace(0.0, 1.0, 60);
    let ys = index_gaussian(60, 30.0, 3.0, 3.0);
    let cands = detect_peaks(&xs, &ys, None).unwrap();

    let apex = cands.iter().find(|c| c.index == 30).unwrap();
    assert_eq!(apex.source, PeakSource::Signal);
    assert_eq!(apex.potential, xs[30]);
    assert_eq!(apex.current, ys[30]);
    assert!(cands.iter().any(|c| c.source == PeakSource::Derivative && c.index < 30));

    let mut sorted: Vec<usize> = cands.iter().map(|c| c.index).collect();
    sorted.dedup();
    assert_eq!(sorted.len(), cands.len());
    assert!(cands.windows(2).all(|w| w[0].index < w[1].index));
}

// peaks inside the ignored edge band are discarded
#[test]
fn detector_drops_edge_peaks() {
    let xs = linspace(0.0, 1.0, 60);
    let left = index_gaussian(60, 2.0, 2.0, 3.0);
    let right = index_gaussian(60, 57.0, 2.0, 3.0);
    assert!(detect_peaks(&xs, &left, None).unwrap().is_empty());
    assert!(detect_peaks(&xs, &right, None).unwrap().is_empty());

    let keep_all = DetectPeaksOptions {
        ignored_boundary_points: 0,
        ..Default::default()
    };
    let mid = index_gaussian(60, 30.0, 3.0, 3.0);
    let a = detect_peaks(&xs, &mid, None).unwrap();
    let b = detect_peaks(&xs, &mid, Some(keep_all)).unwrap();
    assert!(b.len() >= a.len());
}

// mismatched axes yield no candidates rather than a panic
#[test]
fn detector_mismatch_is_empty() {
    let xs = linspace(0.0, 1.0, 10);
    let ys = vec![0.0; 12];
    assert!(detect_peaks(&xs, &ys, None).unwrap().is_empty());
}

// derivative zero crossings land on the apex
#[test]
fn scan_finds_gaussian_apex() {
    let ys = index_gaussian(60, 30.0, 3.0, 3.0);
    let peaks = scan_for_peaks(&ys, None).unwrap();
    assert!(peaks.contains(&30));
    // anything else is rounding noise in the flat tails
    assert!(peaks.iter().all(|&p| p == 30 || ys[p] < 1e-6));
}

// distance in the zero-crossing scan keeps the higher apex
#[test]
fn scan_distance_keeps_higher_apex() {
    let ys = add(
        &index_gaussian(70, 20.0, 3.0, 1.0),
        &index_gaussian(70, 45.0, 3.0, 2.0),
    );
    let near = scan_for_peaks(&ys, None).unwrap();
    assert!(near.contains(&20) && near.contains(&45));
    assert!(near.iter().all(|&p| p == 20 || p == 45 || ys[p] < 1e-6));

    let far = scan_for_peaks(
        &ys,
        Some(ScanPeaksOptions {
            distance: 30,
            ..Default::default()
        }),
    )
    .unwrap();
    assert_eq!(far, vec![45]);
}

// traces shorter than the smallest window fall back to raw differences
#[test]
fn scan_short_trace_uses_differences() {
    assert_eq!(scan_for_peaks(&[1.0, 2.0, 1.0], None).unwrap(), vec![1]);
    assert!(scan_for_peaks(&[1.0, 2.0], None).unwrap().is_empty());
}
