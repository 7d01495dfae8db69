#![no_main]

use libfuzzer_sys::fuzz_target;
use tridel::{Delaunay, Point2};

fuzz_target!(|data: Vec<(f64, f64)>| {
    let points: Vec<Point2> = data
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && x.abs() < 1e6 && y.abs() < 1e6)
        .map(Point2::from)
        .collect();

    if let Ok(delaunay) = Delaunay::new(&points) {
        assert!(delaunay.is_sound());
    }
});
