#![no_main]

use libfuzzer_sys::fuzz_target;
use tridel::{art_gallery, Dcel, Point2};

fuzz_target!(|data: Vec<(f64, f64)>| {
    let polygon: Vec<Point2> = data
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && x.abs() < 1e6 && y.abs() < 1e6)
        .map(Point2::from)
        .collect();

    let Ok(mut dcel) = Dcel::new(&polygon) else {
        return;
    };

    // arbitrary rings are rarely simple, failing is fine but must leave a consistent mesh
    let clipped = dcel.triangulate();
    assert!(dcel.is_sound());

    if clipped.is_ok() {
        if let Ok(triangulation) = dcel.triangulation() {
            let _ = art_gallery::guards(&triangulation, dcel.num_vertices());
        }
    }
});
