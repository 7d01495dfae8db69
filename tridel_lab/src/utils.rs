use std::time::Instant;

use tridel::{Point2, Projection};
pub use tridel_test_utils::{regular_polygon, sample_star_polygon, sample_vertices_2d};

/// Measures the time it takes to execute a function.
///
/// Returns the result of the function and the time it took to execute it in `μs`.
pub fn measure_time<F: FnOnce() -> T, T>(f: F) -> (T, u128) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_micros())
}

/// Parse the projection plane argument, `xy` if none is given.
pub fn parse_projection(arg: Option<&str>) -> anyhow::Result<Projection> {
    match arg {
        None | Some("xy") => Ok(Projection::Xy),
        Some("xz") => Ok(Projection::Xz),
        Some(other) => Err(anyhow::Error::msg(format!(
            "Unknown projection '{other}', expected 'xy' or 'xz'"
        ))),
    }
}

pub fn to_points(vertices: Vec<[f64; 2]>) -> Vec<Point2> {
    vertices.into_iter().map(Point2::from).collect()
}

/// A predefined simple polygon, counter-clockwise with two reflex corners.
pub fn get_example_polygon() -> Vec<Point2> {
    to_points(vec![
        [0.0, 0.0],
        [4.0, 0.0],
        [4.0, 3.0],
        [3.0, 1.0],
        [2.0, 3.0],
        [1.0, 1.0],
        [0.0, 3.0],
    ])
}
