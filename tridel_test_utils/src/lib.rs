//! utils for tridel tests and tridel_lab
#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::all, clippy::missing_const_for_fn)]

use rand::{distr::Uniform, prelude::Distribution};
use rand_distr::Normal;
use std::{f64::consts::TAU, ops::RangeInclusive};

pub type Vertex2 = [f64; 2];

/// Samples `n` vertices in 2D space from the [Uniform] distribution.
///
/// If no range is specified, the unit-square centered around the origin is used, `[-0.5, 0.5]`.
pub fn sample_vertices_2d(n: usize, range: Option<RangeInclusive<f64>>) -> Vec<Vertex2> {
    let mut rng = rand::rng();
    let range = range.unwrap_or(-0.5..=0.5);
    let uniform = Uniform::try_from(range).expect("Expected range with a greater start then end");

    (0..n)
        .map(|_| [uniform.sample(&mut rng), uniform.sample(&mut rng)])
        .collect()
}

/// Samples `n` vertices in 2D space from a [Normal] distribution per coordinate.
///
/// The default parametrization is `μ = 0.0` and `σ = 1.0`, parameters can be passed as `(μ, σ)`.
pub fn sample_vertices_2d_normal(n: usize, params: Option<(f64, f64)>) -> Vec<Vertex2> {
    let mut rng = rand::rng();
    let (mean, std_dev) = params.unwrap_or((0.0, 1.0));
    let normal = Normal::new(mean, std_dev).expect("Expected a finite, positive standard deviation");

    (0..n)
        .map(|_| [normal.sample(&mut rng), normal.sample(&mut rng)])
        .collect()
}

/// The vertices of a regular `n`-gon around the origin, counter-clockwise, starting at `(radius, 0)`.
pub fn regular_polygon(n: usize, radius: f64) -> Vec<Vertex2> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}

/// Samples a random simple polygon with `n` vertices, counter-clockwise.
///
/// The polygon is star-shaped around the origin: vertices are placed at evenly spaced angles,
/// jittered within their sector, at random radii in `[0.3, 1.0]`.
pub fn sample_star_polygon(n: usize) -> Vec<Vertex2> {
    let mut rng = rand::rng();
    let jitter = Uniform::try_from(0.1..=0.9).expect("Expected range with a greater start then end");
    let radii = Uniform::try_from(0.3..=1.0).expect("Expected range with a greater start then end");

    let sector = TAU / n as f64;

    (0..n)
        .map(|i| {
            let angle = sector * (i as f64 + jitter.sample(&mut rng));
            let radius = radii.sample(&mut rng);
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}
