#![warn(clippy::all, rust_2018_idioms)]

mod utils;

use anyhow::{bail, Result};
use tridel::{art_gallery, io, Dcel, Delaunay, Point2};

use crate::utils::{
    get_example_polygon, measure_time, parse_projection, regular_polygon, sample_star_polygon,
    sample_vertices_2d, to_points,
};

const USAGE: &str = "Usage:
  tridel_lab delaunay <points-file> [xy|xz]   Delaunay triangulation of a point file
  tridel_lab gallery [<points-file> [xy|xz]]  Ear clipping and guards of a polygon (example polygon if no file)
  tridel_lab random <n>                       Delaunay triangulation of n uniform random points
  tridel_lab polygon <n>                      Ear clipping and guards of a random polygon (regular for n < 4)";

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (run with `RUST_LOG=info` for timings and summaries).

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args[..] {
        ["delaunay", path, ..] => {
            let projection = parse_projection(args.get(2).copied())?;
            let points: Vec<Point2> = io::read_points(path)?
                .iter()
                .map(|p| p.project(projection))
                .collect();

            run_delaunay(&points)
        }
        ["random", n] => run_delaunay(&to_points(sample_vertices_2d(n.parse()?, None))),
        ["gallery"] => run_gallery(&get_example_polygon()),
        ["gallery", path, ..] => {
            let projection = parse_projection(args.get(2).copied())?;
            let points: Vec<Point2> = io::read_points(path)?
                .iter()
                .map(|p| p.project(projection))
                .collect();

            run_gallery(&points)
        }
        ["polygon", n] => {
            let n: usize = n.parse()?;
            let polygon = if n < 4 {
                regular_polygon(n, 1.0)
            } else {
                sample_star_polygon(n)
            };

            run_gallery(&to_points(polygon))
        }
        _ => {
            eprintln!("{USAGE}");
            bail!("Invalid arguments: {args:?}")
        }
    }
}

fn run_delaunay(points: &[Point2]) -> Result<()> {
    let (delaunay, time) = measure_time(|| Delaunay::new(points));
    let delaunay = delaunay?;

    log::info!("Triangulation took {time} μs");
    log::info!(
        "Triangulated {} points into {} triangles, {} on the hull",
        points.len(),
        delaunay.num_tris(),
        delaunay.hull().len()
    );

    println!("Hull: {:?}", delaunay.hull());
    println!("Hull area: {}", delaunay.hull_area());

    for t in 0..delaunay.num_tris() {
        println!("{}", delaunay.get_tri(t)?);
    }

    if !delaunay.is_sound() || !delaunay.is_delaunay() {
        bail!("The triangulation is broken, see the log for details");
    }

    Ok(())
}

fn run_gallery(polygon: &[Point2]) -> Result<()> {
    let mut dcel = Dcel::new(polygon)?;

    let (faces, time) = measure_time(|| dcel.triangulate());
    let faces = faces?;

    log::info!("Ear clipping took {time} μs");
    log::info!("Clipped {} triangles from {} vertices", faces.len(), dcel.num_vertices());

    println!("{dcel}");

    let triangulation = dcel.triangulation()?;
    let guards = art_gallery::guards(&triangulation, dcel.num_vertices())?;

    log::info!("Placed {} guards", guards.len());

    println!("Guards ({} for {} vertices):", guards.len(), dcel.num_vertices());
    for v in guards {
        println!("  V{v} {}", dcel.vertex(v)?.point);
    }

    Ok(())
}
