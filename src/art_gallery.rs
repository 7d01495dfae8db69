//! Guard placement for the art gallery problem via 3-coloring of a polygon triangulation.
//!
//! Every triangle of a colored triangulation has one vertex of each color, so any single
//! color class watches the whole polygon. The smallest class has at most `⌊n / 3⌋` vertices.

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::{
    utils::types::{TriIdx, VertexIdx},
    Triangulation,
};

/// Adjacency of triangles sharing an edge.
fn dual_graph(triangulation: &Triangulation) -> Result<Vec<Vec<TriIdx>>> {
    let mut edges: HashMap<(VertexIdx, VertexIdx), Vec<TriIdx>> = HashMap::new();

    for (tri_idx, [a, b, c]) in triangulation.iter().enumerate() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            edges.entry((u.min(v), u.max(v))).or_default().push(tri_idx);
        }
    }

    let mut adjacency = vec![Vec::new(); triangulation.len()];

    for (edge, tris) in edges {
        match tris[..] {
            [_] => (),
            [t0, t1] => {
                adjacency[t0].push(t1);
                adjacency[t1].push(t0);
            }
            _ => bail!(
                "Edge {} -- {} is shared by {} triangles",
                edge.0,
                edge.1,
                tris.len()
            ),
        }
    }

    // independent of the hash order
    for neighbors in adjacency.iter_mut() {
        neighbors.sort_unstable();
    }

    Ok(adjacency)
}

/// Color the vertices of a triangulation with three colors, such that no edge joins two vertices of the same color.
///
/// Triangles are visited depth first through the dual graph, starting at triangle 0. Each visited triangle
/// hands its uncolored vertices the smallest colors not yet used in it.
/// Vertices not part of any triangle stay `None`.
///
/// Fails if the triangulation is not 3-colorable, e.g. if it has an inner vertex of odd degree.
pub fn three_coloring(triangulation: &Triangulation, num_vertices: usize) -> Result<Vec<Option<u8>>> {
    let mut colors = vec![None; num_vertices];

    if let Some(&v) = triangulation.triangles.iter().find(|&&v| v >= num_vertices) {
        bail!("Triangulation references V{v}, but there are only {num_vertices} vertices");
    }

    let adjacency = dual_graph(triangulation)?;
    let mut visited = vec![false; triangulation.len()];

    for root in 0..triangulation.len() {
        if visited[root] {
            continue;
        }

        visited[root] = true;
        let mut stack = vec![root];

        while let Some(tri_idx) = stack.pop() {
            let nodes = triangulation
                .triangle(tri_idx)
                .ok_or_else(|| anyhow::Error::msg(format!("Unknown triangle {tri_idx}")))?;

            color_triangle(&mut colors, nodes)?;

            for &neighbor in &adjacency[tri_idx] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }
    }

    Ok(colors)
}

fn color_triangle(colors: &mut [Option<u8>], nodes: [VertexIdx; 3]) -> Result<()> {
    let mut used: Vec<u8> = nodes.iter().filter_map(|&v| colors[v]).collect();

    for v in nodes {
        if colors[v].is_none() {
            let color = (0..3)
                .find(|color| !used.contains(color))
                .ok_or_else(|| anyhow::Error::msg(format!("No color left for V{v}")))?;

            colors[v] = Some(color);
            used.push(color);
        }
    }

    let [a, b, c] = nodes.map(|v| colors[v]);
    if a == b || b == c || c == a {
        log::error!("Coloring conflict in triangle {nodes:?}: {a:?} {b:?} {c:?}");
        bail!("Triangulation is not 3-colorable, conflict at {nodes:?}");
    }

    Ok(())
}

/// Guard positions for the polygon, i.e. the smallest color class of [`three_coloring`].
///
/// Ties pick the lowest color. An empty triangulation needs no guards.
pub fn guards(triangulation: &Triangulation, num_vertices: usize) -> Result<Vec<VertexIdx>> {
    if triangulation.is_empty() {
        return Ok(Vec::new());
    }

    let colors = three_coloring(triangulation, num_vertices)?;

    let mut classes: [Vec<VertexIdx>; 3] = Default::default();
    for (v, color) in colors.iter().enumerate() {
        if let Some(color) = color {
            classes[*color as usize].push(v);
        }
    }

    let guards = classes
        .into_iter()
        .min_by_key(Vec::len)
        .unwrap_or_default();

    log::debug!("Placed {} guards for {} vertices", guards.len(), num_vertices);

    Ok(guards)
}
