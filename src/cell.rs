use crate::edge::Edge;
use crate::geometry::Point;

/// A Voronoi cell as a polygon, assembled from the edges of a diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub(crate) id: usize,
    // Flat array of vertices [x, y, x, y, ...], counter-clockwise
    pub(crate) vertices: Vec<f64>,
    // Neighbor ID for each edge. edge_neighbors[i] corresponds to edge starting at vertices[2*i]
    pub(crate) edge_neighbors: Vec<i32>,
}

impl Cell {
    /// Chains the edges bordering `site` into a ring.
    ///
    /// Every edge is walked with `site` on its left, so a closed ring comes out
    /// counter-clockwise. A cell whose edges do not close keeps the vertices chained so
    /// far; a site without edges gets an empty cell.
    pub(crate) fn assemble(id: usize, site: usize, edges: &[Edge], eps: f64) -> Cell {
        let mut segments: Vec<(Point, Point, i32)> = edges
            .iter()
            .filter_map(|e| {
                let neighbor = e.neighbor_of(site)?;
                if e.left_site == Some(site) {
                    Some((e.start, e.end, neighbor))
                } else {
                    Some((e.end, e.start, neighbor))
                }
            })
            .collect();

        let mut vertices = Vec::with_capacity(segments.len() * 2);
        let mut edge_neighbors = Vec::with_capacity(segments.len());
        let Some((first, mut current, neighbor)) = segments.pop() else {
            return Cell { id, vertices, edge_neighbors };
        };
        vertices.extend_from_slice(&first.to_array());
        edge_neighbors.push(neighbor);

        while !current.approx_eq(first, eps) {
            let Some(next) = segments.iter().position(|s| s.0.approx_eq(current, eps)) else {
                tracing::warn!("cell of site {} does not close at {:?}", site, current);
                break;
            };
            let (start, end, neighbor) = segments.swap_remove(next);
            vertices.extend_from_slice(&start.to_array());
            edge_neighbors.push(neighbor);
            current = end;
        }

        Cell { id, vertices, edge_neighbors }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    pub fn edge_neighbors(&self) -> &[i32] {
        &self.edge_neighbors
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.chunks_exact(2).map(|c| Point::new(c[0], c[1]))
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 6
    }

    /// Pairs each vertex with the next one around the ring.
    fn sides(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points().zip(self.points().skip(1).chain(self.points().take(1)))
    }

    /// Shoelace area. Zero for an empty cell.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.sides().map(|(a, b)| a.cross(b)).sum::<f64>().abs() * 0.5
    }

    pub fn centroid(&self) -> [f64; 2] {
        if self.is_empty() {
            return [0.0, 0.0];
        }
        let (twice_area, weighted) = self.sides().fold((0.0, Point::new(0.0, 0.0)), |(area, sum), (a, b)| {
            let cross = a.cross(b);
            (area + cross, sum + (a + b) * cross)
        });
        if twice_area.abs() < f64::MIN_POSITIVE {
            return [0.0, 0.0];
        }
        (weighted * (1.0 / (3.0 * twice_area))).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{BOX_ID_BOTTOM, BOX_ID_LEFT, BOX_ID_RIGHT, BOX_ID_TOP};

    fn border(start: [f64; 2], end: [f64; 2], site: usize, side: i32) -> Edge {
        Edge { start: start.into(), end: end.into(), left_site: Some(site), right_site: None, side: Some(side) }
    }

    /// Two sites split by x = 4 in a 10 x 10 box.
    fn split_box() -> Vec<Edge> {
        vec![
            Edge {
                start: Point::new(4.0, 10.0),
                end: Point::new(4.0, 0.0),
                left_site: Some(1),
                right_site: Some(0),
                side: None,
            },
            border([0.0, 0.0], [4.0, 0.0], 0, BOX_ID_BOTTOM),
            border([4.0, 0.0], [10.0, 0.0], 1, BOX_ID_BOTTOM),
            border([10.0, 0.0], [10.0, 10.0], 1, BOX_ID_RIGHT),
            border([10.0, 10.0], [4.0, 10.0], 1, BOX_ID_TOP),
            border([4.0, 10.0], [0.0, 10.0], 0, BOX_ID_TOP),
            border([0.0, 10.0], [0.0, 0.0], 0, BOX_ID_LEFT),
        ]
    }

    #[test]
    fn test_assemble_area_and_centroid() {
        let edges = split_box();
        let left = Cell::assemble(0, 0, &edges, 1e-9);
        assert_eq!(left.vertices().len(), 8);
        assert!((left.area() - 40.0).abs() < 1e-9, "area {}", left.area());
        let c = left.centroid();
        assert!((c[0] - 2.0).abs() < 1e-9 && (c[1] - 5.0).abs() < 1e-9, "centroid {:?}", c);

        let right = Cell::assemble(1, 1, &edges, 1e-9);
        assert!((right.area() - 60.0).abs() < 1e-9);
        assert!(right.edge_neighbors().contains(&0));
        assert!(right.edge_neighbors().contains(&BOX_ID_RIGHT));
    }

    #[test]
    fn test_ring_is_counter_clockwise() {
        let cell = Cell::assemble(0, 0, &split_box(), 1e-9);
        let points: Vec<Point> = cell.points().collect();
        let signed: f64 = (0..points.len())
            .map(|i| points[i].cross(points[(i + 1) % points.len()]))
            .sum();
        assert!(signed > 0.0);
    }

    #[test]
    fn test_site_without_edges_is_empty() {
        let cell = Cell::assemble(7, 7, &split_box(), 1e-9);
        assert!(cell.is_empty());
        assert_eq!(cell.area(), 0.0);
        assert_eq!(cell.id(), 7);
    }
}
