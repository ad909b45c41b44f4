use crate::geometry::{Point, bisector_direction};

pub(crate) type EdgeId = usize;
pub(crate) type VertexId = usize;

/// One end of an edge under construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Endpoint {
    /// Not fixed (yet): the edge extends to infinity on this side.
    Open,
    /// Fixed at a Voronoi vertex from the shared vertex pool.
    Vertex(VertexId),
}

/// An edge of the unbounded diagram, lying on the bisector of `left` and `right`.
///
/// Going from `a` to `b` follows `direction` and keeps the `left` site on the left.
/// An edge with both ends open is the full bisector line through `anchor`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EdgeRecord {
    pub left: usize,
    pub right: usize,
    pub anchor: Point,
    pub direction: Point,
    pub a: Endpoint,
    pub b: Endpoint,
}

/// Owns the edge and vertex pools of one sweep.
#[derive(Debug, Default)]
pub(crate) struct EdgeBuilder {
    edges: Vec<EdgeRecord>,
    vertices: Vec<Point>,
    refinalized: usize,
}

impl EdgeBuilder {
    pub fn with_capacity(sites: usize) -> Self {
        Self {
            edges: Vec::with_capacity(sites * 3),
            vertices: Vec::with_capacity(sites * 2),
            refinalized: 0,
        }
    }

    pub fn add_vertex(&mut self, p: Point) -> VertexId {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    pub fn vertex(&self, id: VertexId) -> Point {
        self.vertices[id]
    }

    /// Opens an edge whose two breakpoints both start at `anchor` and move apart.
    pub fn open(&mut self, left: (usize, Point), right: (usize, Point), anchor: Point) -> EdgeId {
        self.edges.push(EdgeRecord {
            left: left.0,
            right: right.0,
            anchor,
            direction: bisector_direction(left.1, right.1),
            a: Endpoint::Open,
            b: Endpoint::Open,
        });
        self.edges.len() - 1
    }

    /// Opens an edge starting at an existing vertex. Its single breakpoint has `left` on
    /// the left and travels towards `b`.
    pub fn open_at(&mut self, left: (usize, Point), right: (usize, Point), vertex: VertexId) -> EdgeId {
        let anchor = self.vertices[vertex];
        let id = self.open(left, right, anchor);
        self.edges[id].a = Endpoint::Vertex(vertex);
        id
    }

    /// Fixes the end that the breakpoint between the arcs of `left` and `right` was
    /// travelling towards.
    pub fn finish(&mut self, edge: EdgeId, left: usize, right: usize, vertex: VertexId) {
        let record = &mut self.edges[edge];
        let end = if (left, right) == (record.left, record.right) {
            &mut record.b
        } else {
            &mut record.a
        };
        match *end {
            Endpoint::Open => *end = Endpoint::Vertex(vertex),
            Endpoint::Vertex(existing) => {
                self.refinalized += 1;
                tracing::warn!(
                    "edge {} between sites {} and {} is already fixed at vertex {}; ignoring vertex {}",
                    edge,
                    record.left,
                    record.right,
                    existing,
                    vertex
                );
            }
        }
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn refinalized(&self) -> usize {
        self.refinalized
    }
}

/// An edge of the clipped diagram.
///
/// Interior edges separate `left_site` and `right_site`. Border edges run along the
/// bounding box: they carry the site whose cell they close in `left_site` (or `None`
/// for a diagram without sites), no `right_site`, and the box side ID in `side`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
    pub left_site: Option<usize>,
    pub right_site: Option<usize>,
    pub side: Option<i32>,
}

impl Edge {
    pub fn is_border(&self) -> bool {
        self.side.is_some()
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The one or two sites this edge borders.
    pub fn sites(&self) -> impl Iterator<Item = usize> {
        self.left_site.into_iter().chain(self.right_site)
    }

    pub fn borders(&self, site: usize) -> bool {
        self.left_site == Some(site) || self.right_site == Some(site)
    }

    /// The site on the other side of this edge, as seen from `site`. Border edges
    /// report their box side ID.
    pub fn neighbor_of(&self, site: usize) -> Option<i32> {
        match (self.left_site, self.right_site) {
            (Some(l), Some(r)) if l == site => Some(r as i32),
            (Some(l), Some(r)) if r == site => Some(l as i32),
            (Some(l), None) if l == site => self.side,
            _ => None,
        }
    }

    /// Endpoints as `[x1, y1, x2, y2]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }
}
