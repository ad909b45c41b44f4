//! Clipping of the unbounded diagram to the rectangle and closing of the cells.
//!
//! Every edge record becomes a parametric range `origin + t * direction` and is cut with
//! Liang–Barsky. Endpoints landing within tolerance of a side are snapped onto it. Then,
//! side by side and counter-clockwise, the points where interior edges meet the side are
//! sorted, welded together when they coincide, and joined by border edges.

use crate::bounds::{BOX_ID_BOTTOM, BOX_ID_LEFT, BOX_ID_RIGHT, BOX_ID_TOP, BoundingBox};
use crate::edge::{Edge, EdgeBuilder, EdgeRecord, Endpoint};
use crate::geometry::Point;
use crate::site::SiteRegistry;
use crate::sweep::SweepStats;

/// A range of the line `origin + t * direction`. Ends that coincide with a vertex
/// carry it, so clipping leaves them bit-identical.
#[derive(Clone, Copy, Debug)]
struct Span {
    origin: Point,
    direction: Point,
    t0: f64,
    t1: f64,
    start: Option<Point>,
    end: Option<Point>,
}

impl Span {
    fn of(record: &EdgeRecord, edges: &EdgeBuilder) -> Self {
        let d = record.direction;
        match (record.a, record.b) {
            (Endpoint::Vertex(a), Endpoint::Vertex(b)) => {
                let (pa, pb) = (edges.vertex(a), edges.vertex(b));
                Span { origin: pa, direction: pb - pa, t0: 0.0, t1: 1.0, start: Some(pa), end: Some(pb) }
            }
            (Endpoint::Vertex(a), Endpoint::Open) => {
                let pa = edges.vertex(a);
                Span { origin: pa, direction: d, t0: 0.0, t1: f64::INFINITY, start: Some(pa), end: None }
            }
            (Endpoint::Open, Endpoint::Vertex(b)) => {
                let pb = edges.vertex(b);
                Span { origin: pb, direction: d, t0: f64::NEG_INFINITY, t1: 0.0, start: None, end: Some(pb) }
            }
            (Endpoint::Open, Endpoint::Open) => Span {
                origin: record.anchor,
                direction: d,
                t0: f64::NEG_INFINITY,
                t1: f64::INFINITY,
                start: None,
                end: None,
            },
        }
    }

    /// Liang–Barsky against the closed rectangle. Returns `None` if nothing is left.
    fn clip(mut self, bounds: &BoundingBox) -> Option<(Point, Point)> {
        let (o, d) = (self.origin, self.direction);
        let constraints = [
            (-d.x, o.x - bounds.min[0]),
            (d.x, bounds.max[0] - o.x),
            (-d.y, o.y - bounds.min[1]),
            (d.y, bounds.max[1] - o.y),
        ];
        for (p, q) in constraints {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > self.t0 {
                    self.t0 = r;
                    self.start = None;
                }
            } else if r < self.t1 {
                self.t1 = r;
                self.end = None;
            }
        }
        if self.t0 > self.t1 || !self.t0.is_finite() || !self.t1.is_finite() {
            return None;
        }

        let start = self.start.unwrap_or(o + d * self.t0);
        let end = self.end.unwrap_or(o + d * self.t1);
        Some((start, end))
    }
}

/// An endpoint of a surviving interior edge: index into the output and which end.
#[derive(Clone, Copy, Debug)]
struct EndRef {
    edge: usize,
    is_end: bool,
}

/// Clips every edge record to `bounds` and, if `close_cells` is set, adds the border
/// edges closing the cells along the rectangle.
pub(crate) fn close(
    edges: &EdgeBuilder,
    sites: &SiteRegistry,
    bounds: &BoundingBox,
    eps: f64,
    close_cells: bool,
    stats: &mut SweepStats,
) -> Vec<Edge> {
    let mut output = clip_interior(edges, bounds, eps, stats);
    let interior = output.len();

    // Counter-clockwise: bottom, right, top, left.
    let corners = bounds.corners();
    let sides = [BOX_ID_BOTTOM, BOX_ID_RIGHT, BOX_ID_TOP, BOX_ID_LEFT];

    let mut border = Vec::new();
    for (k, &side) in sides.iter().enumerate() {
        let from = corners[k];
        let to = corners[(k + 1) % 4];
        let chain = weld_side(&mut output[..interior], bounds, side, from, to, eps);

        if !close_cells {
            continue;
        }
        let along = to - from;
        for pair in chain.windows(2) {
            let owner = owner_after(&output[..interior], &pair[0], along)
                .or_else(|| owner_before(&output[..interior], &pair[1], along));
            border.push(Edge {
                start: pair[0].point,
                end: pair[1].point,
                left_site: owner,
                right_site: None,
                side: Some(side),
            });
        }
    }
    carry_owners(&mut border, sites, bounds);

    tracing::trace!(
        "clipped {} edge records to {} interior and {} border edges",
        edges.len(),
        interior,
        border.len()
    );
    output.extend(border);
    output
}

fn clip_interior(edges: &EdgeBuilder, bounds: &BoundingBox, eps: f64, stats: &mut SweepStats) -> Vec<Edge> {
    let mut output = Vec::with_capacity(edges.len());
    for record in edges.edges() {
        let Some((start, end)) = Span::of(record, edges).clip(bounds) else {
            stats.clipped_away += 1;
            continue;
        };
        let start = bounds.snap(start, eps);
        let end = bounds.snap(end, eps);

        if start.distance(end) <= eps {
            stats.clipped_away += 1;
            continue;
        }
        // Lying along a side: the border edges cover it.
        let start_sides = bounds.sides_of(start, eps);
        if bounds.sides_of(end, eps).iter().any(|s| start_sides.contains(s)) {
            stats.clipped_away += 1;
            continue;
        }

        output.push(Edge {
            start,
            end,
            left_site: Some(record.left),
            right_site: Some(record.right),
            side: None,
        });
    }
    output
}

/// A distinct point along a side with the interior edge ends welded to it.
#[derive(Debug)]
struct SidePoint {
    point: Point,
    ends: Vec<EndRef>,
}

/// Collects the points of one side from `from` to `to`, merges those within `eps` and
/// moves the interior edge ends onto the merged point. Corners win over other points.
fn weld_side(
    interior: &mut [Edge],
    bounds: &BoundingBox,
    side: i32,
    from: Point,
    to: Point,
    eps: f64,
) -> Vec<SidePoint> {
    let axis = to - from;
    let unit = axis * (1.0 / axis.length());

    // (parameter, point, corner, end)
    let mut found: Vec<(f64, Point, bool, Option<EndRef>)> = vec![
        (0.0, from, true, None),
        (axis.length(), to, true, None),
    ];
    for (i, edge) in interior.iter().enumerate() {
        for (is_end, p) in [(false, edge.start), (true, edge.end)] {
            if bounds.sides_of(p, eps).contains(&side) {
                found.push(((p - from).dot(unit), p, false, Some(EndRef { edge: i, is_end })));
            }
        }
    }
    found.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.2.cmp(&a.2)));

    let mut chain: Vec<SidePoint> = Vec::new();
    let mut last_t = f64::NEG_INFINITY;
    let mut has_corner = false;
    for (t, p, corner, end) in found {
        if t - last_t > eps || chain.is_empty() {
            chain.push(SidePoint { point: p, ends: Vec::new() });
            has_corner = corner;
        } else if corner && !has_corner {
            if let Some(current) = chain.last_mut() {
                current.point = p;
            }
            has_corner = true;
        }
        last_t = t;
        if let (Some(end), Some(current)) = (end, chain.last_mut()) {
            current.ends.push(end);
        }
    }

    for point in &chain {
        for end in &point.ends {
            let edge = &mut interior[end.edge];
            if end.is_end {
                edge.end = point.point;
            } else {
                edge.start = point.point;
            }
        }
    }
    chain
}

/// Counter-clockwise angle from `along` to the edge leaving `point.point` through `end`.
fn angle_to(interior: &[Edge], point: &SidePoint, end: &EndRef, along: Point) -> f64 {
    let edge = &interior[end.edge];
    let far = if end.is_end { edge.start } else { edge.end };
    let w = far - point.point;
    along.cross(w).atan2(along.dot(w))
}

/// Owner of the border segment leaving `point` in direction `along`.
///
/// The box interior lies left of `along`, so the cell between the segment and the first
/// edge counter-clockwise from it lies right of that edge, seen from `point`.
fn owner_after(interior: &[Edge], point: &SidePoint, along: Point) -> Option<usize> {
    let end = point
        .ends
        .iter()
        .min_by(|a, b| angle_to(interior, point, a, along).total_cmp(&angle_to(interior, point, b, along)))?;
    let edge = &interior[end.edge];
    if end.is_end { edge.left_site } else { edge.right_site }
}

/// Owner of the border segment arriving at `point` in direction `along`: the cell left of
/// the last edge counter-clockwise from `along`, seen from `point`.
fn owner_before(interior: &[Edge], point: &SidePoint, along: Point) -> Option<usize> {
    let end = point
        .ends
        .iter()
        .max_by(|a, b| angle_to(interior, point, a, along).total_cmp(&angle_to(interior, point, b, along)))?;
    let edge = &interior[end.edge];
    if end.is_end { edge.right_site } else { edge.left_site }
}

/// Fills in the owner of border edges with no interior edge at either end. Such a
/// segment continues the cell of the one before it around the ring. Without any interior
/// edge on the border the whole box is one cell, owned by the site nearest its center.
fn carry_owners(border: &mut [Edge], sites: &SiteRegistry, bounds: &BoundingBox) {
    if border.is_empty() {
        return;
    }
    let Some(first) = border.iter().position(|e| e.left_site.is_some()) else {
        let owner = sites.nearest(bounds.center());
        for edge in border.iter_mut() {
            edge.left_site = owner;
        }
        return;
    };
    let n = border.len();
    let mut owner = border[first].left_site;
    for k in 1..n {
        let edge = &mut border[(first + k) % n];
        match edge.left_site {
            Some(_) => owner = edge.left_site,
            None => edge.left_site = owner,
        }
    }
}
