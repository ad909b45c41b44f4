//! The beach line: the sequence of parabolic arcs above the sweep line.
//!
//! Arcs live in an arena addressed by [`ArcId`] with explicit `prev`/`next` links and a
//! free list. Next to the links, an order index (a vector of arc IDs sorted by integer
//! labels) gives binary search over the breakpoints, whose positions are recomputed from
//! the two sites and the sweep coordinate on every query and never stored.

use crate::edge::{EdgeBuilder, EdgeId};
use crate::event::{CircleId, EventQueue};
use crate::geometry::{Point, breakpoint_x, circle_event, circumcircle, parabola_y, turn};
use crate::site::SiteRegistry;
use crate::sweep::SweepStats;

pub(crate) type ArcId = usize;

/// Label spacing used when (re)labelling the order index.
const LABEL_GAP: u64 = 1 << 32;

#[derive(Clone, Copy, Debug)]
struct Arc {
    site: usize,
    prev: Option<ArcId>,
    next: Option<ArcId>,
    /// Edge traced by the breakpoint between `prev` and this arc.
    edge: Option<EdgeId>,
    circle: Option<CircleId>,
    label: u64,
}

/// Where a new site falls on the beach line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Located {
    /// The beach line has no arcs yet.
    Empty,
    /// Strictly inside the arc.
    Inside(ArcId),
    /// Right below the breakpoint between the two arcs.
    OnBreakpoint(ArcId, ArcId),
    /// Right of the last arc. Only happens for the sites of the first row, whose arcs are
    /// still vertical rays.
    RightOf(ArcId),
}

/// Everything an event touches besides the beach line itself.
pub(crate) struct SweepContext<'a> {
    pub sites: &'a SiteRegistry,
    pub queue: &'a mut EventQueue,
    pub edges: &'a mut EdgeBuilder,
    pub stats: &'a mut SweepStats,
    pub eps: f64,
    /// Position of the sweep line while the current event is handled.
    pub sweep_y: f64,
}

#[derive(Debug, Default)]
pub(crate) struct BeachLine {
    arcs: Vec<Arc>,
    free: Vec<ArcId>,
    order: Vec<ArcId>,
}

impl BeachLine {
    pub fn with_capacity(sites: usize) -> Self {
        Self {
            arcs: Vec::with_capacity(sites * 2),
            free: Vec::new(),
            order: Vec::with_capacity(sites * 2),
        }
    }

    /// Sites of the arcs from left to right.
    #[cfg(test)]
    pub fn sites_in_order(&self) -> Vec<usize> {
        self.order.iter().map(|&a| self.arcs[a].site).collect()
    }

    // --- order index ---

    fn index_of(&self, arc: ArcId) -> usize {
        let label = self.arcs[arc].label;
        match self.order.binary_search_by_key(&label, |&a| self.arcs[a].label) {
            Ok(i) => i,
            Err(i) => {
                debug_assert!(false, "arc {} missing from the order index", arc);
                i
            }
        }
    }

    fn relabel(&mut self) {
        for (i, &a) in self.order.iter().enumerate() {
            self.arcs[a].label = (i as u64 + 1) * LABEL_GAP;
        }
    }

    fn alloc(&mut self, site: usize) -> ArcId {
        let arc = Arc { site, prev: None, next: None, edge: None, circle: None, label: 0 };
        match self.free.pop() {
            Some(id) => {
                self.arcs[id] = arc;
                id
            }
            None => {
                self.arcs.push(arc);
                self.arcs.len() - 1
            }
        }
    }

    /// Inserts a new arc for `site` right after `anchor`, or as the only arc.
    fn insert_after(&mut self, anchor: Option<ArcId>, site: usize) -> ArcId {
        let id = self.alloc(site);
        let Some(anchor) = anchor else {
            debug_assert!(self.order.is_empty());
            self.arcs[id].label = LABEL_GAP;
            self.order.push(id);
            return id;
        };

        let next = self.arcs[anchor].next;
        let gap_closed = match next {
            Some(n) => self.arcs[n].label - self.arcs[anchor].label < 2,
            None => self.arcs[anchor].label.checked_add(LABEL_GAP).is_none(),
        };
        if gap_closed {
            self.relabel();
        }
        let lo = self.arcs[anchor].label;
        self.arcs[id].label = match next {
            Some(n) => lo + (self.arcs[n].label - lo) / 2,
            None => lo + LABEL_GAP,
        };

        let index = self.index_of(anchor);
        self.order.insert(index + 1, id);

        self.arcs[id].prev = Some(anchor);
        self.arcs[id].next = next;
        self.arcs[anchor].next = Some(id);
        if let Some(n) = next {
            self.arcs[n].prev = Some(id);
        }
        id
    }

    fn unlink(&mut self, arc: ArcId) {
        let index = self.index_of(arc);
        self.order.remove(index);

        let Arc { prev, next, .. } = self.arcs[arc];
        if let Some(p) = prev {
            self.arcs[p].next = next;
        }
        if let Some(n) = next {
            self.arcs[n].prev = prev;
        }
        self.arcs[arc].prev = None;
        self.arcs[arc].next = None;
        self.free.push(arc);
    }

    // --- queries ---

    /// x of the breakpoint between `order[i]` and `order[i + 1]`.
    fn breakpoint_at(&self, i: usize, sites: &SiteRegistry, directrix: f64) -> f64 {
        let left = sites.position(self.arcs[self.order[i]].site);
        let right = sites.position(self.arcs[self.order[i + 1]].site);
        breakpoint_x(left, right, directrix)
    }

    /// Finds the arc above `x` for the sweep line at `directrix`.
    pub fn locate(&self, x: f64, directrix: f64, sites: &SiteRegistry, eps: f64) -> Located {
        let n = self.order.len();
        if n == 0 {
            return Located::Empty;
        }
        // First-row sites arrive in x order and never fall inside an earlier arc.
        if sites.in_first_row(directrix) {
            return Located::RightOf(self.order[n - 1]);
        }

        // First breakpoint not strictly left of x.
        let (mut lo, mut hi) = (0, n - 1);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.breakpoint_at(mid, sites, directrix) < x - eps {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        let arc = self.order[lo];
        if lo + 1 < n && self.breakpoint_at(lo, sites, directrix) <= x + eps {
            return Located::OnBreakpoint(arc, self.order[lo + 1]);
        }
        Located::Inside(arc)
    }

    // --- circle events ---

    fn detach_circle(&mut self, arc: ArcId, queue: &mut EventQueue) {
        if let Some(circle) = self.arcs[arc].circle.take() {
            queue.invalidate(circle);
        }
    }

    /// Schedules the circle event of `arc` if its two breakpoints converge.
    fn attach_circle(&mut self, arc: ArcId, ctx: &mut SweepContext) {
        let (Some(prev), Some(next)) = (self.arcs[arc].prev, self.arcs[arc].next) else {
            return;
        };
        let (ls, ms, rs) = (self.arcs[prev].site, self.arcs[arc].site, self.arcs[next].site);
        if ls == rs {
            return;
        }
        let (l, m, r) = (ctx.sites.position(ls), ctx.sites.position(ms), ctx.sites.position(rs));

        let orientation = turn(l, m, r);
        let scale = (l - m).length() * (r - m).length();
        if orientation.abs() <= scale * 4.0 * f64::EPSILON {
            ctx.stats.false_circle_events += 1;
            tracing::trace!("collinear triple ({}, {}, {}) has no circle event", ls, ms, rs);
            return;
        }
        if orientation > 0.0 {
            return;
        }

        let Some((center, radius, y)) = circle_event(l, m, r) else {
            ctx.stats.false_circle_events += 1;
            return;
        };
        if radius <= ctx.eps {
            ctx.stats.false_circle_events += 1;
            tracing::trace!("triple ({}, {}, {}) has a zero-radius circle event", ls, ms, rs);
            return;
        }
        // A converging triple collapses no earlier than now; anything less is rounding.
        let y = if y < ctx.sweep_y {
            tracing::trace!("circle event of arc {} at {} moved up to the sweep line at {}", arc, y, ctx.sweep_y);
            ctx.sweep_y
        } else {
            y
        };

        let id = ctx.queue.push_circle(arc, center, y);
        self.arcs[arc].circle = Some(id);
    }

    /// Whether the live circle event of `arc` predicts `center`.
    fn collapses_at(&self, arc: ArcId, center: Point, queue: &EventQueue, eps: f64) -> bool {
        match self.arcs[arc].circle {
            Some(c) => queue.is_valid(c) && queue.circle(c).center.approx_eq(center, eps),
            None => false,
        }
    }

    fn finish_breakpoint(&self, left: ArcId, right: ArcId, vertex: usize, edges: &mut EdgeBuilder) {
        if let Some(edge) = self.arcs[right].edge {
            edges.finish(edge, self.arcs[left].site, self.arcs[right].site, vertex);
        }
    }

    // --- events ---

    /// Handles the site event of `site`.
    pub fn insert_site(&mut self, site: usize, ctx: &mut SweepContext) {
        let p = ctx.sites.position(site);

        match self.locate(p.x, ctx.sweep_y, ctx.sites, ctx.eps) {
            Located::Empty => {
                self.insert_after(None, site);
            }
            Located::RightOf(last) => {
                let last_site = self.arcs[last].site;
                let q = ctx.sites.position(last_site);
                let arc = self.insert_after(Some(last), site);
                let edge = ctx.edges.open((last_site, q), (site, p), q.midpoint(p));
                self.arcs[arc].edge = Some(edge);
                // Only converges when the row is not exactly level.
                self.attach_circle(last, ctx);
            }
            Located::Inside(arc) => {
                self.detach_circle(arc, ctx.queue);

                let arc_site = self.arcs[arc].site;
                let q = ctx.sites.position(arc_site);
                let edge = ctx.edges.open((arc_site, q), (site, p), q.midpoint(p));

                // (arc) becomes (arc, new, copy); the breakpoint right of the copy keeps
                // the edge stored on the old right neighbour.
                let new = self.insert_after(Some(arc), site);
                let copy = self.insert_after(Some(new), arc_site);
                self.arcs[new].edge = Some(edge);
                self.arcs[copy].edge = Some(edge);

                self.attach_circle(arc, ctx);
                self.attach_circle(copy, ctx);
            }
            Located::OnBreakpoint(left, right) => {
                self.detach_circle(left, ctx.queue);
                self.detach_circle(right, ctx.queue);

                let (ls, rs) = (self.arcs[left].site, self.arcs[right].site);
                let (l, r) = (ctx.sites.position(ls), ctx.sites.position(rs));
                let center = circumcircle(l, p, r)
                    .map(|(c, _)| c)
                    .or_else(|| parabola_y(l, p.x, p.y).map(|y| Point::new(p.x, y)))
                    .or_else(|| parabola_y(r, p.x, p.y).map(|y| Point::new(p.x, y)))
                    .unwrap_or(p);
                let vertex = ctx.edges.add_vertex(center);
                self.finish_breakpoint(left, right, vertex, ctx.edges);

                let arc = self.insert_after(Some(left), site);
                self.arcs[arc].edge = Some(ctx.edges.open_at((ls, l), (site, p), vertex));
                self.arcs[right].edge = Some(ctx.edges.open_at((site, p), (rs, r), vertex));

                self.attach_circle(left, ctx);
                self.attach_circle(right, ctx);
            }
        }
    }

    /// Handles the circle event of `arc`, which disappears at `center`.
    ///
    /// Neighbouring arcs that collapse at the same point are removed in the same step,
    /// so a vertex shared by more than three sites is emitted once.
    pub fn remove_arc(&mut self, arc: ArcId, center: Point, ctx: &mut SweepContext) {
        let mut first = arc;
        while let Some(prev) = self.arcs[first].prev {
            if !self.collapses_at(prev, center, ctx.queue, ctx.eps) {
                break;
            }
            first = prev;
        }
        let mut last = arc;
        while let Some(next) = self.arcs[last].next {
            if !self.collapses_at(next, center, ctx.queue, ctx.eps) {
                break;
            }
            last = next;
        }
        let (Some(left), Some(right)) = (self.arcs[first].prev, self.arcs[last].next) else {
            tracing::warn!("circle event of arc {} fired without two neighbours", arc);
            return;
        };

        let vertex = ctx.edges.add_vertex(center);

        // Every breakpoint from `left` to `right` ends at the vertex.
        let mut current = first;
        loop {
            let prev = self.arcs[current].prev.unwrap_or(left);
            self.finish_breakpoint(prev, current, vertex, ctx.edges);
            match self.arcs[current].next {
                Some(next) if current != right => current = next,
                _ => break,
            }
        }

        let mut removed = 0;
        let mut current = first;
        loop {
            let next = self.arcs[current].next;
            self.detach_circle(current, ctx.queue);
            self.unlink(current);
            removed += 1;
            match next {
                Some(n) if current != last => current = n,
                _ => break,
            }
        }
        ctx.stats.merged_vertices += removed - 1;

        self.detach_circle(left, ctx.queue);
        self.detach_circle(right, ctx.queue);

        let (ls, rs) = (self.arcs[left].site, self.arcs[right].site);
        if ls == rs {
            tracing::warn!("arcs of site {} met at vertex {:?}; no edge opened", ls, center);
            self.arcs[right].edge = None;
        } else {
            let (l, r) = (ctx.sites.position(ls), ctx.sites.position(rs));
            self.arcs[right].edge = Some(ctx.edges.open_at((ls, l), (rs, r), vertex));
        }

        self.attach_circle(left, ctx);
        self.attach_circle(right, ctx);
    }
}
