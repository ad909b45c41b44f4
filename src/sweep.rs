//! The sweep driver: runs the event loop over the beach line, then hands the edge
//! records to the clipper.

use crate::beachline::{BeachLine, SweepContext};
use crate::bounds::BoundingBox;
use crate::clip;
use crate::config::VoronoiConfig;
use crate::diagram::Diagram;
use crate::edge::{Edge, EdgeBuilder};
use crate::error::Result;
use crate::event::{Event, EventQueue};
use crate::geometry::Point;
use crate::site::SiteRegistry;
use rayon::prelude::*;

/// Counters collected during one computation.
///
/// None of these indicate a failure: degenerate events and ties are expected on
/// structured inputs and are resolved as part of the sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Site events processed. Coincident sites produce none.
    pub site_events: usize,
    /// Circle events that fired and produced a vertex.
    pub circle_events: usize,
    /// Converging triples dropped as collinear or with a zero radius.
    pub false_circle_events: usize,
    /// Cancelled circle events skipped by the queue.
    pub cancelled_circle_events: usize,
    /// Arcs removed together with a neighbour at a shared vertex.
    pub merged_vertices: usize,
    /// Input sites aliased to an earlier coincident site.
    pub duplicate_sites: usize,
    /// Edges dropped by the clipper because nothing of them is left inside the box.
    pub clipped_away: usize,
    /// Attempts to fix an already fixed edge end.
    pub refinalized_edges: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SweepState {
    Running,
    Closing,
    Done,
}

/// One invocation of the sweep. Owns the queue, the beach line and the edge pools.
struct Sweep<'a> {
    state: SweepState,
    sites: &'a SiteRegistry,
    bounds: &'a BoundingBox,
    close_cells: bool,
    eps: f64,
    queue: EventQueue,
    beach: BeachLine,
    edges: EdgeBuilder,
    stats: SweepStats,
    output: Vec<Edge>,
}

impl<'a> Sweep<'a> {
    fn new(sites: &'a SiteRegistry, bounds: &'a BoundingBox, config: &VoronoiConfig, eps: f64) -> Self {
        let n = sites.len();
        let mut queue = EventQueue::with_capacity(n);
        for &id in sites.sweep_order() {
            queue.push_site(id, sites.sweep_position(id));
        }

        Self {
            state: SweepState::Running,
            sites,
            bounds,
            close_cells: config.close_cells,
            eps,
            queue,
            beach: BeachLine::with_capacity(n),
            edges: EdgeBuilder::with_capacity(n),
            stats: SweepStats { duplicate_sites: sites.duplicates(), ..SweepStats::default() },
            output: Vec::new(),
        }
    }

    fn step(&mut self) {
        match self.state {
            SweepState::Running => match self.queue.pop_min() {
                Some(event) => self.handle(event),
                None => self.state = SweepState::Closing,
            },
            SweepState::Closing => {
                self.stats.cancelled_circle_events = self.queue.discarded();
                self.stats.refinalized_edges = self.edges.refinalized();
                self.output = clip::close(
                    &self.edges,
                    self.sites,
                    self.bounds,
                    self.eps,
                    self.close_cells,
                    &mut self.stats,
                );
                self.state = SweepState::Done;
            }
            SweepState::Done => {}
        }
    }

    fn handle(&mut self, event: Event) {
        let sweep_y = match event {
            Event::Site(site) => self.sites.sweep_position(site).y,
            Event::Circle { y, .. } => y,
        };
        let mut ctx = SweepContext {
            sites: self.sites,
            queue: &mut self.queue,
            edges: &mut self.edges,
            stats: &mut self.stats,
            eps: self.eps,
            sweep_y,
        };
        match event {
            Event::Site(site) => {
                tracing::trace!("site event {} at {:?}", site, ctx.sites.position(site));
                ctx.stats.site_events += 1;
                self.beach.insert_site(site, &mut ctx);
            }
            Event::Circle { id, arc, center, y } => {
                tracing::trace!("circle event {} removes arc {} at {:?}, sweep at {}", id, arc, center, y);
                ctx.stats.circle_events += 1;
                self.beach.remove_arc(arc, center, &mut ctx);
            }
        }
    }

    fn run(mut self) -> (Vec<Edge>, SweepStats) {
        while self.state != SweepState::Done {
            self.step();
        }
        (self.output, self.stats)
    }
}

/// Computes the Voronoi diagram of `sites` clipped to `bounds`.
///
/// Input validation happens before any geometry is computed: a non-finite coordinate,
/// an empty or inverted rectangle and an invalid configuration are all rejected.
pub fn compute<P>(sites: &[P], bounds: BoundingBox, config: &VoronoiConfig) -> Result<Diagram>
where
    P: Into<Point> + Copy,
{
    config.validate()?;
    bounds.validate()?;
    let eps = config.relative_tolerance * bounds.extent();

    let points: Vec<Point> = sites.iter().map(|&p| p.into()).collect();
    let registry = SiteRegistry::new(&points, eps)?;

    tracing::debug!(
        "sweeping {} sites ({} coincident) over {:?}, eps {:e}",
        registry.len(),
        registry.duplicates(),
        bounds,
        eps
    );

    let (edges, stats) = Sweep::new(&registry, &bounds, config, eps).run();

    tracing::debug!(
        "sweep done: {} edges, {} site events, {} circle events, {} false, {} merged",
        edges.len(),
        stats.site_events,
        stats.circle_events,
        stats.false_circle_events,
        stats.merged_vertices
    );

    let (sites, representative) = registry.into_sites();
    Ok(Diagram::new(sites, representative, edges, bounds, stats, eps))
}

/// Computes several independent diagrams in parallel, sharing one rectangle and
/// configuration.
pub fn compute_batch<P>(batches: &[Vec<P>], bounds: BoundingBox, config: &VoronoiConfig) -> Vec<Result<Diagram>>
where
    P: Into<Point> + Copy + Sync,
{
    batches
        .par_iter()
        .map(|sites| compute(sites, bounds, config))
        .collect()
}
