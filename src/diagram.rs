use crate::bounds::BoundingBox;
use crate::cell::Cell;
use crate::config::VoronoiConfig;
use crate::edge::Edge;
use crate::error::Result;
use crate::site::{Site, points_from_flat};
use crate::sweep::{SweepStats, compute};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// The result of a computation: the clipped edge set and the sites it was built from.
#[derive(Clone, Debug)]
pub struct Diagram {
    sites: Vec<Site>,
    representative: Vec<usize>,
    edges: Vec<Edge>,
    bounds: BoundingBox,
    stats: SweepStats,
    eps: f64,
}

impl Diagram {
    pub(crate) fn new(
        sites: Vec<Site>,
        representative: Vec<usize>,
        edges: Vec<Edge>,
        bounds: BoundingBox,
        stats: SweepStats,
        eps: f64,
    ) -> Self {
        Self { sites, representative, edges, bounds, stats, eps }
    }

    /// All edges, interior edges first.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn stats(&self) -> &SweepStats {
        &self.stats
    }

    pub fn count_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn interior_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !e.is_border())
    }

    pub fn border_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.is_border())
    }

    /// The site that stands in for `site` in the diagram: itself, or the first of a group
    /// of coincident sites.
    pub fn representative(&self, site: usize) -> usize {
        self.representative[site]
    }

    /// Sites sharing an interior edge with `site`, sorted by ID.
    pub fn neighbors(&self, site: usize) -> Vec<usize> {
        let site = self.representative(site);
        let mut neighbors: Vec<usize> = self
            .interior_edges()
            .filter_map(|e| e.neighbor_of(site))
            .map(|n| n as usize)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// The cell of `site`. Coincident sites share the cell of their representative.
    pub fn cell(&self, site: usize) -> Cell {
        Cell::assemble(site, self.representative(site), &self.edges, self.eps)
    }

    pub fn cells(&self) -> Vec<Cell> {
        (0..self.sites.len()).into_par_iter().map(|i| self.cell(i)).collect()
    }

    /// Assembles every cell and applies `f` to it in parallel, without keeping the cells.
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&Cell) -> T + Send + Sync,
    {
        (0..self.sites.len()).into_par_iter().map(|i| f(&self.cell(i))).collect()
    }

    /// Absolute tolerance the diagram was computed with.
    pub fn tolerance(&self) -> f64 {
        self.eps
    }
}

/// A stateful diagram over a fixed rectangle: sites are set, moved or generated, then
/// the diagram is (re)calculated.
#[derive(Clone, Debug)]
pub struct Voronoi {
    bounds: BoundingBox,
    config: VoronoiConfig,
    sites: Vec<f64>,
    diagram: Option<Diagram>,
}

impl Voronoi {
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_config(bounds, VoronoiConfig::default())
    }

    pub fn with_config(bounds: BoundingBox, config: VoronoiConfig) -> Self {
        Self { bounds, config, sites: Vec::new(), diagram: None }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    /// Replaces all sites.
    ///
    /// # Arguments
    /// * `sites` - A flat array of coordinates `[x, y, x, y, ...]`.
    pub fn set_sites(&mut self, sites: &[f64]) -> Result<()> {
        points_from_flat(sites)?;
        self.sites = sites.to_vec();
        self.diagram = None;
        Ok(())
    }

    /// Moves one site. Indices past the end are ignored.
    pub fn set_site(&mut self, index: usize, x: f64, y: f64) {
        let offset = index * 2;
        if offset + 1 < self.sites.len() {
            self.sites[offset] = x;
            self.sites[offset + 1] = y;
            self.diagram = None;
        }
    }

    /// Places `count` uniformly random sites inside the rectangle.
    pub fn random_sites(&mut self, count: usize) {
        self.random_sites_seeded(count, get_seed());
    }

    pub fn random_sites_seeded(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let w = self.bounds.width();
        let h = self.bounds.height();

        let mut points = Vec::with_capacity(count * 2);
        for _ in 0..count {
            points.push(self.bounds.min[0] + rng.r#gen::<f64>() * w);
            points.push(self.bounds.min[1] + rng.r#gen::<f64>() * h);
        }
        self.sites = points;
        self.diagram = None;
    }

    pub fn calculate(&mut self) -> Result<()> {
        let points = points_from_flat(&self.sites)?;
        self.diagram = Some(compute(&points, self.bounds, &self.config)?);
        Ok(())
    }

    /// Performs one step of Lloyd's relaxation.
    ///
    /// Each site moves to the centroid of its cell, which tends to make the cells more
    /// uniform in size and shape. Sites with an empty cell stay where they are. The
    /// diagram is recalculated if needed, both before and after the move.
    pub fn relax(&mut self) -> Result<()> {
        if self.diagram.is_none() {
            self.calculate()?;
        }
        let Some(diagram) = &self.diagram else {
            return Ok(());
        };

        let new_sites: Vec<f64> = self
            .sites
            .par_chunks(2)
            .enumerate()
            .flat_map(|(i, original)| {
                let site = diagram.representative(i);
                let cell = diagram.cell(site);
                if site != i || cell.is_empty() {
                    original.to_vec()
                } else {
                    cell.centroid().to_vec()
                }
            })
            .collect();

        self.sites = new_sites;
        self.calculate()
    }

    pub fn count_sites(&self) -> usize {
        self.sites.len() / 2
    }

    pub fn sites(&self) -> &[f64] {
        &self.sites
    }

    pub fn get_site(&self, index: usize) -> Option<[f64; 2]> {
        self.sites.get(index * 2..index * 2 + 2).map(|s| [s[0], s[1]])
    }

    /// Number of edges of the last calculated diagram, 0 before the first calculation.
    pub fn count_edges(&self) -> usize {
        self.diagram.as_ref().map_or(0, Diagram::count_edges)
    }

    pub fn get_edge(&self, index: usize) -> Option<&Edge> {
        self.diagram.as_ref()?.edges().get(index)
    }

    /// The last calculated diagram. Cleared whenever the sites change.
    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}
