use crate::error::{Result, VoronoiError};
use crate::geometry::Point;
use std::cmp::Ordering;

/// An input site. Its `id` is the index it had in the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub id: usize,
    pub position: Point,
}

/// Total sweep order of two sites: by `y`, then `x`, then input index.
pub(crate) fn sweep_cmp(a: &Site, b: &Site) -> Ordering {
    a.position
        .y
        .total_cmp(&b.position.y)
        .then_with(|| a.position.x.total_cmp(&b.position.x))
        .then_with(|| a.id.cmp(&b.id))
}

/// Converts a flat `[x, y, x, y, ...]` buffer into points.
pub fn points_from_flat(coords: &[f64]) -> Result<Vec<Point>> {
    if coords.len() % 2 != 0 {
        return Err(VoronoiError::OddCoordinateCount { len: coords.len() });
    }
    Ok(coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
}

/// Validated input sites with their sweep order.
///
/// Sites closer than the tolerance in both coordinates are coincident: only the first
/// one in sweep order takes part in the sweep, the others are aliased to it. Sites within
/// the tolerance of the lowest `y` form the first row and are swept as if they shared it.
#[derive(Debug, Clone)]
pub(crate) struct SiteRegistry {
    sites: Vec<Site>,
    sweep_order: Vec<usize>,
    representative: Vec<usize>,
    first_row: f64,
    eps: f64,
}

impl SiteRegistry {
    pub fn new(points: &[Point], eps: f64) -> Result<Self> {
        let mut sites = Vec::with_capacity(points.len());
        for (id, &position) in points.iter().enumerate() {
            if !position.is_finite() {
                return Err(VoronoiError::NonFiniteSite { index: id, x: position.x, y: position.y });
            }
            sites.push(Site { id, position });
        }
        let first_row = sites.iter().map(|s| s.position.y).fold(f64::INFINITY, f64::min);

        let mut registry = Self { sites, sweep_order: Vec::new(), representative: Vec::new(), first_row, eps };
        let mut sorted: Vec<Site> = registry
            .sites
            .iter()
            .map(|s| Site { id: s.id, position: registry.sweep_position(s.id) })
            .collect();
        sorted.sort_unstable_by(sweep_cmp);

        let mut sweep_order: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut representative: Vec<usize> = (0..sorted.len()).collect();
        for site in &sorted {
            let position = registry.position(site.id);
            let duplicate_of = sweep_order
                .iter()
                .rev()
                .take_while(|&&kept| site.position.y - registry.sweep_position(kept).y <= 2.0 * eps)
                .find(|&&kept| position.approx_eq(registry.position(kept), eps))
                .copied();
            match duplicate_of {
                Some(kept) => representative[site.id] = kept,
                None => sweep_order.push(site.id),
            }
        }

        registry.sweep_order = sweep_order;
        registry.representative = representative;
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn position(&self, id: usize) -> Point {
        self.sites[id].position
    }

    /// Position used to order the site events: first-row sites are lowered onto the
    /// first row, every other site keeps its own position.
    pub fn sweep_position(&self, id: usize) -> Point {
        let p = self.sites[id].position;
        if self.in_first_row(p.y) {
            Point::new(p.x, self.first_row)
        } else {
            p
        }
    }

    /// Whether a sweep line at `y` still lies in the first row.
    pub fn in_first_row(&self, y: f64) -> bool {
        y - self.first_row <= self.eps
    }

    /// IDs of the sites taking part in the sweep, in sweep order.
    pub fn sweep_order(&self) -> &[usize] {
        &self.sweep_order
    }

    pub fn duplicates(&self) -> usize {
        self.sites.len() - self.sweep_order.len()
    }

    /// Nearest participating site to `p`, ties going to the lowest ID.
    pub fn nearest(&self, p: Point) -> Option<usize> {
        self.sweep_order
            .iter()
            .map(|&id| (id, self.sites[id].position.distance_sq(p)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    pub fn into_sites(self) -> (Vec<Site>, Vec<usize>) {
        (self.sites, self.representative)
    }
}
