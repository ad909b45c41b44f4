use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vorosweep::{BoundingBox, Diagram, Point, VoronoiConfig, compute};

const TOL: f64 = 1e-6;

fn random_sites(seed: u64, count: usize, bounds: &BoundingBox) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(bounds.min[0]..bounds.max[0]),
                rng.gen_range(bounds.min[1]..bounds.max[1]),
            )
        })
        .collect()
}

/// A square lattice: every inner vertex is shared by four cells.
fn lattice(n: usize, spacing: f64) -> Vec<Point> {
    let mut sites = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            sites.push(Point::new((i as f64 + 0.5) * spacing, (j as f64 + 0.5) * spacing));
        }
    }
    sites
}

fn inputs() -> Vec<(String, BoundingBox, Vec<Point>)> {
    let square = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    let wide = BoundingBox::new([-50.0, 10.0], [250.0, 60.0]);
    let mut cases = Vec::new();
    for seed in 0..5 {
        cases.push((format!("square seed {}", seed), square, random_sites(seed, 200, &square)));
        cases.push((format!("wide seed {}", seed), wide, random_sites(100 + seed, 80, &wide)));
    }
    cases.push(("lattice".to_string(), square, lattice(8, 125.0)));
    cases
}

fn check_bounds(name: &str, diagram: &Diagram) {
    let b = diagram.bounds();
    for e in diagram.edges() {
        for p in [e.start, e.end] {
            assert!(
                p.x >= b.min[0] && p.x <= b.max[0] && p.y >= b.min[1] && p.y <= b.max[1],
                "{}: endpoint {:?} outside {:?}",
                name,
                p,
                b
            );
        }
    }
}

fn check_bisectors(name: &str, diagram: &Diagram) {
    let sites = diagram.sites();
    let scale = diagram.bounds().width().max(diagram.bounds().height());
    for e in diagram.interior_edges() {
        let (Some(l), Some(r)) = (e.left_site, e.right_site) else {
            panic!("{}: interior edge without two sites", name);
        };
        let (pl, pr) = (sites[l].position, sites[r].position);
        for p in [e.start, e.end, e.start.midpoint(e.end)] {
            let diff = p.distance(pl) - p.distance(pr);
            assert!(diff.abs() < TOL * scale, "{}: {:?} is off the bisector of {} and {} by {}", name, p, l, r, diff);
        }
        // Left site on the left going from start to end.
        assert!((e.end - e.start).cross(pl - e.start) > 0.0, "{}: edge {:?} has its left site on the right", name, e);
    }
    for e in diagram.border_edges() {
        assert!(e.right_site.is_none());
    }
}

fn check_closure(name: &str, diagram: &Diagram) {
    for i in 0..diagram.sites().len() {
        let mut degree: Vec<(Point, i32)> = Vec::new();
        for e in diagram.edges().iter().filter(|e| e.borders(i)) {
            for (p, d) in [(e.start, 1), (e.end, -1)] {
                let d = if e.left_site == Some(i) { d } else { -d };
                match degree.iter_mut().find(|(q, _)| q.approx_eq(p, TOL)) {
                    Some(entry) => entry.1 += d,
                    None => degree.push((p, d)),
                }
            }
        }
        for (p, d) in degree {
            assert_eq!(d, 0, "{}: cell {} has a dangling end at {:?}", name, i, p);
        }
    }
}

fn check_areas(name: &str, diagram: &Diagram) {
    let total: f64 = diagram.map(|c| c.area()).iter().sum();
    let expected = diagram.bounds().area();
    assert!(
        (total - expected).abs() < expected * 1e-9,
        "{}: cells cover {} instead of {}",
        name,
        total,
        expected
    );

    for (i, site) in diagram.sites().iter().enumerate() {
        let cell = diagram.cell(i);
        assert!(!cell.is_empty(), "{}: cell {} is empty", name, i);
        // Every vertex of the cell is at least as close to its site as to any other site.
        for v in cell.points() {
            let own = v.distance(site.position);
            let nearest = diagram
                .sites()
                .iter()
                .map(|s| v.distance(s.position))
                .fold(f64::INFINITY, f64::min);
            assert!(own - nearest < TOL * 1e3, "{}: vertex {:?} of cell {} belongs elsewhere", name, v, i);
        }
    }
}

#[test]
fn test_edges_stay_inside_bounds() {
    for (name, bounds, sites) in inputs() {
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        check_bounds(&name, &diagram);
    }
}

#[test]
fn test_interior_edges_lie_on_bisectors() {
    for (name, bounds, sites) in inputs() {
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        check_bisectors(&name, &diagram);
    }
}

#[test]
fn test_cells_are_closed() {
    for (name, bounds, sites) in inputs() {
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        check_closure(&name, &diagram);
    }
}

#[test]
fn test_cells_tile_the_box() {
    for (name, bounds, sites) in inputs() {
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        check_areas(&name, &diagram);
    }
}

#[test]
fn test_one_edge_per_adjacent_pair() {
    for (name, bounds, sites) in inputs() {
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        let mut pairs: Vec<(usize, usize)> = diagram
            .interior_edges()
            .filter_map(|e| Some((e.left_site?.min(e.right_site?), e.left_site?.max(e.right_site?))))
            .collect();
        let count = pairs.len();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), count, "{}: a pair of sites has more than one edge", name);
    }
}

#[test]
fn test_lattice_merges_vertices() {
    let diagram = compute(&lattice(8, 125.0), BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]), &VoronoiConfig::default()).unwrap();
    // 7 x 7 inner vertices of degree four, each replacing two degree-three vertices.
    assert_eq!(diagram.stats().merged_vertices, 49);
    // 2 * 8 * 7 interior edges plus 8 border edges per side.
    assert_eq!(diagram.interior_edges().count(), 112);
    assert_eq!(diagram.border_edges().count(), 32);
    for i in 0..64 {
        assert!((diagram.cell(i).area() - 125.0 * 125.0).abs() < 1e-6);
    }
}

#[test]
fn test_sites_outside_the_box() {
    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    // The third site sits on the top side; the second one is far out on the left.
    let sites = [[50.0, 50.0], [-500.0, 50.0], [50.0, 100.0]];
    let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
    check_bounds("outside", &diagram);
    check_closure("outside", &diagram);

    assert!(diagram.cell(1).is_empty(), "the far site has no part of the box");
    let inside = diagram.cell(0).area() + diagram.cell(2).area();
    assert!((inside - 10_000.0).abs() < 1e-6, "got {}", inside);
    assert!((diagram.cell(0).area() - 7_500.0).abs() < 1e-6);
}

#[test]
fn test_collinear_sites() {
    let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    for sites in [
        vec![[100.0, 500.0], [300.0, 500.0], [600.0, 500.0], [900.0, 500.0]],
        vec![[500.0, 100.0], [500.0, 300.0], [500.0, 600.0], [500.0, 900.0]],
        vec![[100.0, 100.0], [400.0, 400.0], [600.0, 600.0], [900.0, 900.0]],
    ] {
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        assert_eq!(diagram.interior_edges().count(), 3, "{:?}", sites);
        assert_eq!(diagram.stats().circle_events, 0);
        check_closure("collinear", &diagram);
        check_areas("collinear", &diagram);
    }
}

/// Moves every lattice site by up to `jitter` along each axis.
fn jittered_lattice(seed: u64, n: usize, spacing: f64, jitter: f64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    lattice(n, spacing)
        .into_iter()
        .map(|p| Point::new(p.x + rng.gen_range(-jitter..=jitter), p.y + rng.gen_range(-jitter..=jitter)))
        .collect()
}

#[test]
fn test_lattice_jittered_around_tolerance() {
    let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    // eps is 1e-6 on this box.
    for (seed, k) in [0.5, 1.0, 2.0, 3.0].into_iter().enumerate() {
        let sites = jittered_lattice(seed as u64, 8, 125.0, k * 1e-6);
        let name = format!("lattice jittered by {} eps", k);
        let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
        check_bounds(&name, &diagram);
        check_bisectors(&name, &diagram);
        check_closure(&name, &diagram);
        check_areas(&name, &diagram);
    }
}

#[test]
fn test_sites_just_above_the_first_row() {
    let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    let sites = [[250.0, 0.0], [499.999999, 1e-6], [500.000001, 1e-6], [0.0, 250.0]];
    let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
    check_bounds("first row", &diagram);
    check_closure("first row", &diagram);
    check_areas("first row", &diagram);
    // Site 2 owns everything right of x = 500.
    assert!(diagram.cell(2).area() > 400_000.0, "got {}", diagram.cell(2).area());
}

#[test]
fn test_near_ties_at_the_border() {
    let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    let sites = [[250.0, 1000.0], [499.999998, 249.999999], [1e-6, 749.999998], [750.000001, 500.000001]];
    let diagram = compute(&sites, bounds, &VoronoiConfig::default()).unwrap();
    check_bounds("near ties", &diagram);
    check_closure("near ties", &diagram);
    check_areas("near ties", &diagram);
}
