use serde::Deserialize;
use vorosweep::{BoundingBox, Diagram, Point, VoronoiConfig, compute};

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    bounds: [f64; 4],
    sites: Vec<[f64; 2]>,
    edges: usize,
    interior: usize,
    #[serde(default)]
    duplicates: usize,
    #[serde(default)]
    merged: Option<usize>,
    #[serde(default)]
    contains: Vec<[f64; 4]>,
}

fn load() -> Vec<Fixture> {
    serde_json::from_str(include_str!("fixtures/degenerate.json")).expect("fixture file parses")
}

fn has_segment(diagram: &Diagram, s: [f64; 4]) -> bool {
    let (a, b) = (Point::new(s[0], s[1]), Point::new(s[2], s[3]));
    diagram.edges().iter().any(|e| {
        (e.start.approx_eq(a, 1e-6) && e.end.approx_eq(b, 1e-6))
            || (e.start.approx_eq(b, 1e-6) && e.end.approx_eq(a, 1e-6))
    })
}

#[test]
fn test_degenerate_fixtures() {
    let fixtures = load();
    assert!(!fixtures.is_empty());

    for f in fixtures {
        let [min_x, min_y, max_x, max_y] = f.bounds;
        let bounds = BoundingBox::from_extents(min_x, min_y, max_x, max_y);
        let diagram = compute(&f.sites, bounds, &VoronoiConfig::default())
            .unwrap_or_else(|e| panic!("{}: {}", f.name, e));

        assert_eq!(diagram.count_edges(), f.edges, "{}: edge count", f.name);
        assert_eq!(diagram.interior_edges().count(), f.interior, "{}: interior edge count", f.name);
        assert_eq!(diagram.stats().duplicate_sites, f.duplicates, "{}: duplicates", f.name);
        if let Some(merged) = f.merged {
            assert_eq!(diagram.stats().merged_vertices, merged, "{}: merged vertices", f.name);
        }
        for s in &f.contains {
            assert!(has_segment(&diagram, *s), "{}: missing segment {:?}", f.name, s);
        }

        let covered: f64 = (0..f.sites.len())
            .filter(|&i| diagram.representative(i) == i)
            .map(|i| diagram.cell(i).area())
            .sum();
        assert!(
            (covered - bounds.area()).abs() < bounds.area() * 1e-9,
            "{}: cells cover {} of {}",
            f.name,
            covered,
            bounds.area()
        );

        for e in diagram.edges() {
            assert!(e.length() > 0.0, "{}: zero-length edge {:?}", f.name, e);
            for p in [e.start, e.end] {
                assert!(bounds.contains(p, 0.0), "{}: {:?} outside the box", f.name, p);
            }
        }
    }
}

#[test]
fn test_fixtures_without_border_edges() {
    let config = VoronoiConfig::new().with_close_cells(false);
    for f in load() {
        let [min_x, min_y, max_x, max_y] = f.bounds;
        let bounds = BoundingBox::from_extents(min_x, min_y, max_x, max_y);
        let diagram = compute(&f.sites, bounds, &config).unwrap();
        assert_eq!(diagram.count_edges(), f.interior, "{}", f.name);
    }
}

#[test]
fn test_coincident_sites_share_a_cell() {
    let f = load().into_iter().find(|f| f.name == "coincident sites").unwrap();
    let bounds = BoundingBox::from_extents(f.bounds[0], f.bounds[1], f.bounds[2], f.bounds[3]);
    let diagram = compute(&f.sites, bounds, &VoronoiConfig::default()).unwrap();

    assert_eq!(diagram.representative(2), 0);
    assert_eq!(diagram.representative(3), 1);
    assert_eq!(diagram.cell(3).vertices(), diagram.cell(1).vertices());
    assert!((diagram.cell(2).area() - 500_000.0).abs() < 1e-6);
}

#[test]
fn test_mirrored_site_keeps_the_whole_box() {
    for f in load().into_iter().filter(|f| f.name.starts_with("sites mirrored")) {
        let bounds = BoundingBox::from_extents(f.bounds[0], f.bounds[1], f.bounds[2], f.bounds[3]);
        let diagram = compute(&f.sites, bounds, &VoronoiConfig::default()).unwrap();
        let inside = (0..2).find(|&i| bounds.contains(diagram.sites()[i].position, 0.0)).unwrap();

        assert!(diagram.cell(1 - inside).is_empty(), "{}", f.name);
        assert!((diagram.cell(inside).area() - bounds.area()).abs() < 1e-6, "{}", f.name);
        for e in diagram.border_edges() {
            assert_eq!(e.left_site, Some(inside), "{}: {:?}", f.name, e);
        }
    }
}
