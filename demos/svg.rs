use plotters::prelude::*;
use rand::Rng;
use vorosweep::{BoundingBox, Voronoi};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_example("voronoi_random.svg", 0, |_| {})?;

    run_example("voronoi_relaxed.svg", 0, |voronoi| {
        for _ in 0..10 {
            voronoi.relax().expect("relaxation of random sites");
        }
    })?;

    // A lattice is full of cocircular quadruples and collinear rows.
    run_example("voronoi_lattice.svg", 0, |voronoi| {
        let mut sites = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                sites.push(5.0 + i as f64 * 10.0);
                sites.push(5.0 + j as f64 * 10.0);
            }
        }
        voronoi.set_sites(&sites).expect("even coordinate count");
    })?;

    run_example("voronoi_cells.svg", 200, |_| {})?;

    Ok(())
}

/// Draws the edges of a diagram, or its cells when `cells` random sites are requested.
fn run_example<F>(filename: &str, cells: usize, setup: F) -> Result<(), Box<dyn std::error::Error>>
where F: Fn(&mut Voronoi) {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    let mut voronoi = Voronoi::new(bounds);

    let mut rng = rand::thread_rng();
    let count = if cells > 0 { cells } else { 500 };
    let mut sites = Vec::with_capacity(count * 2);
    for _ in 0..count {
        sites.push(rng.gen_range(0.0..100.0));
        sites.push(rng.gen_range(0.0..100.0));
    }
    voronoi.set_sites(&sites)?;

    setup(&mut voronoi);

    voronoi.calculate()?;
    let Some(diagram) = voronoi.diagram() else {
        return Ok(());
    };

    if cells > 0 {
        for cell in diagram.cells() {
            if cell.is_empty() {
                continue;
            }
            let mut poly: Vec<(f64, f64)> = cell.points().map(|p| (p.x, p.y)).collect();
            chart.draw_series(std::iter::once(Polygon::new(
                poly.clone(),
                BLUE.mix(0.1).filled(),
            )))?;
            poly.push(poly[0]);
            chart.draw_series(std::iter::once(PathElement::new(poly, BLACK.mix(0.5))))?;
        }
    } else {
        // Draw edges, border edges thicker
        chart.draw_series(diagram.edges().iter().map(|e| {
            let style = if e.is_border() { BLACK.stroke_width(2) } else { BLACK.mix(0.6).stroke_width(1) };
            PathElement::new(vec![(e.start.x, e.start.y), (e.end.x, e.end.y)], style)
        }))?;
    }

    // Draw sites
    let points: Vec<(f64, f64)> = voronoi.sites().chunks(2).map(|c| (c[0], c[1])).collect();
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 2, RED.filled())))?;

    root.present()?;
    println!("Output saved to {} ({} edges)", filename, diagram.count_edges());
    Ok(())
}
