use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo_types::{Coord, Geometry, LineString, Polygon};
use gridcover::{rasterize, Bounds, Grid};

fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Geometry<f64> {
    let coords: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let t = (i as f64 / n as f64) * std::f64::consts::TAU;
            Coord {
                x: cx + r * t.cos(),
                y: cy + r * t.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::from(coords), vec![]).into()
}

fn checkerboard(count: usize, size: f64, offset: f64) -> Vec<Geometry<f64>> {
    let mut ret = Vec::new();
    for i in 0..count {
        for j in 0..count {
            let x = i as f64 * offset;
            let y = j as f64 * offset;
            let coords = vec![
                Coord { x, y },
                Coord { x: x + size, y },
                Coord { x: x + size, y: y + size },
                Coord { x, y: y + size },
            ];
            ret.push(Polygon::new(LineString::from(coords), vec![]).into());
        }
    }
    ret
}

fn big_circle(c: &mut Criterion) {
    let grid = Grid::new(Bounds::new(0.0, 0.0, 512.0, 512.0), 512, 512).unwrap();
    let geometry = circle(256.0, 256.0, 200.0, 1024);

    c.bench_function("circle with 1024 vertices on a 512x512 grid", |b| {
        b.iter(|| rasterize([black_box(&geometry)], &grid))
    });
}

fn small_squares(c: &mut Criterion) {
    let grid = Grid::new(Bounds::new(0.0, 0.0, 400.0, 400.0), 256, 256).unwrap();
    let squares = checkerboard(10, 30.0, 40.0);

    c.bench_function("100 squares on a 256x256 grid", |b| {
        b.iter(|| rasterize(black_box(&squares).iter(), &grid))
    });
}

criterion_group!(benches, big_circle, small_squares);
criterion_main!(benches);
