use criterion::{
    criterion_group, criterion_main, black_box, Criterion,
};

use cgmath::Point2;
use hull::Hull;


/// A regular n-gon with radius 1 around the origin.
fn ngon(n: usize) -> Vec<Point2<f64>> {
    (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::PI * 2.0;
            Point2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Imports a 64-gon and repeatedly splits the first face of every new fan.
fn split_hull(depth: usize) -> Hull<Point2<f64>> {
    let (mut hull, mut face) = Hull::from_polygon(ngon(64)).unwrap();
    for i in 0..depth {
        let v = face.split(&mut hull, Point2::new(0.0, i as f64 * 1e-3)).unwrap();
        face = v.faces(&hull).next().unwrap();
    }
    hull
}



// ===============================================================================================
// ===== Benchmarks
// ===============================================================================================

fn add_polygon(c: &mut Criterion) {
    let points = ngon(1024);
    c.bench_function("add_polygon_1024", |b| {
        b.iter(|| {
            let mut hull = Hull::new();
            black_box(hull.add_polygon(points.iter().cloned()).unwrap());
        })
    });
}

fn split_face(c: &mut Criterion) {
    c.bench_function("split_face_1024", |b| {
        let points = ngon(1024);
        b.iter(|| {
            let (mut hull, face) = Hull::from_polygon(points.iter().cloned()).unwrap();
            black_box(face.split(&mut hull, Point2::new(0.0, 0.0)).unwrap());
        })
    });
}

fn circulate(c: &mut Criterion) {
    c.bench_function("circulate_fan_vertices", |b| {
        let (mut hull, face) = Hull::from_polygon(ngon(1024)).unwrap();
        let center = face.split(&mut hull, Point2::new(0.0, 0.0)).unwrap();

        b.iter(|| {
            let hull = black_box(&hull);
            black_box(center.neighbors(hull).sequence().count());
        })
    });
}

fn exports(c: &mut Criterion) {
    let hull = split_hull(256);

    c.bench_function("triangle_indices", |b| {
        b.iter(|| black_box(black_box(&hull).triangle_indices()))
    });
    c.bench_function("line_indices", |b| {
        b.iter(|| black_box(black_box(&hull).line_indices()))
    });
    c.bench_function("vertex_array", |b| {
        b.iter(|| black_box(black_box(&hull).vertex_array()))
    });
}


criterion_group!(benches,
    add_polygon,
    split_face,
    circulate,
    exports,
);
criterion_main!(benches);
