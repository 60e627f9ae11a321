use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rayprep::{
    geometry::{Triangle, Vector4},
    scene::{Bvh, DEFAULT_BV_MIN_DELTA, Face},
};

/// Wavy height field of `2 * size * size` faces.
fn terrain(size: usize) -> Vec<Face> {
    let height = |x: usize, y: usize| ((x as f32 * 0.3).sin() + (y as f32 * 0.2).cos()) * 2.0;
    let vertex = |x: usize, y: usize| Vector4::point(x as f32, y as f32, height(x, y));

    let mut faces = Vec::with_capacity(2 * size * size);
    for y in 0..size {
        for x in 0..size {
            let quad = [
                vertex(x, y),
                vertex(x + 1, y),
                vertex(x + 1, y + 1),
                vertex(x, y + 1),
            ];
            for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
                let index = faces.len();
                faces.push(Face::flat(
                    Triangle::new(quad[a], quad[b], quad[c]),
                    index,
                    None,
                ));
            }
        }
    }
    faces
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_bvh");
    for size in [16, 64, 256] {
        let faces = terrain(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(faces.len()),
            &faces,
            |b, faces| b.iter(|| Bvh::build(black_box(faces), DEFAULT_BV_MIN_DELTA)),
        );
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
