use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crosslist::similarity::most_similar_reviewer;
use crosslist::RatingMatrix;

/// Deterministic sparse fill: roughly two thirds of the grid is rated.
fn fill(matrix: &mut RatingMatrix, reviewers: u64, movies: u64) {
    for reviewer in 1..=reviewers {
        for movie in 1..=movies {
            if (reviewer + movie) % 3 != 0 {
                let score = 1.0 + ((reviewer * 7 + movie * 3) % 9) as f64 / 2.0;
                matrix.add_rating(reviewer, movie, score).unwrap();
            }
        }
    }
}

fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("rating_matrix");

    let shapes = [(100u64, 50u64), (400, 100)];
    for (reviewers, movies) in shapes {
        let n = reviewers * movies;
        group.bench_with_input(BenchmarkId::new("build", n), &n, |bencher, _| {
            bencher.iter(|| {
                let mut matrix = RatingMatrix::default();
                fill(&mut matrix, black_box(reviewers), black_box(movies));
                black_box(matrix)
            })
        });

        // Build once for the query benches.
        let mut matrix = RatingMatrix::default();
        fill(&mut matrix, reviewers, movies);

        group.bench_with_input(BenchmarkId::new("get_rating", n), &n, |bencher, _| {
            bencher.iter(|| {
                let score = matrix.get_rating(black_box(reviewers / 2), black_box(movies / 2 + 1));
                black_box(score)
            })
        });

        group.bench_with_input(
            BenchmarkId::new("most_similar_reviewer", n),
            &n,
            |bencher, _| {
                bencher.iter(|| {
                    let neighbor = most_similar_reviewer(&matrix, black_box(reviewers / 2));
                    black_box(neighbor)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_matrix);
criterion_main!(benches);
