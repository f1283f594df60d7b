use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashflood::collision::equivalent_substrings::{generate_equivalent, Seed};
use hashflood::collision::meet_in_the_middle::{generate_mitm, LookupTable, SearchParams};
use hashflood::hashing::{DJBX31A, DJBX33A, DJBX33X, V8};

fn bench_hash_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");
    let key = "xwxwxwxwxwyXyXz9z9z9";
    for function in [DJBX31A, DJBX33A, DJBX33X, V8] {
        group.bench_function(function.name(), |b| b.iter(|| function.hash(black_box(key))));
    }
    group.finish();
}

fn bench_equivalent_substrings(c: &mut Criterion) {
    let seed = Seed::new(["xw", "yX", "z9"], &DJBX31A).unwrap();
    let mut group = c.benchmark_group("equivalent_substrings");
    for count in [1_000usize, 10_000, 85_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| generate_equivalent(&seed, count).unwrap())
        });
    }
    group.finish();
}

fn bench_lookup_table(c: &mut Criterion) {
    let params = SearchParams::builder().rng_seed(1).build().unwrap();
    let target = V8.hash("hashes");
    c.bench_function("lookup_table_v8", |b| {
        b.iter(|| LookupTable::build(&V8, black_box(target), &params).unwrap())
    });
}

fn bench_meet_in_the_middle(c: &mut Criterion) {
    let params = SearchParams::builder().rng_seed(1).build().unwrap();
    let mut group = c.benchmark_group("meet_in_the_middle");
    group.sample_size(10);
    for function in [DJBX33X, V8] {
        group.bench_function(function.name(), |b| {
            b.iter(|| generate_mitm(&function, "hashes", &params, 100, None).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hash_functions,
    bench_equivalent_substrings,
    bench_lookup_table,
    bench_meet_in_the_middle
);
criterion_main!(benches);
