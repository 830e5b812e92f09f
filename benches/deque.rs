use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sqrtdeque::SqrtDeque;
use std::collections::VecDeque;

fn criterion_benchmarks(c: &mut Criterion) {
    c.bench_function("push_and_pop_sqrtdeque", |b| {
        b.iter(|| {
            let mut deque = SqrtDeque::new();
            for i in 0..1001 {
                deque.push_back(i);
            }
            let mut sum = 0;
            while let Ok(value) = deque.pop_front() {
                sum += value;
            }
            assert_eq!(sum, 500500);
        })
    });

    c.bench_function("push_and_pop_vecdeque", |b| {
        b.iter(|| {
            let mut deque = VecDeque::new();
            for i in 0..1001 {
                deque.push_back(i);
            }
            let mut sum = 0;
            while let Some(value) = deque.pop_front() {
                sum += value;
            }
            assert_eq!(sum, 500500);
        })
    });

    let deque: SqrtDeque<usize> = (0..10_000).collect();
    let mut rng = SmallRng::seed_from_u64(7);
    let indices: Vec<usize> = (0..1000).map(|_| rng.next_u32() as usize % 10_000).collect();
    c.bench_function("random_get_10k_sqrtdeque", |b| {
        b.iter(|| {
            let mut sum = 0;
            for &i in &indices {
                sum += deque[i];
            }
            black_box(sum);
        })
    });

    let deque: VecDeque<usize> = (0..10_000).collect();
    c.bench_function("random_get_10k_vecdeque", |b| {
        b.iter(|| {
            let mut sum = 0;
            for &i in &indices {
                sum += deque[i];
            }
            black_box(sum);
        })
    });

    c.bench_function("middle_insert_4096_sqrtdeque", |b| {
        b.iter(|| {
            let mut deque = SqrtDeque::new();
            for i in 0..4096 {
                deque.insert_at(deque.len() / 2, i).unwrap();
            }
            black_box(deque.len());
        })
    });

    c.bench_function("middle_insert_4096_vecdeque", |b| {
        b.iter(|| {
            let mut deque = VecDeque::new();
            for i in 0..4096 {
                let mid = deque.len() / 2;
                deque.insert(mid, i);
            }
            black_box(deque.len());
        })
    });

    let deque: SqrtDeque<usize> = (0..10_000).collect();
    c.bench_function("iter_10k_sqrtdeque", |b| {
        b.iter(|| {
            let mut sum = 0;
            for &i in &deque {
                sum += i;
            }
            black_box(sum);
        })
    });
}

criterion_group!(benches, criterion_benchmarks);
criterion_main!(benches);
