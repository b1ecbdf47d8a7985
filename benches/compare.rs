use criterion::{black_box, criterion_group, criterion_main, Criterion};
use procmem::core::types::{ComparisonOp, ValueType};
use procmem::memory::{compare, Comparator};

fn benchmark_comparator(c: &mut Criterion) {
    let window: Vec<u8> = (0..4096u32).map(|b| (b % 251) as u8).collect();

    for (name, value_type, op, needle) in [
        ("int32_eq", ValueType::I32, ComparisonOp::Equal, 7i32.to_ne_bytes().to_vec()),
        ("uint64_gt", ValueType::U64, ComparisonOp::Greater, 1u64.to_ne_bytes().to_vec()),
        ("double_le", ValueType::F64, ComparisonOp::LessEqual, 0.5f64.to_ne_bytes().to_vec()),
        ("string_eq", ValueType::String, ComparisonOp::Equal, b"abcdef".to_vec()),
    ] {
        let comparator = match Comparator::new(value_type, op, &needle) {
            Ok(comparator) => comparator,
            Err(e) => panic!("bad benchmark input {}: {}", name, e),
        };
        c.bench_function(&format!("comparator_{}", name), |b| {
            b.iter(|| {
                black_box(&window)
                    .windows(comparator.width())
                    .filter(|w| comparator.matches(w))
                    .count()
            });
        });
    }
}

fn benchmark_compare_fn(c: &mut Criterion) {
    let lhs = 12.5f32.to_ne_bytes();
    let rhs = 3.25f32.to_ne_bytes();
    c.bench_function("compare_float_gt", |b| {
        b.iter(|| compare(black_box(&lhs), black_box(&rhs), ValueType::F32, ComparisonOp::Greater))
    });
}

criterion_group!(benches, benchmark_comparator, benchmark_compare_fn);
criterion_main!(benches);
