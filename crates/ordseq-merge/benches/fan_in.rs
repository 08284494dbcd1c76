use std::convert::Infallible;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ordseq_cursor::{Cursor, IterCursor};
use ordseq_merge::OrderedMerge;

const TOTAL: u64 = 1 << 16;

/// `fan_in` interleaved sources that together hold `TOTAL` values.
fn sources(fan_in: u64) -> Vec<IterCursor<std::iter::StepBy<std::ops::Range<u64>>, Infallible>> {
    (0..fan_in)
        .map(|offset| IterCursor::new((offset..TOTAL).step_by(fan_in as usize)))
        .collect()
}

fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_fan_in");
    group.throughput(Throughput::Elements(TOTAL));
    for fan_in in [2u64, 8, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(fan_in), &fan_in, |b, &fan_in| {
            b.iter(|| {
                let mut merge = OrderedMerge::natural(sources(fan_in));
                let mut sum = 0u64;
                while let Ok(true) = merge.load_next() {
                    sum += merge.current().copied().unwrap_or_default();
                }
                let _ = merge.close();
                black_box(sum)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
