use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kiosk_core::{ParcelSizeRange, WeightTracker, size_for_weight};

// Synthetic scale trace: slow drift between 0 and 12 kg with some empty reads
fn synth_trace(n: usize, seed: u32) -> Vec<Option<f64>> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    (0..n)
        .map(|i| {
            let r = next_f64();
            if r < 0.05 {
                None
            } else {
                Some(6.0 + 6.0 * (i as f64 / 500.0).sin() + (r - 0.5) * 0.2)
            }
        })
        .collect()
}

fn buckets() -> Vec<ParcelSizeRange> {
    vec![
        ParcelSizeRange::new("Small Box", 0.1, Some(1.0)),
        ParcelSizeRange::new("Medium Box", 1.0, Some(3.0)),
        ParcelSizeRange::new("Large Box", 3.0, Some(5.0)),
        ParcelSizeRange::new("Extra Large Box", 5.0, Some(10.0)),
    ]
}

pub fn bench_sizing(c: &mut Criterion) {
    let mut g = c.benchmark_group("sizing");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p kiosk_core --bench sizing
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let trace = synth_trace(50_000, 0xC0FFEE);
    let ranges = buckets();

    g.bench_function("size_for_weight", |b| {
        b.iter(|| {
            let hits = trace
                .iter()
                .flatten()
                .filter(|w| size_for_weight(black_box(&ranges), **w).is_some())
                .count();
            black_box(hits);
        })
    });

    g.bench_function("weight_tracker", |b| {
        b.iter_batched(
            WeightTracker::new,
            |mut t| {
                let changes = trace
                    .iter()
                    .filter(|r| {
                        matches!(
                            t.observe(**r),
                            kiosk_core::WeightObservation::Changed { .. }
                        )
                    })
                    .count();
                black_box(changes);
            },
            BatchSize::SmallInput,
        )
    });
    g.finish();
}

criterion_group!(sizing, bench_sizing);
criterion_main!(sizing);
