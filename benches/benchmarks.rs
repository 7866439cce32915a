use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stocklens::analysis::technical_report;
use stocklens::data::resample;
use stocklens::indicators::enrich;
use stocklens::types::{Bar, Timeframe};

fn make_bars(n: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.17).sin() * 8.0 + i as f64 * 0.01;
            Bar::new(
                start + Duration::days(i as i64),
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                1_000_000.0,
                close * 1_000_000.0,
            )
        })
        .collect()
}

fn benchmark_enrich(c: &mut Criterion) {
    let bars = make_bars(2500); // ~10 years of daily bars

    c.bench_function("enrich_2500_bars", |b| {
        b.iter(|| {
            let series = enrich(black_box(bars.clone()));
            black_box(series);
        });
    });
}

fn benchmark_resample(c: &mut Criterion) {
    let bars = make_bars(2500);

    c.bench_function("resample_weekly_monthly_2500", |b| {
        b.iter(|| {
            let weekly = resample(black_box(&bars), Timeframe::Weekly);
            let monthly = resample(black_box(&bars), Timeframe::Monthly);
            black_box((weekly, monthly));
        });
    });
}

fn benchmark_full_technical_report(c: &mut Criterion) {
    let bars = make_bars(2500);

    c.bench_function("technical_report_2500", |b| {
        b.iter(|| {
            let report = technical_report(black_box(&bars)).unwrap();
            black_box(report);
        });
    });
}

criterion_group!(
    benches,
    benchmark_enrich,
    benchmark_resample,
    benchmark_full_technical_report
);
criterion_main!(benches);
