use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gochara_core::{
    ALL_BODIES, BirthEvent, Body, ChartBuilder, EphemerisChartBuilder, MeanMotionEphemeris,
};
use gochara_search::{
    ReturnConfig, ScanConfig, ScanRequest, find_return, golden_section_min, scan_transits,
};
use gochara_time::UtcTime;

fn natal_chart(eph: &MeanMotionEphemeris) -> gochara_core::NatalChart {
    let birth = BirthEvent {
        jd_tdb: UtcTime::new(1990, 7, 14, 18, 5, 0.0).to_jd(),
        ascendant_deg: Some(213.4),
        midheaven_deg: Some(128.9),
    };
    EphemerisChartBuilder::new(eph, ALL_BODIES.to_vec())
        .build(&birth)
        .expect("chart should build")
}

fn scan_bench(c: &mut Criterion) {
    let eph = MeanMotionEphemeris::j2000();
    let chart = natal_chart(&eph);
    let start = UtcTime::date(2024, 1, 1).to_jd();
    let config = ScanConfig::default();

    let mut group = c.benchmark_group("transit_scan");
    group.sample_size(20);
    for days in [30.0, 365.0] {
        let request = ScanRequest::new(chart.clone(), start, start + days);
        group.bench_function(format!("all_bodies_{days}d"), |b| {
            b.iter(|| {
                scan_transits(black_box(&eph), black_box(&request), black_box(&config))
                    .expect("scan should succeed")
            })
        });
    }
    group.finish();
}

fn refine_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine");
    group.bench_function("golden_section_v", |b| {
        b.iter(|| {
            golden_section_min::<_, std::convert::Infallible>(
                |t| Ok((t - black_box(0.37)).abs()),
                -1.0,
                1.0,
                1e-4,
                30,
            )
        })
    });

    let eph = MeanMotionEphemeris::j2000();
    let estimate = UtcTime::new(2025, 7, 14, 18, 5, 0.0).to_jd();
    let target = eph
        .elements(Body::Sun)
        .map(|el| el.longitude_deg + el.rate_deg_per_day * (estimate + 0.8 - el.epoch_jd))
        .expect("sun elements");
    let config = ReturnConfig::default();
    group.bench_function("solar_return", |b| {
        b.iter(|| {
            find_return(black_box(&eph), Body::Sun, black_box(target), estimate, &config)
                .expect("search should succeed")
                .expect("return should exist")
        })
    });
    group.finish();
}

criterion_group!(benches, scan_bench, refine_bench);
criterion_main!(benches);
