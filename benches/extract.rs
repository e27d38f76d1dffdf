// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use chrono::NaiveDate;
use prop_scrape::{
    config::Config,
    engine::SourceOutcome,
    merge::merge,
    report::compose,
    resolve::resolve_listing,
    session::FixtureSession,
    specs::{Compass, PropStream, Redfin, SourceAdapter},
};

fn load_fixture() -> FixtureSession {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/1_main_st.json");
    FixtureSession::load(std::path::Path::new(path)).expect("read tests/fixtures/1_main_st.json")
}

fn config() -> Config {
    let mut cfg = Config::default();
    cfg.targets.property_address = "1 Main St, San Jose, CA 95112".into();
    cfg
}

fn bench_pipeline(c: &mut Criterion) {
    let cfg = config();
    let as_of = NaiveDate::from_ymd_opt(2026, 10, 15).expect("valid date");
    let registry = PropStream::new(cfg.propstream.clone(), false, cfg.timeouts);
    let primary = Compass::new(cfg.compass.clone(), cfg.timeouts);
    let secondary = Redfin::new(cfg.timeouts);

    c.bench_function("registry_fetch", |b| {
        b.iter(|| {
            let mut s = load_fixture();
            black_box(registry.fetch(&mut s, black_box(&cfg.targets.property_address)))
        })
    });

    c.bench_function("listing_fallback_to_secondary", |b| {
        b.iter(|| {
            let mut s = load_fixture();
            black_box(resolve_listing(&mut s, &primary, &secondary, black_box(&cfg.targets.property_address)))
        })
    });

    let mut s = load_fixture();
    let SourceOutcome::Success(reg) = registry.fetch(&mut s, &cfg.targets.property_address) else {
        panic!("fixture registry should resolve");
    };
    let listing = resolve_listing(&mut s, &primary, &secondary, &cfg.targets.property_address);

    c.bench_function("merge_and_compose", |b| {
        b.iter(|| {
            let agg = merge(reg.clone(), listing.clone(), black_box(&cfg), as_of);
            black_box(compose(&agg).len())
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
