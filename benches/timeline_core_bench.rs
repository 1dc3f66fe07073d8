use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timeline_rs::api::{TimelineConfig, TimelineEngine};
use timeline_rs::core::period::{DAY_MS, HOUR_MS};
use timeline_rs::core::{
    Item, Locale, Period, Row, RowExtent, RowTree, TimeConversion, TimeWindow, Viewport,
    generate_period_dates, visible_rows_and_compensation,
};
use timeline_rs::render::NullRenderer;

fn bench_hour_cells_one_month(c: &mut Criterion) {
    let time = TimeConversion::new(Locale::default(), true);
    let window = TimeWindow {
        left_global: 3.5 * HOUR_MS,
        right_global: 30.0 * DAY_MS,
        time_per_pixel: 60_000.0,
        ..TimeWindow::default()
    };

    c.bench_function("hour_cells_one_month", |b| {
        b.iter(|| {
            let cells = generate_period_dates(Period::Hour, 1, black_box(&window), &time);
            black_box(cells.len())
        })
    });
}

fn bench_visible_rows_100k(c: &mut Criterion) {
    let rows: Vec<RowExtent> = (0..100_000)
        .map(|i| RowExtent {
            id: format!("row-{i}"),
            height: 20.0 + f64::from(i % 7) * 4.0,
        })
        .collect();

    c.bench_function("visible_rows_100k", |b| {
        b.iter(|| {
            let visible =
                visible_rows_and_compensation(black_box(&rows), black_box(1_234_567.0), 900.0);
            black_box(visible.rows.len())
        })
    });
}

fn bench_tree_build_10k(c: &mut Criterion) {
    let rows: Vec<Row> = (0..10_000)
        .map(|i| {
            let row = Row::new(format!("row-{i}")).with_expanded(true);
            if i % 10 == 0 {
                row
            } else {
                row.with_parent(format!("row-{}", i - i % 10))
            }
        })
        .collect();
    let items: Vec<Item> = (0..20_000)
        .map(|i| {
            let start = f64::from(i) * HOUR_MS;
            Item::new(format!("item-{i}"), format!("row-{}", i % 10_000), start, start + HOUR_MS)
        })
        .collect();

    c.bench_function("tree_build_10k", |b| {
        b.iter(|| {
            let tree = RowTree::build(black_box(&rows), black_box(&items));
            black_box(tree.flat().len())
        })
    });
}

fn bench_engine_scroll_recompute(c: &mut Criterion) {
    let config = TimelineConfig::new(Viewport::new(1920, 1080))
        .with_time_range(0.0, 365.0 * DAY_MS)
        .with_zoom(18.0)
        .with_utc_mode(true);
    let mut engine = TimelineEngine::new(NullRenderer::default(), config).expect("engine init");
    let mut scroll = 0.0;

    c.bench_function("engine_scroll_recompute", |b| {
        b.iter(|| {
            scroll = (scroll + 37.0) % 50_000.0;
            let outcome = engine.set_scroll_left(black_box(scroll)).expect("recompute");
            black_box(outcome)
        })
    });
}

criterion_group!(
    benches,
    bench_hour_cells_one_month,
    bench_visible_rows_100k,
    bench_tree_build_10k,
    bench_engine_scroll_recompute
);
criterion_main!(benches);
