use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sheetdiff::{Cell, DiffOptions, Row, Sheet, Workbook, compare};

fn synthetic_workbook(file_name: &str, nrows: u32, ncols: u32, base: f64) -> Workbook {
    let rows = (0..nrows)
        .map(|r| {
            let cells = (0..ncols)
                .map(|c| Cell::number(base + (r * 1000 + c) as f64))
                .collect();
            Row::new(r, cells)
        })
        .collect();
    Workbook::new(file_name, vec![Sheet::new("Data", rows)])
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let options = DiffOptions::default();

    for &nrows in &[1_000u32, 10_000] {
        let ncols = 20u32;
        let old = synthetic_workbook("old.xlsx", nrows, ncols, 0.0);
        let mut new = synthetic_workbook("new.xlsx", nrows, ncols, 0.0);
        // Touch every hundredth row so the modified path gets exercised.
        for row in new.sheets[0].rows.iter_mut().step_by(100) {
            row.cells[0] = Cell::number(-1.0);
        }

        group.throughput(Throughput::Elements(u64::from(nrows) * u64::from(ncols)));
        group.bench_with_input(
            BenchmarkId::new("rows", nrows),
            &(old, new),
            |b, (old, new)| {
                b.iter(|| compare(old, new, &options).expect("compare should succeed"));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);
