use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jdate::prelude::*;

fn iso_inputs() -> Vec<&'static str> {
    vec![
        "2010-11-12",
        "1970-01-01",
        "0001-01-01",
        "2024-02-29",
        "9999-12-31",
        "",
    ]
}

fn from_string_ok(inputs: &[&str]) {
    for input in inputs {
        let res = Date::from_string(input);
        assert!(res.is_ok());
    }
}

fn to_string_all(dates: &[Date]) {
    for date in dates {
        black_box(date.to_string());
    }
}

fn layout_inputs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("2006-01-02", "2013-09-04"),
        ("01/02/06", "09/04/13"),
        ("Jan _2, 2006", "Sep  4, 2013"),
        ("Monday, 02-Jan-06 15:04:05 MST", "Wednesday, 04-Sep-13 10:11:12 UTC"),
        ("%d.%m.%Y", "04.09.2013"),
    ]
}

fn parse_ok(inputs: &[(&str, &str)]) {
    for (layout, input) in inputs {
        let res = Date::parse(layout, input);
        assert!(res.is_ok());
    }
}

fn parse_precompiled_ok(inputs: &[(Layout<'_>, &str)]) {
    for (layout, input) in inputs {
        let res = Date::parse_with(layout, input);
        assert!(res.is_ok());
    }
}

fn scan_inputs() -> Vec<DriverValue<'static>> {
    vec![
        DriverValue::Integer(20220714),
        DriverValue::Float(20220714.2),
        DriverValue::Text("2022-07-14"),
        DriverValue::Bytes(b"2022-07-14"),
        DriverValue::Null,
    ]
}

fn scan_ok(inputs: &[DriverValue<'_>]) {
    let mut date = Date::ZERO;
    for input in inputs {
        let res = date.scan(*input);
        assert!(res.is_ok());
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let dates = iso_inputs()
        .into_iter()
        .map(Date::must_from_string)
        .collect::<Vec<_>>();
    let precompiled = layout_inputs()
        .into_iter()
        .map(|(layout, input)| (Layout::new(layout), input))
        .collect::<Vec<_>>();

    c.bench_function("from_string_ok", |b| {
        b.iter(|| from_string_ok(black_box(&iso_inputs())))
    });
    c.bench_function("to_string", |b| b.iter(|| to_string_all(black_box(&dates))));
    c.bench_function("parse_ok", |b| b.iter(|| parse_ok(black_box(&layout_inputs()))));
    c.bench_function("parse_precompiled_ok", |b| {
        b.iter(|| parse_precompiled_ok(black_box(&precompiled)))
    });
    c.bench_function("scan_ok", |b| b.iter(|| scan_ok(black_box(&scan_inputs()))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
