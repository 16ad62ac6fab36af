use chrono::NaiveDateTime;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cron_next::{next_run, ReferenceInstant, Schedule};

const EXPRESSIONS: &[&str] = &[
    "* * * * *",
    "*/15 * * * *",
    "45 10 * * 1",
    "0 9-17 * * 1-5",
    "0 0 29 2 *",
    "0-59/13 0-23/5 1-31/3 1-12/2 1-7",
    "0 0 1 1 0",
];

const NOW: &[&str] = &["2023-12-31 23:59", "2024-01-01 00:00", "2024-03-04 10:30"];

fn reference(s: &str) -> ReferenceInstant {
    ReferenceInstant::from_naive(&NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
}

pub fn new_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("new");
    for expression in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::from_parameter(expression), expression, |b, e| {
            b.iter(|| Schedule::new(e).unwrap())
        });
    }
    group.finish();
}

pub fn next_run_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_run");
    for expression in EXPRESSIONS {
        for now_str in NOW {
            let now = reference(now_str);
            let schedule = Schedule::new(*expression).unwrap();
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{now_str}/{expression}")),
                &(now, &schedule),
                |b, (now, schedule)| b.iter(|| schedule.next_run(now)),
            );
        }
    }
    group.finish();
}

pub fn lenient_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lenient");
    let now = reference(NOW[2]);
    for expression in EXPRESSIONS.iter().chain(&["not a cron line"]) {
        group.bench_with_input(BenchmarkId::from_parameter(expression), expression, |b, e| {
            b.iter(|| next_run(e, &now))
        });
    }
    group.finish();
}

criterion_group!(benches, new_benchmark, next_run_benchmark, lenient_benchmark);
criterion_main!(benches);
