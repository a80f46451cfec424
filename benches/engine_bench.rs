use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use smsplate::{
    RecipientRecord, Template, classify, default_registry, parse_tokens, render, segment,
    validate, validate_many,
};
use std::hint::black_box;
use std::time::Duration;

fn scenarios() -> Vec<(&'static str, String)> {
    vec![
        ("empty", String::new()),
        ("plain", "Promo -20% ce week-end dans votre magasin".to_string()),
        ("single", "Bonjour {prenom} !".to_string()),
        (
            "typical",
            "Bonjour {prenom} {nom}, profitez de -20% en zone {zone_geographique} ({segment})."
                .to_string(),
        ),
        ("accented", "Chère {prenom}, votre remise est prête à être utilisée.".to_string()),
        ("malformed", "{prenom {nom}} {} {{segment} }{ {zone".to_string()),
        ("long", "Bonjour {prenom}, ".repeat(40)),
    ]
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for (name, body) in scenarios() {
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &body, |b, body| {
            b.iter(|| parse_tokens(black_box(body)));
        });
    }

    group.finish();
}

fn bench_classify_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_segment");

    for (name, body) in scenarios() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &body, |b, body| {
            b.iter(|| {
                let mode = classify(black_box(body));
                segment(black_box(body), mode)
            });
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let registry = default_registry();

    for (name, body) in scenarios() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &body, |b, body| {
            b.iter(|| validate(black_box(body), registry));
        });
    }

    let batch: Vec<String> = scenarios()
        .into_iter()
        .map(|(_, body)| body)
        .cycle()
        .take(1_000)
        .collect();
    group.bench_function("batch_1000", |b| {
        b.iter(|| validate_many(black_box(&batch), registry));
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let record = RecipientRecord::new()
        .with("prenom", "Ana")
        .with("nom", "Silva")
        .with("zone_geographique", "Nord");

    for (name, body) in scenarios() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &body, |b, body| {
            b.iter(|| render(black_box(body), black_box(&record)));
        });
    }

    group.bench_function("parsed_once_render_many", |b| {
        let template = Template::new("Bonjour {prenom} {nom}, zone {zone_geographique}");
        b.iter(|| template.render(black_box(&record)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(3));
    targets = bench_parser, bench_classify_segment, bench_validate, bench_render
}
criterion_main!(benches);
