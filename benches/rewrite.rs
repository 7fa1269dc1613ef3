use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use verbump::rewrite::rewrite_content;
use verbump::{Operation, Pipeline};

const SECTION_COUNT: usize = 500;

fn source_file() -> String {
    let mut content = String::new();
    for i in 0..SECTION_COUNT {
        content.push_str(&format!(
            "/**\n * Module {i} v1.{i}.0-beta2\n */\n// since 0.{i}.1\nconst meta = {{ 'version' => '2.{i}.3' }};\nfn body_{i}() {{}}\n"
        ));
    }
    content
}

fn bench_rewrite_content(c: &mut Criterion) {
    let content = source_file();
    let pipeline = Pipeline::steps(
        ["minor", "rc"]
            .into_iter()
            .map(|step| step.parse::<Operation>().expect("valid step")),
    );
    c.bench_with_input(
        BenchmarkId::new("rewrite_content", SECTION_COUNT),
        &content,
        |b, content| {
            b.iter(|| {
                rewrite_content(black_box(content), &[], &pipeline).expect("rewrite_content");
            });
        },
    );
}

criterion_group!(benches, bench_rewrite_content);
criterion_main!(benches);
