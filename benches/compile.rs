use criterion::{black_box, criterion_group, criterion_main, Criterion};
use radlogic::{
    compile, compile_report, parse, CombinedLogic, LayerRole, LayerStack, ReportOptions, RuleLayer,
};

/// Rule text with `n` exclusions, `n` priority keywords and `n` custom rules.
fn rule_text(n: usize) -> String {
    let mut text = String::from("Exclusions:\n");
    for i in 0..n {
        if i % 2 == 0 {
            text.push_str(&format!("- finding {i}\n"));
        } else {
            text.push_str(&format!("• finding {i} (unless larger than {i} cm)\n"));
        }
    }
    text.push_str("Priority Keywords:\n");
    for i in 0..n {
        text.push_str(&format!("* Keyword{i}\n"));
    }
    text.push_str("Custom Rules:\n");
    for i in 0..n {
        text.push_str(&format!("- Rule number {i}\n"));
    }
    text
}

/// Three text layers of `n` directives each, merged.
fn layered_logic(n: usize) -> CombinedLogic {
    let text = RuleLayer::text(rule_text(n));
    LayerStack::new()
        .rules(LayerRole::Global, &text)
        .rules(LayerRole::SectionSpecific, &text)
        .rules(LayerRole::StudyOverride, &text)
        .merge()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &n in &[5, 20, 50] {
        let layer = RuleLayer::text(rule_text(n));
        group.bench_function(&format!("{n}_directives"), |b| {
            b.iter(|| parse(black_box(&layer)));
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for &n in &[5, 20, 50] {
        let text = RuleLayer::text(rule_text(n));
        let stack = LayerStack::new()
            .rules(LayerRole::Global, &text)
            .rules(LayerRole::SectionSpecific, &text)
            .rules(LayerRole::StudyOverride, &text);
        group.bench_function(&format!("3_layers_{n}_directives"), |b| {
            b.iter(|| black_box(&stack).merge());
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let findings = "Complex tear of the posterior horn of the medial meniscus. Small joint effusion.";

    for &n in &[5, 20, 50] {
        let logic = layered_logic(n);
        group.bench_function(&format!("impression_{n}_directives"), |b| {
            b.iter(|| compile(black_box(findings), black_box(&logic), None, None));
        });

        let options = ReportOptions {
            template: Some("FINDINGS:\nMenisci:\nLigaments:\nIMPRESSION:"),
            ..ReportOptions::default()
        };
        group.bench_function(&format!("report_{n}_directives"), |b| {
            b.iter(|| compile_report(black_box(findings), black_box(&logic), &options));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_merge, bench_compile);
criterion_main!(benches);
