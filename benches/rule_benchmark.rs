//! Benchmarks for rule parsing, combining and evaluation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eligibility_rules::rule::{clear_cache, get_or_parse};
use eligibility_rules::{combine, evaluate, parse, Context, ParseMode, RuleEngine};
use rand::Rng;

const RULES: [&str; 5] = [
    "(age > 30)",
    "((age > 30) AND (salary > 50000))",
    "(department = 'Sales' OR department = 'Marketing')",
    "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)",
    "((age > 30 AND department = 'Marketing')) AND (salary > 20000 OR experience > 5)",
];

const DEPARTMENTS: [&str; 4] = ["Sales", "Marketing", "Engineering", "Support"];

/// Random employee records
fn create_contexts(count: usize) -> Vec<Context> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            Context::new()
                .with("age", rng.gen_range(18..65i64))
                .with("department", DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())])
                .with("salary", rng.gen_range(20_000..120_000i64))
                .with("experience", rng.gen_range(0..30i64))
        })
        .collect()
}

fn benchmark_parsing(c: &mut Criterion) {
    c.bench_function("rule_parsing_cold", |b| {
        b.iter(|| {
            for rule in &RULES {
                let _ = black_box(parse(rule));
            }
        })
    });

    c.bench_function("rule_parsing_cached", |b| {
        clear_cache();
        // Warm up cache
        for rule in &RULES {
            let _ = get_or_parse(rule, ParseMode::Lenient);
        }

        b.iter(|| {
            for rule in &RULES {
                let _ = black_box(get_or_parse(rule, ParseMode::Lenient));
            }
        })
    });
}

fn benchmark_evaluation(c: &mut Criterion) {
    let contexts = create_contexts(1_000);
    let ast = parse(RULES[3]).unwrap();

    c.bench_function("evaluate_eligibility_rule_1000", |b| {
        b.iter(|| {
            let eligible = contexts
                .iter()
                .filter(|ctx| {
                    evaluate(ast.as_ref(), ctx)
                        .map(|v| v.is_truthy())
                        .unwrap_or(false)
                })
                .count();
            black_box(eligible)
        })
    });

    let combined = combine(&RULES).unwrap();
    c.bench_function("evaluate_combined_1000", |b| {
        b.iter(|| {
            for ctx in &contexts {
                let _ = black_box(evaluate(combined.as_ref(), ctx));
            }
        })
    });
}

fn benchmark_engine(c: &mut Criterion) {
    let engine = RuleEngine::new();
    for (i, rule) in RULES.iter().enumerate() {
        let _ = engine.create_and_save(format!("rule{}", i), rule);
    }
    let contexts = create_contexts(100);

    c.bench_function("engine_evaluate_saved_100", |b| {
        b.iter(|| {
            for ctx in &contexts {
                let _ = black_box(engine.evaluate_saved("rule3", ctx));
            }
        })
    });
}

criterion_group!(benches, benchmark_parsing, benchmark_evaluation, benchmark_engine);
criterion_main!(benches);
