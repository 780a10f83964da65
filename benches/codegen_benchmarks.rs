//! Criterion benchmarks for validation, generation and execution.
//!
//! Run with: `cargo bench`
//!
//! Workflows are built programmatically at several sizes: flat chains of
//! statements and conditions nested several levels deep.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use block_flow::codegen::{self, literals, Script};
use block_flow::{BlockCatalog, Node, Runner, Workspace, WorkspaceValidator};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A trigger followed by `len` statements cycling through every kind
fn flat_workflow(len: usize) -> Workspace {
    let chain = (0..len)
        .map(|i| match i % 4 {
            0 => Node::set_variable(&format!("v{}", i % 16), Node::number(i as f64)),
            1 => Node::transform(&format!("v{}", (i - 1) % 16), "ADD_1"),
            2 => Node::condition(&format!("v{}", (i - 2) % 16), "GT", Node::number(5.0))
                .when_true(vec![Node::output(Node::text("big"))])
                .otherwise(vec![Node::output(Node::text("small"))]),
            _ => Node::output(Node::variable(&format!("v{}", (i - 3) % 16))),
        })
        .collect();
    Workspace::new().with_block(Node::trigger().then(chain))
}

/// Conditions nested `depth` levels deep, each branch printing
fn nested_workflow(depth: usize) -> Workspace {
    let mut inner = vec![Node::output(Node::text("leaf"))];
    for level in 0..depth {
        inner = vec![
            Node::set_variable("n", Node::number(level as f64)),
            Node::condition("n", "GTE", Node::number(0.0))
                .when_true(inner)
                .otherwise(vec![Node::output(Node::text("never"))]),
        ];
    }
    Workspace::new().with_block(Node::trigger().then(inner))
}

// ---------------------------------------------------------------------------
// Validation Benchmarks
// ---------------------------------------------------------------------------

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_flat");

    for len in [10, 100, 1_000] {
        let ws = flat_workflow(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &ws, |b, ws| {
            b.iter(|| black_box(WorkspaceValidator::validate(ws).is_ok()));
        });
    }
    group.finish();
}

fn bench_conform(c: &mut Criterion) {
    let catalog = BlockCatalog::standard();
    let ws = flat_workflow(1_000);

    c.bench_function("conform_flat_1000", |b| {
        b.iter(|| {
            let mut ws = ws.clone();
            catalog.conform(&mut ws);
            black_box(ws.node_count())
        });
    });
}

// ---------------------------------------------------------------------------
// Generation Benchmarks
// ---------------------------------------------------------------------------

fn bench_generate_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_flat");

    for len in [10, 100, 1_000] {
        let ws = flat_workflow(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &ws, |b, ws| {
            b.iter(|| black_box(codegen::generate(ws).map(|p| p.executable.len())));
        });
    }
    group.finish();
}

fn bench_generate_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_nested");

    for depth in [4, 16, 64] {
        let ws = nested_workflow(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &ws, |b, ws| {
            b.iter(|| black_box(codegen::generate(ws).map(|p| p.display.len())));
        });
    }
    group.finish();
}

fn bench_lower(c: &mut Criterion) {
    let ws = flat_workflow(1_000);
    c.bench_function("lower_flat_1000", |b| {
        b.iter(|| black_box(Script::lower(&ws).map(|s| s.statements.len())));
    });
}

fn bench_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("literals");
    let name = "my score! (final) ✓".repeat(8);
    let text = r#"say "hi" \ then "bye" \"#.repeat(8);

    group.bench_function("sanitize_identifier", |b| {
        b.iter(|| black_box(literals::sanitize_identifier(&name)));
    });
    group.bench_function("escape_text_literal", |b| {
        b.iter(|| black_box(literals::escape_text_literal(&text)));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Execution Benchmarks
// ---------------------------------------------------------------------------

fn bench_run(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let runner = Runner::default();

    let mut group = c.benchmark_group("run_flat");
    for len in [10, 100, 1_000] {
        let program = codegen::generate(&flat_workflow(len)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &program, |b, program| {
            b.iter(|| black_box(rt.block_on(runner.run(program)).is_success()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

criterion_group!(validation_benches, bench_validate, bench_conform);

criterion_group!(
    generation_benches,
    bench_generate_flat,
    bench_generate_nested,
    bench_lower,
    bench_literals,
);

criterion_group!(execution_benches, bench_run);

criterion_main!(validation_benches, generation_benches, execution_benches);
