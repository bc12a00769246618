//! Benchmarks for overridden-member traversal

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use overscope_compiler::hierarchy::Hierarchy;
use overscope_compiler::tast::*;
use std::rc::Rc;

/// Linear chain `Level0 <- Level1 <- ...`, each level overriding `run`
fn generate_deep_chain(depth: usize) -> String {
    let mut fixture = String::new();
    for i in 0..depth {
        fixture.push_str(&format!("[[class]]\nname = \"Level{}\"\n", i));
        if i > 0 {
            fixture.push_str(&format!("supertypes = [\"Level{}\"]\n", i - 1));
        }
        fixture.push_str("\n[[class.function]]\nname = \"run\"\n");
        if i > 0 {
            fixture.push_str(&format!("overrides = [\"Level{}.run\"]\n", i - 1));
        }
        fixture.push('\n');
    }
    fixture
}

/// Stack of diamonds; every level merges two sides that both override the
/// previous merge point, so most members are reached more than once
fn generate_diamond_stack(levels: usize) -> String {
    let mut fixture = String::from("[[class]]\nname = \"Top0\"\n\n[[class.function]]\nname = \"run\"\n\n");
    for i in 1..=levels {
        let below = format!("Top{}", i - 1);
        for side in ["Left", "Right"] {
            fixture.push_str(&format!(
                "[[class]]\nname = \"{side}{i}\"\nsupertypes = [\"{below}\"]\n\n\
                 [[class.function]]\nname = \"run\"\noverrides = [\"{below}.run\"]\n\n"
            ));
        }
        fixture.push_str(&format!(
            "[[class]]\nname = \"Top{i}\"\nsupertypes = [\"Left{i}\", \"Right{i}\"]\n\n\
             [[class.intersection]]\nkind = \"function\"\nname = \"run\"\nmerges = [\"Left{i}.run\", \"Right{i}.run\"]\n\n\
             [[class.function]]\nname = \"run\"\noverrides = [\"Top{i}.super.run\"]\n\n"
        ));
    }
    fixture
}

fn bench_deep_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_chain");

    for depth in [10, 100, 500] {
        let hierarchy = Hierarchy::from_toml_str(&generate_deep_chain(depth)).unwrap();
        let (run, scope) = hierarchy
            .resolve_function(&format!("Level{}.run", depth - 1))
            .unwrap();

        group.bench_with_input(BenchmarkId::new("overridden_functions", depth), &depth, |b, _| {
            b.iter(|| black_box(scope.overridden_functions(black_box(run))))
        });
    }

    group.finish();
}

fn bench_diamond_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("diamond_stack");

    for levels in [4, 16, 64] {
        let hierarchy = Hierarchy::from_toml_str(&generate_diamond_stack(levels)).unwrap();
        let (run, scope) = hierarchy.resolve_function(&format!("Top{}.run", levels)).unwrap();

        group.bench_with_input(BenchmarkId::new("process_overridden", levels), &levels, |b, _| {
            b.iter(|| {
                let mut count = 0usize;
                scope.process_overridden_functions(run, |_| {
                    count += 1;
                    ProcessorAction::Continue
                });
                black_box(count)
            })
        });

        group.bench_with_input(BenchmarkId::new("direct_only", levels), &levels, |b, _| {
            b.iter(|| black_box(scope.directly_overridden_functions(black_box(run))))
        });
    }

    group.finish();
}

fn bench_hierarchy_loading(c: &mut Criterion) {
    let fixture = generate_diamond_stack(64);
    c.bench_function("load_diamond_stack_64", |b| {
        b.iter(|| Hierarchy::from_toml_str(black_box(&fixture)).unwrap())
    });
}

/// Scope built by hand, without fixture parsing
fn bench_builder_chain(c: &mut Criterion) {
    let mut interner = StringInterner::new();
    let mut table = SymbolTable::new();
    let name = interner.intern("run");

    let mut base: Rc<dyn TypeScope> = Rc::new(EmptyTypeScope);
    let mut previous: Option<FunctionSymbol> = None;
    for i in 0..200u32 {
        let owner = interner.intern(&format!("Level{}", i));
        let symbol = table.add_function(name, owner, CallableOrigin::Source);
        let mut builder = ClassMemberScope::builder(ScopeId::from_raw(i), owner).base_scope(base);
        builder.declare_function(name, symbol);
        if let Some(overridden) = previous {
            builder.function_overrides(symbol, [overridden]);
        }
        base = Rc::new(builder.build());
        previous = Some(symbol);
    }
    let top = previous.unwrap();

    c.bench_function("builder_chain_200", |b| {
        b.iter(|| black_box(base.overridden_functions(black_box(top))))
    });
}

criterion_group!(
    benches,
    bench_deep_chain,
    bench_diamond_stack,
    bench_hierarchy_loading,
    bench_builder_chain
);
criterion_main!(benches);
