//! Benchmarks for tree rendering and table merges.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdxc_renderer::{
    ComponentRegistry, HtmlElement, Node, Overrides, Renderer, RendererConfig, component,
    default_table,
};

/// Generate a document with `sections` headed sections of `paragraphs` each.
fn generate_wide(sections: usize, paragraphs: usize) -> Node {
    let mut children = Vec::with_capacity(sections * (paragraphs + 1));
    for i in 0..sections {
        children.push(Node::element("h2").with_child(Node::text(format!("Section {i}"))));
        for j in 0..paragraphs {
            children.push(Node::element("p").with_children([
                Node::text(format!("Paragraph {j} uses ")),
                Node::element("inlineCode").with_child(Node::text("--flag")),
                Node::text(" and "),
                Node::element("strong").with_child(Node::text("bold")),
                Node::text(" text."),
            ]));
        }
    }
    Node::element("wrapper").with_children(children)
}

/// Generate nested blockquotes, each declaring its own overrides.
fn generate_deep(depth: usize) -> Node {
    let mut node = Node::element("p").with_child(Node::text("bottom"));
    for i in 0..depth {
        let overrides = ComponentRegistry::new().with(
            "p",
            component(HtmlElement::new(if i % 2 == 0 { "section" } else { "p" })),
        );
        node = Node::element("blockquote")
            .with_overrides(overrides)
            .with_child(node);
    }
    node
}

fn bench_render_simple(c: &mut Criterion) {
    let tree = Node::element("p").with_child(Node::text("Simple content."));
    let renderer = Renderer::new();
    let registry = Overrides::none();

    c.bench_function("render_simple_document", |b| {
        b.iter(|| renderer.render_document(&tree, &registry));
    });
}

fn bench_render_wide(c: &mut Criterion) {
    let renderer = Renderer::new();
    let registry: Overrides = ComponentRegistry::new()
        .with("inlineCode", component(HtmlElement::new("kbd")))
        .into();

    let mut group = c.benchmark_group("render_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let tree = generate_wide(sections, paragraphs);
        group.throughput(Throughput::Elements((sections * (paragraphs + 1)) as u64));
        group.bench_with_input(
            BenchmarkId::new("wide", format!("{sections}s_{paragraphs}p")),
            &tree,
            |b, tree| b.iter(|| renderer.render_document(tree, &registry)),
        );
    }

    group.finish();
}

fn bench_render_deep(c: &mut Criterion) {
    let renderer = Renderer::with_config(RendererConfig::new().with_max_depth(1024));

    let mut group = c.benchmark_group("render_nested_scopes");

    for depth in [8, 64, 256] {
        let tree = generate_deep(depth);
        group.bench_with_input(BenchmarkId::new("deep", depth), &tree, |b, tree| {
            b.iter(|| renderer.render_document(tree, &Overrides::none()));
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let overrides: Overrides = ComponentRegistry::new()
        .with("p", component(HtmlElement::new("section")))
        .with("li.inlineCode", component(HtmlElement::new("kbd")))
        .into();

    c.bench_function("merge_default_table", |b| {
        b.iter(|| default_table().merge(&overrides));
    });

    c.bench_function("merge_empty_overrides", |b| {
        b.iter(|| default_table().merge(&Overrides::none()));
    });
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_wide,
    bench_render_deep,
    bench_merge
);
criterion_main!(benches);
