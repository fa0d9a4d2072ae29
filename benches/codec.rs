use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sml::{binary, Attribute, Document, Element};

fn create_document(items: usize) -> Document {
    let mut root = Element::new("Inventory");
    for i in 0..items {
        let item = root.add_element("Item");
        item.add_node(Attribute::with_string("Id", &i.to_string()));
        item.add_node(Attribute::with_string("Name", &format!("Product {}", i)));
        item.add_node(
            Attribute::new(
                "Dimensions",
                vec![Some("1.5".into()), Some("2".into()), None],
            )
            .unwrap(),
        );
        item.set_comment(Some(" generated")).unwrap();
    }
    Document::new(root)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000].iter() {
        let text = create_document(*size).serialize(true).unwrap();

        group.bench_with_input(BenchmarkId::new("preserving", size), &text, |b, text| {
            b.iter(|| Document::parse(black_box(text), true).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("non_preserving", size), &text, |b, text| {
            b.iter(|| Document::parse(black_box(text), false).unwrap())
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for size in [10, 100, 1000].iter() {
        let doc = create_document(*size);

        group.bench_with_input(BenchmarkId::new("preserving", size), &doc, |b, doc| {
            b.iter(|| black_box(doc).serialize(true).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("minified", size), &doc, |b, doc| {
            b.iter(|| black_box(doc).to_minified_string().unwrap())
        });
    }

    group.finish();
}

fn bench_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");

    for size in [10, 100, 1000].iter() {
        let doc = create_document(*size);
        let bytes = binary::encode(&doc);

        group.bench_with_input(BenchmarkId::new("encode", size), &doc, |b, doc| {
            b.iter(|| binary::encode(black_box(doc)))
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| binary::decode(black_box(bytes)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize, bench_binary);
criterion_main!(benches);
