use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xml2json::json::to_string;
use xml2json::{convert, from_xml_str, Style};

const SIMPLE_XML: &str = "<root><child>text</child></root>";
const ATTR_XML: &str = "<root id=\"1\" name='test'><item value=\"42\" /></root>";
const REPEATED_XML: &str = "<root><item>Value1</item><item attr=\"test\">Value2</item></root>";

fn catalog(items: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<catalog>\n");
    for i in 0..items {
        xml.push_str(&format!(
            "  <product sku=\"{i}\">\n    <name>Item {i} &amp; co</name>\n    <notes><![CDATA[<b>{i}</b>]]></notes>\n  </product>\n"
        ));
    }
    xml.push_str("</catalog>\n");
    xml
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("xml2json_parse_simple", |b| {
        b.iter(|| from_xml_str(black_box(SIMPLE_XML)))
    });
    c.bench_function("xml2json_parse_attr", |b| {
        b.iter(|| from_xml_str(black_box(ATTR_XML)))
    });
}

fn bench_convert(c: &mut Criterion) {
    c.bench_function("xml2json_convert_repeated", |b| {
        b.iter(|| convert(black_box(REPEATED_XML)))
    });

    let large = catalog(1_000);
    c.bench_function("xml2json_convert_catalog_1000", |b| {
        b.iter(|| convert(black_box(&large)))
    });

    c.bench_function("xml2json_convert_and_write_catalog_1000", |b| {
        b.iter(|| convert(black_box(&large)).map(|value| to_string(&value, Style::default())))
    });
}

criterion_group!(benches, bench_parse, bench_convert);
criterion_main!(benches);
