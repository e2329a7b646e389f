use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use chrono::NaiveDate;
use tempora::{
    FieldDescriptor, NullableFieldDescriptor, PlaceholderScope, Relation, Restriction, StoredField, TimeValue, Timestamp,
};

fn day(d: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn every_relation(c: &mut Criterion) {
    let restriction = Restriction::new();
    let stored: StoredField = FieldDescriptor::period("b", "e").into();
    let january = TimeValue::period(day(1), day(31)).unwrap();
    c.bench_function("evaluate all relations, period against period", |b| {
        b.iter(|| {
            for relation in Relation::ALL {
                let _ = black_box(restriction.evaluate(relation, &stored, black_box(&january), None));
            }
        })
    });
}

fn nullable_reduced(c: &mut Criterion) {
    let restriction = Restriction::new();
    let stored: StoredField =
        NullableFieldDescriptor::new(FieldDescriptor::period("b", "e"), FieldDescriptor::instant("t")).into();
    let year = restriction.resolver().instant("2020").unwrap();
    c.bench_function("evaluate equals, nullable against reduced year", |b| {
        b.iter(|| restriction.evaluate(Relation::Equals, &stored, black_box(&year), Some(PlaceholderScope(1))))
    });
}

criterion_group!(benches, every_relation, nullable_reduced);
criterion_main!(benches);
