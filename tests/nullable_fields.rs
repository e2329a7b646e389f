use std::collections::BTreeMap;

use chrono::NaiveDate;
use tempora::{
    FieldDescriptor, NullableFieldDescriptor, Predicate, Relation, Restriction, StoredField, TemporaError, TimeValue,
    Timestamp,
};

fn day(d: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn setup() -> (Restriction, StoredField) {
    // a phenomenon period that may be missing, with a single result time to fall back on
    let nullable = NullableFieldDescriptor::new(
        FieldDescriptor::period("phenomenon_begin", "phenomenon_end"),
        FieldDescriptor::instant("result_time"),
    );
    (Restriction::new(), nullable.into())
}

fn row(fields: &[(&'static str, Option<Timestamp>)]) -> BTreeMap<&'static str, Option<Timestamp>> {
    fields.iter().copied().collect()
}

#[test]
fn primary_and_alternate_are_null_guarded() {
    let (restriction, stored) = setup();
    let january = TimeValue::period(day(1), day(31)).unwrap();
    let predicate = restriction.evaluate(Relation::During, &stored, &january, None).unwrap();
    let Predicate::Or(branches) = &predicate else { panic!("expected a disjunction, got {predicate}") };
    assert_eq!(branches.len(), 2);
    assert_eq!(
        branches[0].to_string(),
        "(phenomenon_begin IS NOT NULL) AND (phenomenon_begin > 2021-01-01 00:00:00) AND (phenomenon_end < 2021-01-31 00:00:00)"
    );
    assert_eq!(
        branches[1].to_string(),
        "(phenomenon_begin IS NULL) AND (result_time > 2021-01-01 00:00:00) AND (result_time < 2021-01-31 00:00:00)"
    );
}

#[test]
fn alternate_is_consulted_only_when_primary_is_null() {
    let (restriction, stored) = setup();
    let january = TimeValue::period(day(1), day(31)).unwrap();
    let predicate = restriction.evaluate(Relation::During, &stored, &january, None).unwrap();

    // primary null, alternate matching
    assert!(predicate.matches(&row(&[
        ("phenomenon_begin", None),
        ("phenomenon_end", None),
        ("result_time", Some(day(15))),
    ])));
    // primary null, alternate outside
    assert!(!predicate.matches(&row(&[("phenomenon_begin", None), ("phenomenon_end", None), ("result_time", Some(day(31)))])));
    // primary present but outside, even though the alternate would match
    assert!(!predicate.matches(&row(&[
        ("phenomenon_begin", Some(day(20))),
        ("phenomenon_end", Some(day(31))),
        ("result_time", Some(day(15))),
    ])));
    // primary present and inside
    assert!(predicate.matches(&row(&[
        ("phenomenon_begin", Some(day(2))),
        ("phenomenon_end", Some(day(30))),
        ("result_time", None),
    ])));
}

#[test]
fn branches_keep_their_own_shape_rules() {
    let (restriction, stored) = setup();
    // Begins differs between a period and a degenerate period, but the alternate is a plain instant
    let january = TimeValue::period(day(1), day(31)).unwrap();
    let predicate = restriction.evaluate(Relation::Begins, &stored, &january, None).unwrap();
    let Predicate::Or(branches) = &predicate else { panic!("expected a disjunction") };
    assert!(matches!(&branches[0], Predicate::And(parts) if matches!(parts[1], Predicate::Or(_))));
    assert_eq!(branches[1].to_string(), "(phenomenon_begin IS NULL) AND (result_time = 2021-01-01 00:00:00)");
}

#[test]
fn undefined_alternate_fails_the_whole_call() {
    let (restriction, stored) = setup();
    // Contains is defined for the period primary against an instant, not for the instant alternate
    let err = restriction
        .evaluate(Relation::Contains, &stored, &TimeValue::instant(day(5)), None)
        .unwrap_err();
    assert!(matches!(err, TemporaError::UnsupportedRelation { relation: Relation::Contains, .. }));
}

#[test]
fn instant_primary_is_its_own_anchor() {
    let restriction = Restriction::new();
    let stored: StoredField =
        NullableFieldDescriptor::new(FieldDescriptor::instant("sampled"), FieldDescriptor::instant("reported")).into();
    let predicate = restriction
        .evaluate(Relation::After, &stored, &TimeValue::instant(day(10)), None)
        .unwrap();
    assert_eq!(
        predicate.to_string(),
        "((sampled IS NOT NULL) AND (sampled > 2021-01-10 00:00:00)) OR ((sampled IS NULL) AND (reported > 2021-01-10 00:00:00))"
    );
}
