use std::collections::BTreeMap;

use chrono::NaiveDate;
use tempora::{
    FieldDescriptor, FieldRegistry, NullableFieldDescriptor, PlaceholderScope, Predicate, Relation, Restriction,
    TemporaError, TemporalFilter, TimeValue, Timestamp,
};

fn day(d: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn setup() -> (Restriction, FieldRegistry) {
    let registry = FieldRegistry::new()
        .with("phenomenonTime", FieldDescriptor::period("phen_begin", "phen_end"))
        .with("resultTime", FieldDescriptor::instant("result_time"))
        .with(
            "validTime",
            NullableFieldDescriptor::new(FieldDescriptor::period("valid_begin", "valid_end"), FieldDescriptor::instant("result_time")),
        );
    (Restriction::new(), registry)
}

#[test]
fn no_filters_means_no_predicate() {
    let (restriction, registry) = setup();
    assert_eq!(restriction.filter_all(&[], &registry).unwrap(), None);
    assert_eq!(registry.len(), 3);
}

#[test]
fn single_filter_is_returned_as_is() {
    let (restriction, registry) = setup();
    let filter = TemporalFilter::new(Relation::After, "resultTime", TimeValue::instant(day(3)));
    let predicate = restriction.filter_all(&[filter], &registry).unwrap().unwrap();
    assert_eq!(predicate.to_string(), "result_time > 2021-01-03 00:00:00");
}

#[test]
fn same_reference_is_or_different_references_are_and() {
    let (restriction, registry) = setup();
    let filters = [
        TemporalFilter::new(Relation::Before, "resultTime", TimeValue::instant(day(5))).scoped(PlaceholderScope(0)),
        TemporalFilter::new(Relation::During, "phenomenonTime", TimeValue::period(day(1), day(31)).unwrap())
            .scoped(PlaceholderScope(1)),
        TemporalFilter::new(Relation::After, "resultTime", TimeValue::instant(day(25))).scoped(PlaceholderScope(2)),
    ];
    let predicate = restriction.filter_all(&filters, &registry).unwrap().unwrap();
    let Predicate::And(groups) = &predicate else { panic!("expected a conjunction, got {predicate}") };
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].to_string(),
        "(result_time < :other_position_0) OR (result_time > :other_position_2)"
    );
    assert_eq!(
        groups[1].to_string(),
        "(phen_begin > :other_begin_1) AND (phen_end < :other_end_1)"
    );
    let names: Vec<&str> = predicate.placeholders().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["other_position_0", "other_position_2", "other_begin_1", "other_end_1"]);

    let row: BTreeMap<&str, Timestamp> =
        [("result_time", day(27)), ("phen_begin", day(10)), ("phen_end", day(12))].into_iter().collect();
    assert!(predicate.matches(&row));
    let row: BTreeMap<&str, Timestamp> =
        [("result_time", day(15)), ("phen_begin", day(10)), ("phen_end", day(12))].into_iter().collect();
    assert!(!predicate.matches(&row));
}

#[test]
fn nullable_references_compose_like_any_other() {
    let (restriction, registry) = setup();
    let filters = [TemporalFilter::new(Relation::Before, "validTime", TimeValue::instant(day(9)))];
    let predicate = restriction.filter_all(&filters, &registry).unwrap().unwrap();
    assert!(matches!(predicate, Predicate::Or(ref branches) if branches.len() == 2));
}

#[test]
fn unknown_reference_is_rejected() {
    let (restriction, registry) = setup();
    let filters = [TemporalFilter::new(Relation::Before, "samplingTime", TimeValue::instant(day(9)))];
    let err = restriction.filter_all(&filters, &registry).unwrap_err();
    assert_eq!(err, TemporaError::UnknownValueReference("samplingTime".into()));
}

#[test]
fn first_failing_filter_fails_the_batch() {
    let (restriction, registry) = setup();
    let filters = [
        TemporalFilter::new(Relation::After, "resultTime", TimeValue::instant(day(3))),
        TemporalFilter::new(Relation::Meets, "resultTime", TimeValue::instant(day(4))),
    ];
    let err = restriction.filter_all(&filters, &registry).unwrap_err();
    assert!(matches!(err, TemporaError::UnsupportedRelation { relation: Relation::Meets, .. }));
}

#[test]
fn filters_deserialize_from_json() {
    let (restriction, registry) = setup();
    let json = r#"[
        {"relation": "During", "value_reference": "phenomenonTime",
         "value": {"Period": {"start": "2021-01-01T00:00:00", "end": "2021-01-31T00:00:00"}}, "scope": 7}
    ]"#;
    let filters: Vec<TemporalFilter> = serde_json::from_str(json).unwrap();
    assert_eq!(filters[0].scope, Some(PlaceholderScope(7)));
    let predicate = restriction.filter_all(&filters, &registry).unwrap().unwrap();
    assert_eq!(predicate.to_string(), "(phen_begin > :other_begin_7) AND (phen_end < :other_end_7)");
}
