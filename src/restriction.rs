//! The public entry point: turns a relation between a stored field and a
//! queried time value into a [`Predicate`].
//!
//! Evaluation order:
//! 1. a nullable descriptor is expanded into a null-guarded disjunction over
//!    its primary and alternate branches;
//! 2. the queried value is normalized (degenerate periods become instants,
//!    reduced-precision instants become periods);
//! 3. a period-shaped stored value, whose begin may equal its end on some
//!    rows, is guarded so degenerate rows are judged by the instant rule;
//! 4. the rules themselves come from the [`RelationTable`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::datatype::{Shape, TimeValue};
use crate::error::{Result, TemporaError};
use crate::field::{FieldDescriptor, FieldRegistry, NullableFieldDescriptor, StoredField};
use crate::precision::{Calendar, IsoCalendar, ReducedPrecisionResolver};
use crate::predicate::{Comparison, PlaceholderScope, Predicate, PredicateBuilder, SelfFields};
use crate::relation::Relation;
use crate::settings::Settings;
use crate::table::{collapses_to, Other, RelationTable};

/// One relation applied to a value reference, as it arrives from a request.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TemporalFilter {
    pub relation: Relation,
    pub value_reference: String,
    pub value: TimeValue,
    #[serde(default)]
    pub scope: Option<PlaceholderScope>,
}

impl TemporalFilter {
    pub fn new(relation: Relation, value_reference: impl Into<String>, value: TimeValue) -> Self {
        Self { relation, value_reference: value_reference.into(), value, scope: None }
    }
    pub fn scoped(mut self, scope: PlaceholderScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Stateless predicate factory. Cheap to clone and safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct Restriction<C: Calendar = IsoCalendar> {
    resolver: ReducedPrecisionResolver<C>,
    table: RelationTable,
    settings: Settings,
}

impl Restriction<IsoCalendar> {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_resolver(settings, ReducedPrecisionResolver::new())
    }
}

impl<C: Calendar> Restriction<C> {
    pub fn with_resolver(settings: Settings, resolver: ReducedPrecisionResolver<C>) -> Self {
        Self {
            resolver,
            table: RelationTable::new(settings.reduced_precision_equals),
            settings,
        }
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn resolver(&self) -> &ReducedPrecisionResolver<C> {
        &self.resolver
    }
    pub fn table(&self) -> &RelationTable {
        &self.table
    }

    /// Builds the predicate testing `stored relation other`.
    pub fn evaluate(
        &self,
        relation: Relation,
        stored: &StoredField,
        other: &TimeValue,
        scope: Option<PlaceholderScope>,
    ) -> Result<Predicate> {
        let other = self.normalize(other)?;
        let builder = PredicateBuilder::new(scope, &self.settings.placeholder_prefix);
        match stored {
            StoredField::Plain(descriptor) => self.evaluate_plain(relation, descriptor, &other, &builder),
            StoredField::Nullable(nullable) => self.evaluate_nullable(relation, nullable, &other, &builder),
        }
    }

    /// Rejects reversed periods, collapses degenerate ones to instants, and
    /// expands reduced-precision instants into the periods they denote.
    pub fn normalize(&self, other: &TimeValue) -> Result<Other> {
        match *other {
            TimeValue::Period { start, end } if start > end => Err(TemporaError::MalformedPeriod { start, end }),
            TimeValue::Period { start, end } if start == end => Ok(Other::Instant(start)),
            TimeValue::Period { start, end } => Ok(Other::Period { begin: start, end }),
            TimeValue::Instant { value, .. } => match self.resolver.resolve(other) {
                Some(TimeValue::Period { start, end }) => Ok(Other::Reduced { origin: value, begin: start, end }),
                _ => Ok(Other::Instant(value)),
            },
        }
    }

    fn evaluate_nullable(
        &self,
        relation: Relation,
        nullable: &NullableFieldDescriptor,
        other: &Other,
        builder: &PredicateBuilder,
    ) -> Result<Predicate> {
        let anchor = nullable.primary.anchor();
        debug!(%relation, primary = %nullable.primary, alternate = %nullable.alternate, "nullable stored field");
        let primary = self.evaluate_plain(relation, &nullable.primary, other, builder)?;
        let alternate = self.evaluate_plain(relation, &nullable.alternate, other, builder)?;
        Ok(Predicate::Or(vec![
            guarded(Predicate::IsNotNull(anchor.to_string()), primary),
            guarded(Predicate::IsNull(anchor.to_string()), alternate),
        ]))
    }

    fn evaluate_plain(
        &self,
        relation: Relation,
        descriptor: &FieldDescriptor,
        other: &Other,
        builder: &PredicateBuilder,
    ) -> Result<Predicate> {
        match descriptor {
            FieldDescriptor::Instant { position } => {
                let fields = SelfFields { begin: position.as_str(), end: position.as_str() };
                self.table.build(relation, Shape::Instant, fields, other, builder)
            }
            FieldDescriptor::Period { begin, end } => {
                let fields = SelfFields { begin: begin.as_str(), end: end.as_str() };
                let period_rule = self.table.template(relation, Shape::Period, other);
                let instant_rule = self.table.template(relation, Shape::Instant, other);
                match (period_rule, instant_rule) {
                    (Some(p), Some(i)) if collapses_to(p, i) => {
                        self.table.build(relation, Shape::Period, fields, other, builder)
                    }
                    (Some(_), Some(_)) => {
                        let period = self.table.build(relation, Shape::Period, fields, other, builder)?;
                        let instant = self.table.build(relation, Shape::Instant, fields, other, builder)?;
                        Ok(Predicate::Or(vec![
                            guarded(builder.fields(begin, Comparison::Less, end), period),
                            guarded(builder.fields(begin, Comparison::Equal, end), instant),
                        ]))
                    }
                    (Some(_), None) => self.table.build(relation, Shape::Period, fields, other, builder),
                    // the instant rule only reads begin, so rows with a real extent must be kept out
                    (None, Some(_)) => {
                        let instant = self.table.build(relation, Shape::Instant, fields, other, builder)?;
                        Ok(guarded(builder.fields(begin, Comparison::Equal, end), instant))
                    }
                    (None, None) => Err(TemporaError::UnsupportedRelation {
                        relation,
                        self_shape: Shape::Period,
                        other_shape: other.shape(),
                    }),
                }
            }
        }
    }

    /// Combines several filters into one predicate. Filters on the same value
    /// reference are alternatives (`Or`); different references must all hold
    /// (`And`). Returns `None` when there is nothing to filter on.
    pub fn filter_all(&self, filters: &[TemporalFilter], registry: &FieldRegistry) -> Result<Option<Predicate>> {
        let mut groups: Vec<(&str, Vec<Predicate>)> = Vec::new();
        for filter in filters {
            let stored = registry.lookup(&filter.value_reference)?;
            let predicate = self.evaluate(filter.relation, stored, &filter.value, filter.scope)?;
            match groups.iter_mut().find(|(reference, _)| *reference == filter.value_reference) {
                Some((_, alternatives)) => alternatives.push(predicate),
                None => groups.push((&filter.value_reference, vec![predicate])),
            }
        }
        let mut conjuncts: Vec<Predicate> = groups
            .into_iter()
            .map(|(_, mut alternatives)| {
                if alternatives.len() == 1 {
                    alternatives.remove(0)
                } else {
                    Predicate::Or(alternatives)
                }
            })
            .collect();
        Ok(match conjuncts.len() {
            0 => None,
            1 => Some(conjuncts.remove(0)),
            _ => Some(Predicate::And(conjuncts)),
        })
    }
}

/// `And(guard, rule)`, keeping a conjunctive rule's terms at the same level.
fn guarded(guard: Predicate, rule: Predicate) -> Predicate {
    match rule {
        Predicate::And(mut terms) => {
            terms.insert(0, guard);
            Predicate::And(terms)
        }
        rule => Predicate::And(vec![guard, rule]),
    }
}
