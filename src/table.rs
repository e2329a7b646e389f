//! Rules for every `(relation, self shape, other shape)` triple.
//!
//! Each rule is a template: a conjunction of comparisons between a boundary
//! of the stored value and a boundary of the queried value. A triple without
//! a geometric meaning has no template and fails with
//! [`TemporaError::UnsupportedRelation`] instead of degrading to something
//! that would still return rows.

use tracing::trace;

use crate::datatype::{Shape, Timestamp};
use crate::error::{Result, TemporaError};
use crate::predicate::{
    Comparison as C, OtherBound as O, OtherValues, Predicate, PredicateBuilder, SelfBound as S, SelfFields, Term,
};
use crate::relation::Relation;
use crate::settings::EqualsMode;

/// A queried value after normalization: degenerate periods have become
/// instants, and reduced-precision instants have become periods that still
/// remember the instant they came from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Other {
    Instant(Timestamp),
    Period { begin: Timestamp, end: Timestamp },
    Reduced { origin: Timestamp, begin: Timestamp, end: Timestamp },
}

impl Other {
    pub fn shape(&self) -> Shape {
        match self {
            Other::Instant(_) => Shape::Instant,
            Other::Period { .. } | Other::Reduced { .. } => Shape::Period,
        }
    }
    pub fn is_reduced(&self) -> bool {
        matches!(self, Other::Reduced { .. })
    }
    pub fn values(&self) -> OtherValues {
        match *self {
            Other::Instant(t) => OtherValues { begin: t, end: t, origin: None },
            Other::Period { begin, end } => OtherValues { begin, end, origin: None },
            Other::Reduced { origin, begin, end } => OtherValues { begin, end, origin: Some(origin) },
        }
    }
}

const fn t(left: S, op: C, right: O) -> Term {
    Term::new(left, op, right)
}

// self is before other
const BEFORE_PP: &[Term] = &[t(S::End, C::Less, O::Begin)];
const BEFORE_PI: &[Term] = &[t(S::End, C::Less, O::Position)];
const BEFORE_IP: &[Term] = &[t(S::Position, C::Less, O::Begin)];
const BEFORE_II: &[Term] = &[t(S::Position, C::Less, O::Position)];

// self is after other
const AFTER_PP: &[Term] = &[t(S::Begin, C::Greater, O::End)];
const AFTER_PI: &[Term] = &[t(S::Begin, C::Greater, O::Position)];
const AFTER_IP: &[Term] = &[t(S::Position, C::Greater, O::End)];
const AFTER_II: &[Term] = &[t(S::Position, C::Greater, O::Position)];

const BEGINS_PP: &[Term] = &[t(S::Begin, C::Equal, O::Begin), t(S::End, C::Less, O::End)];
const BEGINS_IP: &[Term] = &[t(S::Position, C::Equal, O::Begin)];

const BEGUN_BY_PP: &[Term] = &[t(S::Begin, C::Equal, O::Begin), t(S::End, C::Greater, O::End)];
const BEGUN_BY_PI: &[Term] = &[t(S::Begin, C::Equal, O::Position), t(S::End, C::Greater, O::Position)];

const ENDS_PP: &[Term] = &[t(S::End, C::Equal, O::End), t(S::Begin, C::Greater, O::Begin)];
const ENDS_IP: &[Term] = &[t(S::Position, C::Equal, O::End)];

const ENDED_BY_PP: &[Term] = &[t(S::End, C::Equal, O::End), t(S::Begin, C::Less, O::Begin)];
const ENDED_BY_PI: &[Term] = &[t(S::End, C::Equal, O::Position), t(S::Begin, C::Less, O::Position)];

const DURING_PP: &[Term] = &[t(S::Begin, C::Greater, O::Begin), t(S::End, C::Less, O::End)];
const DURING_IP: &[Term] = &[t(S::Position, C::Greater, O::Begin), t(S::Position, C::Less, O::End)];

const CONTAINS_PP: &[Term] = &[t(S::Begin, C::Less, O::Begin), t(S::End, C::Greater, O::End)];
const CONTAINS_PI: &[Term] = &[t(S::Begin, C::Less, O::Position), t(S::End, C::Greater, O::Position)];

const EQUALS_PP: &[Term] = &[t(S::Begin, C::Equal, O::Begin), t(S::End, C::Equal, O::End)];
const EQUALS_II: &[Term] = &[t(S::Position, C::Equal, O::Position)];
// other was given with reduced precision
const EQUALS_PP_WITHIN: &[Term] = &[t(S::Begin, C::GreaterOrEqual, O::Begin), t(S::End, C::LessOrEqual, O::End)];
const EQUALS_IP_ORIGIN: &[Term] = &[t(S::Position, C::Equal, O::Origin)];

const MEETS_PP: &[Term] = &[t(S::End, C::Equal, O::Begin)];
const MET_BY_PP: &[Term] = &[t(S::Begin, C::Equal, O::End)];

const OVERLAPS_PP: &[Term] = &[
    t(S::Begin, C::Less, O::Begin),
    t(S::End, C::Greater, O::Begin),
    t(S::End, C::Less, O::End),
];
const OVERLAPPED_BY_PP: &[Term] = &[
    t(S::Begin, C::Greater, O::Begin),
    t(S::Begin, C::Less, O::End),
    t(S::End, C::Greater, O::End),
];

/// Looks up and renders relation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationTable {
    equals: EqualsMode,
}

impl RelationTable {
    pub fn new(equals: EqualsMode) -> Self {
        Self { equals }
    }

    /// The template for a triple, or `None` where the triple is undefined.
    pub fn template(&self, relation: Relation, self_shape: Shape, other: &Other) -> Option<&'static [Term]> {
        use Relation::*;
        use Shape::{Instant as I, Period as P};
        let reduced = other.is_reduced();
        match (relation, self_shape, other.shape()) {
            (Before, P, P) => Some(BEFORE_PP),
            (Before, P, I) => Some(BEFORE_PI),
            (Before, I, P) => Some(BEFORE_IP),
            (Before, I, I) => Some(BEFORE_II),

            (After, P, P) => Some(AFTER_PP),
            (After, P, I) => Some(AFTER_PI),
            (After, I, P) => Some(AFTER_IP),
            (After, I, I) => Some(AFTER_II),

            (Begins, P, P) => Some(BEGINS_PP),
            (Begins, P, I) => None,
            (Begins, I, P) => Some(BEGINS_IP),
            (Begins, I, I) => None,

            (BegunBy, P, P) => Some(BEGUN_BY_PP),
            (BegunBy, P, I) => Some(BEGUN_BY_PI),
            (BegunBy, I, P) => None,
            (BegunBy, I, I) => None,

            (Ends, P, P) => Some(ENDS_PP),
            (Ends, P, I) => None,
            (Ends, I, P) => Some(ENDS_IP),
            (Ends, I, I) => None,

            (EndedBy, P, P) => Some(ENDED_BY_PP),
            (EndedBy, P, I) => Some(ENDED_BY_PI),
            (EndedBy, I, P) => None,
            (EndedBy, I, I) => None,

            (During, P, P) => Some(DURING_PP),
            (During, P, I) => None,
            (During, I, P) => Some(DURING_IP),
            (During, I, I) => None,

            (Contains, P, P) => Some(CONTAINS_PP),
            (Contains, P, I) => Some(CONTAINS_PI),
            (Contains, I, P) => None,
            (Contains, I, I) => None,

            (Equals, P, P) if reduced && self.equals == EqualsMode::Containment => Some(EQUALS_PP_WITHIN),
            (Equals, P, P) => Some(EQUALS_PP),
            (Equals, P, I) => None,
            (Equals, I, P) if reduced => Some(EQUALS_IP_ORIGIN),
            (Equals, I, P) => None,
            (Equals, I, I) => Some(EQUALS_II),

            (Meets, P, P) => Some(MEETS_PP),
            (Meets, P, I) => None,
            (Meets, I, P) => None,
            (Meets, I, I) => None,

            (MetBy, P, P) => Some(MET_BY_PP),
            (MetBy, P, I) => None,
            (MetBy, I, P) => None,
            (MetBy, I, I) => None,

            (Overlaps, P, P) => Some(OVERLAPS_PP),
            (Overlaps, P, I) => None,
            (Overlaps, I, P) => None,
            (Overlaps, I, I) => None,

            (OverlappedBy, P, P) => Some(OVERLAPPED_BY_PP),
            (OverlappedBy, P, I) => None,
            (OverlappedBy, I, P) => None,
            (OverlappedBy, I, I) => None,
        }
    }

    pub fn is_defined(&self, relation: Relation, self_shape: Shape, other: &Other) -> bool {
        self.template(relation, self_shape, other).is_some()
    }

    /// Renders the rule for a triple against the given stored fields.
    pub fn build(
        &self,
        relation: Relation,
        self_shape: Shape,
        fields: SelfFields,
        other: &Other,
        builder: &PredicateBuilder,
    ) -> Result<Predicate> {
        trace!(%relation, %self_shape, other_shape = %other.shape(), reduced = other.is_reduced(), "relation lookup");
        let template = self.template(relation, self_shape, other).ok_or(TemporaError::UnsupportedRelation {
            relation,
            self_shape,
            other_shape: other.shape(),
        })?;
        Ok(builder.render(template, fields, other.values()))
    }
}

/// Whether the period rule, read on a row where begin equals end, says the
/// same thing as the instant rule. When it does, no degeneracy guard is needed.
pub fn collapses_to(period_rule: &[Term], instant_rule: &[Term]) -> bool {
    let collapse = |rule: &[Term]| -> Vec<Term> {
        let mut terms: Vec<Term> = rule.iter().map(|term| Term { left: S::Position, ..*term }).collect();
        terms.dedup();
        terms
    };
    collapse(period_rule) == collapse(instant_rule)
}
