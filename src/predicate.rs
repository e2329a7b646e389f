//! The boolean expression tree produced by the engine, and the builder that
//! renders relation templates into it.
//!
//! A [`Predicate`] never refers to a concrete query language. It is handed to
//! a [`Binder`], which maps each node onto whatever backend the caller uses.
//! [`Predicate::matches`] evaluates the tree directly against a [`Record`],
//! which is how rows are filtered in memory and how the rules are tested.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use serde::{Deserialize, Serialize};

use crate::datatype::Timestamp;

#[derive(Eq, PartialEq, Debug, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Comparison {
    Less,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    Greater,
}
impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessOrEqual => "<=",
            Comparison::Equal => "=",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Greater => ">",
        }
    }
    /// Whether `left op right` holds, given `left.cmp(right)`.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Comparison::Less => ordering == Ordering::Less,
            Comparison::LessOrEqual => ordering != Ordering::Greater,
            Comparison::Equal => ordering == Ordering::Equal,
            Comparison::GreaterOrEqual => ordering != Ordering::Less,
            Comparison::Greater => ordering == Ordering::Greater,
        }
    }
}
impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Caller-supplied discriminator appended to placeholder names, so the same
/// relation can appear several times in one query without name collisions.
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct PlaceholderScope(pub u32);

impl fmt::Display for PlaceholderScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The right-hand side of a comparison.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Serialize, Deserialize)]
pub enum Operand {
    Literal(Timestamp),
    /// A named parameter together with the value it must be bound to.
    Placeholder { name: String, value: Timestamp },
    /// Another stored field of the same row.
    Field(String),
}
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Literal(t) => write!(f, "{}", t),
            Operand::Placeholder { name, .. } => write!(f, ":{}", name),
            Operand::Field(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Hash, Clone, Serialize, Deserialize)]
pub enum Predicate {
    Compare { field: String, op: Comparison, operand: Operand },
    IsNull(String),
    IsNotNull(String),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Collects the placeholders in the order a binder will meet them.
    pub fn placeholders(&self) -> Vec<(&str, Timestamp)> {
        let mut found = Vec::new();
        self.collect_placeholders(&mut found);
        found
    }
    fn collect_placeholders<'a>(&'a self, found: &mut Vec<(&'a str, Timestamp)>) {
        match self {
            Predicate::Compare { operand: Operand::Placeholder { name, value }, .. } => {
                found.push((name.as_str(), *value));
            }
            Predicate::And(parts) | Predicate::Or(parts) => {
                for part in parts {
                    part.collect_placeholders(found);
                }
            }
            _ => (),
        }
    }

    /// Folds the tree through a binder, children before parents.
    pub fn bind<B: Binder>(&self, binder: &mut B) -> B::Output {
        match self {
            Predicate::Compare { field, op, operand } => binder.compare(field, *op, operand),
            Predicate::IsNull(field) => binder.is_null(field),
            Predicate::IsNotNull(field) => binder.is_not_null(field),
            Predicate::And(parts) => {
                let bound = parts.iter().map(|p| p.bind(binder)).collect();
                binder.and(bound)
            }
            Predicate::Or(parts) => {
                let bound = parts.iter().map(|p| p.bind(binder)).collect();
                binder.or(bound)
            }
        }
    }

    /// Evaluates the predicate against a single row.
    ///
    /// Follows SQL semantics for absent values: a comparison involving a
    /// missing field is not satisfied. Since the tree has no negation, treating
    /// "unknown" as false gives the same answer a query backend would.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::Compare { field, op, operand } => {
                let left = match record.value(field) {
                    Some(v) => v,
                    None => return false,
                };
                let right = match operand {
                    Operand::Literal(t) => *t,
                    Operand::Placeholder { value, .. } => *value,
                    Operand::Field(other) => match record.value(other) {
                        Some(v) => v,
                        None => return false,
                    },
                };
                op.holds(left.cmp(&right))
            }
            Predicate::IsNull(field) => record.value(field).is_none(),
            Predicate::IsNotNull(field) => record.value(field).is_some(),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(record)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(record)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn join(f: &mut fmt::Formatter, parts: &[Predicate], glue: &str) -> fmt::Result {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", glue)?;
                }
                write!(f, "({})", part)?;
            }
            Ok(())
        }
        match self {
            Predicate::Compare { field, op, operand } => write!(f, "{} {} {}", field, op, operand),
            Predicate::IsNull(field) => write!(f, "{} IS NULL", field),
            Predicate::IsNotNull(field) => write!(f, "{} IS NOT NULL", field),
            Predicate::And(parts) => join(f, parts, "AND"),
            Predicate::Or(parts) => join(f, parts, "OR"),
        }
    }
}

/// The boundary towards a query backend: one constructor per predicate node.
pub trait Binder {
    type Output;
    fn compare(&mut self, field: &str, op: Comparison, operand: &Operand) -> Self::Output;
    fn is_null(&mut self, field: &str) -> Self::Output;
    fn is_not_null(&mut self, field: &str) -> Self::Output;
    fn and(&mut self, parts: Vec<Self::Output>) -> Self::Output;
    fn or(&mut self, parts: Vec<Self::Output>) -> Self::Output;
}

/// A row of stored time values, looked up by field name. `None` is null.
pub trait Record {
    fn value(&self, field: &str) -> Option<Timestamp>;
}
impl<K: Borrow<str> + Ord> Record for BTreeMap<K, Timestamp> {
    fn value(&self, field: &str) -> Option<Timestamp> {
        self.get(field).copied()
    }
}
impl<K: Borrow<str> + Hash + Eq, S: BuildHasher> Record for HashMap<K, Timestamp, S> {
    fn value(&self, field: &str) -> Option<Timestamp> {
        self.get(field).copied()
    }
}
impl<K: Borrow<str> + Ord> Record for BTreeMap<K, Option<Timestamp>> {
    fn value(&self, field: &str) -> Option<Timestamp> {
        self.get(field).copied().flatten()
    }
}

// ------------- Templates -------------

/// A boundary of the stored value. `Position` reads the begin field of a
/// period, which is where a degenerate period keeps its instant.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Copy)]
pub enum SelfBound {
    Begin,
    End,
    Position,
}

/// A boundary of the queried value. `Origin` is the instant a
/// reduced-precision period was expanded from.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Copy)]
pub enum OtherBound {
    Begin,
    End,
    Position,
    Origin,
}
impl OtherBound {
    fn role(&self) -> &'static str {
        match self {
            OtherBound::Begin => "other_begin",
            OtherBound::End => "other_end",
            OtherBound::Position => "other_position",
            OtherBound::Origin => "other_origin",
        }
    }
}

/// One conjunct of a relation template: `self.left op other.right`.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Copy)]
pub struct Term {
    pub left: SelfBound,
    pub op: Comparison,
    pub right: OtherBound,
}
impl Term {
    pub const fn new(left: SelfBound, op: Comparison, right: OtherBound) -> Term {
        Term { left, op, right }
    }
}

/// The stored fields a template's self bounds resolve to.
#[derive(Debug, Clone, Copy)]
pub struct SelfFields<'a> {
    pub begin: &'a str,
    pub end: &'a str,
}

/// The queried values a template's other bounds resolve to.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct OtherValues {
    pub begin: Timestamp,
    pub end: Timestamp,
    pub origin: Option<Timestamp>,
}

/// Renders templates into predicates, binding values either as literals or,
/// when a scope is given, as placeholders named `{prefix}{role}_{scope}`.
#[derive(Debug, Clone)]
pub struct PredicateBuilder<'a> {
    scope: Option<PlaceholderScope>,
    prefix: &'a str,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(scope: Option<PlaceholderScope>, prefix: &'a str) -> Self {
        Self { scope, prefix }
    }
    pub fn literal() -> PredicateBuilder<'static> {
        PredicateBuilder { scope: None, prefix: "" }
    }

    fn operand(&self, role: &str, value: Timestamp) -> Operand {
        match self.scope {
            Some(scope) => Operand::Placeholder {
                name: format!("{}{}_{}", self.prefix, role, scope),
                value,
            },
            None => Operand::Literal(value),
        }
    }

    /// A single conjunct renders bare, several as an `And`.
    pub fn render(&self, template: &[Term], fields: SelfFields, other: OtherValues) -> Predicate {
        let mut parts: Vec<Predicate> = template
            .iter()
            .map(|term| {
                let field = match term.left {
                    SelfBound::Begin | SelfBound::Position => fields.begin,
                    SelfBound::End => fields.end,
                };
                let value = match term.right {
                    OtherBound::Begin | OtherBound::Position => other.begin,
                    OtherBound::End => other.end,
                    OtherBound::Origin => other.origin.unwrap_or(other.begin),
                };
                Predicate::Compare {
                    field: field.to_string(),
                    op: term.op,
                    operand: self.operand(term.right.role(), value),
                }
            })
            .collect();
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Predicate::And(parts)
        }
    }

    /// A comparison between two fields of the same row.
    pub fn fields(&self, left: &str, op: Comparison, right: &str) -> Predicate {
        Predicate::Compare {
            field: left.to_string(),
            op,
            operand: Operand::Field(right.to_string()),
        }
    }
}
