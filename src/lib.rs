//! Tempora – query predicates for Allen's interval relations.
//!
//! Tempora builds the boolean test that decides whether a *stored* time value
//! stands in one of Allen's 13 interval relations to a *queried* one:
//! * The stored side is described by a [`field::FieldDescriptor`]: one field
//!   for an instant, a begin and an end field for a period.
//! * A [`field::NullableFieldDescriptor`] names a primary descriptor that may be
//!   null on some rows and an alternate, possibly differently shaped, to fall
//!   back on.
//! * The queried side is a [`datatype::TimeValue`], an instant or a period.
//! * The result is a [`predicate::Predicate`] tree of comparisons, null tests,
//!   conjunctions and disjunctions, independent of any query language.
//!
//! ## Modules
//! * [`relation`] – The 13 relations, their inverses, and token parsing.
//! * [`datatype`] – Timestamps, precisions, shapes and queried time values.
//! * [`field`] – Descriptors of where stored values live.
//! * [`predicate`] – The predicate tree, the builder rendering it, and the
//!   [`predicate::Binder`] boundary towards a query backend.
//! * [`precision`] – Expansion of reduced-precision instants such as `"2020"`.
//! * [`table`] – The explicit rule for every relation and pair of shapes.
//! * [`restriction`] – The [`restriction::Restriction`] entry point.
//! * [`settings`] – Engine settings, loadable through the `config` crate.
//!
//! ## Degenerate values
//! A queried period whose start equals its end is an instant. A stored period
//! may also turn out to be degenerate, but only row by row, so the generated
//! predicate guards on `begin < end` versus `begin = end` whenever the period
//! and instant rules of a relation differ.
//!
//! ## Reduced precision
//! An instant written as `"2020"` denotes the whole year. It is expanded to
//! `[2020-01-01T00:00:00, 2020-12-31T23:59:59]` before the rule lookup, and
//! `Equals` against a stored period then means "lies within that year" (see
//! [`settings::EqualsMode`]).
//!
//! ## Quick Start
//! ```
//! use tempora::{FieldDescriptor, Relation, Restriction, TimeValue};
//! let restriction = Restriction::new();
//! let resolver = restriction.resolver();
//! let january = match (resolver.instant("2021-01-01").unwrap(), resolver.instant("2021-01-31").unwrap()) {
//!     (TimeValue::Instant { value: start, .. }, TimeValue::Instant { value: end, .. }) => TimeValue::period(start, end).unwrap(),
//!     _ => unreachable!(),
//! };
//! let stored = FieldDescriptor::period("b", "e").into();
//! let predicate = restriction.evaluate(Relation::During, &stored, &january, None).unwrap();
//! assert_eq!(predicate.to_string(), "(b > 2021-01-01 00:00:00) AND (e < 2021-01-31 00:00:00)");
//! ```
//!
//! ## Errors
//! Roughly half of the 52 combinations of relation and shapes have no
//! geometric meaning. Asking for one fails with
//! [`TemporaError::UnsupportedRelation`]; the engine never substitutes a
//! neighbouring relation.

pub mod datatype;
pub mod error;
pub mod field;
pub mod precision;
pub mod predicate;
pub mod relation;
pub mod restriction;
pub mod settings;
pub mod table;

pub use datatype::{Precision, Shape, TimeValue, Timestamp};
pub use error::{Result, TemporaError};
pub use field::{FieldDescriptor, FieldRegistry, NullableFieldDescriptor, StoredField};
pub use precision::{Calendar, IsoCalendar, ReducedPrecisionResolver};
pub use predicate::{Binder, Comparison, Operand, PlaceholderScope, Predicate, Record};
pub use relation::Relation;
pub use restriction::{Restriction, TemporalFilter};
pub use settings::{EqualsMode, Settings};
