//! The 13 relations of Allen's interval algebra.
//!
//! Throughout, *self* is the stored value and *other* the queried one, so
//! `Before` reads "self is before other". Instants take part as degenerate
//! intervals wherever the relation still has a geometric meaning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemporaError};

#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Relation {
    /// Self ends strictly before other begins.
    Before,
    /// Self begins strictly after other ends.
    After,
    /// Self and other share their beginning, self ends first.
    Begins,
    /// Self and other share their beginning, other ends first.
    BegunBy,
    /// Self and other share their end, self begins last.
    Ends,
    /// Self and other share their end, other begins last.
    EndedBy,
    /// Self lies strictly inside other.
    During,
    /// Other lies strictly inside self.
    Contains,
    /// Self and other coincide.
    Equals,
    /// Self begins first, ends inside other.
    Overlaps,
    /// Other begins first, ends inside self.
    OverlappedBy,
    /// Self ends exactly where other begins.
    Meets,
    /// Self begins exactly where other ends.
    MetBy,
}

impl Relation {
    pub const ALL: [Relation; 13] = [
        Relation::Before,
        Relation::After,
        Relation::Begins,
        Relation::BegunBy,
        Relation::Ends,
        Relation::EndedBy,
        Relation::During,
        Relation::Contains,
        Relation::Equals,
        Relation::Overlaps,
        Relation::OverlappedBy,
        Relation::Meets,
        Relation::MetBy,
    ];

    /// The relation that holds when self and other swap places.
    pub fn inverse(&self) -> Relation {
        match self {
            Relation::Before => Relation::After,
            Relation::After => Relation::Before,
            Relation::Begins => Relation::BegunBy,
            Relation::BegunBy => Relation::Begins,
            Relation::Ends => Relation::EndedBy,
            Relation::EndedBy => Relation::Ends,
            Relation::During => Relation::Contains,
            Relation::Contains => Relation::During,
            Relation::Equals => Relation::Equals,
            Relation::Overlaps => Relation::OverlappedBy,
            Relation::OverlappedBy => Relation::Overlaps,
            Relation::Meets => Relation::MetBy,
            Relation::MetBy => Relation::Meets,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Relation::Before => "Before",
            Relation::After => "After",
            Relation::Begins => "Begins",
            Relation::BegunBy => "BegunBy",
            Relation::Ends => "Ends",
            Relation::EndedBy => "EndedBy",
            Relation::During => "During",
            Relation::Contains => "Contains",
            Relation::Equals => "Equals",
            Relation::Overlaps => "Overlaps",
            Relation::OverlappedBy => "OverlappedBy",
            Relation::Meets => "Meets",
            Relation::MetBy => "MetBy",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accepts the plain names case-insensitively, as well as the `T`-prefixed
/// operator names used by filter encodings (`TEquals`, `TContains`, `TOverlaps`).
impl FromStr for Relation {
    type Err = TemporaError;
    fn from_str(s: &str) -> Result<Relation> {
        let token = s.trim();
        let lowered = token.to_ascii_lowercase();
        let name = match lowered.as_str() {
            "tequals" | "tcontains" | "toverlaps" => &lowered[1..],
            other => other,
        };
        Relation::ALL
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| TemporaError::Parse { message: format!("Unknown temporal relation '{}'", token) })
    }
}
