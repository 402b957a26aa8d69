use core::{fmt, ops::Not};

/// A non-empty subset of `{true, false}`.
///
/// `Unknown` is `{true, false}`; the empty set has no representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanSet {
    True,
    False,
    Unknown,
}

impl BooleanSet {
    pub fn from_bool(value: bool) -> Self {
        if value {
            BooleanSet::True
        } else {
            BooleanSet::False
        }
    }

    /// The single value in the set, if there is only one.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            BooleanSet::True => Some(true),
            BooleanSet::False => Some(false),
            BooleanSet::Unknown => None,
        }
    }

    /// Whether `value` is a member of the set.
    pub fn possibly(self, value: bool) -> bool {
        match self {
            BooleanSet::True => value,
            BooleanSet::False => !value,
            BooleanSet::Unknown => true,
        }
    }

    /// Kleene conjunction.
    pub fn and(self, other: BooleanSet) -> BooleanSet {
        match (self, other) {
            (BooleanSet::False, _) | (_, BooleanSet::False) => BooleanSet::False,
            (BooleanSet::True, BooleanSet::True) => BooleanSet::True,
            _ => BooleanSet::Unknown,
        }
    }

    /// Kleene disjunction.
    pub fn or(self, other: BooleanSet) -> BooleanSet {
        match (self, other) {
            (BooleanSet::True, _) | (_, BooleanSet::True) => BooleanSet::True,
            (BooleanSet::False, BooleanSet::False) => BooleanSet::False,
            _ => BooleanSet::Unknown,
        }
    }

    /// Set union.
    pub fn union(self, other: BooleanSet) -> BooleanSet {
        if self == other {
            self
        } else {
            BooleanSet::Unknown
        }
    }
}

impl Not for BooleanSet {
    type Output = BooleanSet;

    fn not(self) -> BooleanSet {
        match self {
            BooleanSet::True => BooleanSet::False,
            BooleanSet::False => BooleanSet::True,
            BooleanSet::Unknown => BooleanSet::Unknown,
        }
    }
}

impl From<bool> for BooleanSet {
    fn from(value: bool) -> Self {
        BooleanSet::from_bool(value)
    }
}

impl fmt::Display for BooleanSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanSet::True => write!(f, "{{true}}"),
            BooleanSet::False => write!(f, "{{false}}"),
            BooleanSet::Unknown => write!(f, "{{true,false}}"),
        }
    }
}
