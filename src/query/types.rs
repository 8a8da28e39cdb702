//! Core types for the query system

use crate::schema::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field type plus array-ness of the field a leaf condition targets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    pub field_type: FieldType,
    /// Whether the field may hold several values per document
    #[serde(default)]
    pub is_array: bool,
}

impl ValueType {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            is_array: false,
        }
    }

    pub fn array(field_type: FieldType) -> Self {
        Self {
            field_type,
            is_array: true,
        }
    }
}

/// Lower bound comparator of a range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LowerCmp {
    Gt,
    Gte,
}

/// Upper bound comparator of a range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpperCmp {
    Lt,
    Lte,
}

impl LowerCmp {
    pub fn is_inclusive(&self) -> bool {
        matches!(self, LowerCmp::Gte)
    }

    pub fn key(&self) -> &'static str {
        match self {
            LowerCmp::Gt => "gt",
            LowerCmp::Gte => "gte",
        }
    }

    /// The upper comparator covering exactly the values this one excludes
    pub fn complement(&self) -> UpperCmp {
        match self {
            LowerCmp::Gt => UpperCmp::Lte,
            LowerCmp::Gte => UpperCmp::Lt,
        }
    }
}

impl UpperCmp {
    pub fn is_inclusive(&self) -> bool {
        matches!(self, UpperCmp::Lte)
    }

    pub fn key(&self) -> &'static str {
        match self {
            UpperCmp::Lt => "lt",
            UpperCmp::Lte => "lte",
        }
    }

    /// The lower comparator covering exactly the values this one excludes
    pub fn complement(&self) -> LowerCmp {
        match self {
            UpperCmp::Lt => LowerCmp::Gte,
            UpperCmp::Lte => LowerCmp::Gt,
        }
    }
}

/// Operator for combining terms in a match query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    /// All terms must match (AND)
    And,
    /// At least one term must match (OR)
    #[default]
    Or,
}

impl MatchOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperator::And => "and",
            MatchOperator::Or => "or",
        }
    }
}

/// Allowed edit distance for fuzzy matching
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fuzziness {
    /// Fixed edit distance
    Distance(u8),
    /// Distance derived from term length: 0 below `low` chars, 1 below
    /// `high`, 2 otherwise
    Auto { low: u8, high: u8 },
}

impl Default for Fuzziness {
    fn default() -> Self {
        Fuzziness::Auto { low: 3, high: 6 }
    }
}

impl Fuzziness {
    /// Resolve the edit distance for a term of the given length
    pub fn distance_for(&self, term_len: usize) -> u8 {
        match *self {
            Fuzziness::Distance(d) => d,
            Fuzziness::Auto { low, high } => {
                if term_len < low as usize {
                    0
                } else if term_len < high as usize {
                    1
                } else {
                    2
                }
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Fuzziness::Distance(d) => serde_json::Value::from(*d),
            Fuzziness::Auto { low, high } => {
                serde_json::Value::String(format!("AUTO:{},{}", low, high))
            }
        }
    }
}

/// Presence bitmask of the logical operators a bool node was built from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Operators(u8);

impl Operators {
    pub const NONE: Operators = Operators(0);
    pub const AND: Operators = Operators(0b001);
    pub const OR: Operators = Operators(0b010);
    pub const NOT: Operators = Operators(0b100);

    pub fn contains(&self, other: Operators) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: Operators) -> Operators {
        Operators(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of distinct operators present
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitOr for Operators {
    type Output = Operators;

    fn bitor(self, rhs: Operators) -> Operators {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Operators {
    fn bitor_assign(&mut self, rhs: Operators) {
        *self = self.union(rhs);
    }
}

/// Key grouping mergeable children inside a bool bucket
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MergeKey {
    /// Leaf children on the same field
    Field(String),
    /// Nested bool children; never merged with each other
    Operator,
}

impl MergeKey {
    pub fn field(name: impl Into<String>) -> Self {
        MergeKey::Field(name.into())
    }
}

impl fmt::Display for MergeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeKey::Field(name) => write!(f, "{}", name),
            MergeKey::Operator => write!(f, "@bool"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_complements() {
        assert_eq!(LowerCmp::Gt.complement(), UpperCmp::Lte);
        assert_eq!(LowerCmp::Gte.complement(), UpperCmp::Lt);
        assert_eq!(UpperCmp::Lt.complement(), LowerCmp::Gte);
        assert_eq!(UpperCmp::Lte.complement(), LowerCmp::Gt);
    }

    #[test]
    fn test_fuzziness() {
        let auto = Fuzziness::default();
        assert_eq!(auto.distance_for(2), 0);
        assert_eq!(auto.distance_for(4), 1);
        assert_eq!(auto.distance_for(9), 2);
        assert_eq!(auto.to_json(), serde_json::json!("AUTO:3,6"));
        assert_eq!(Fuzziness::Distance(1).to_json(), serde_json::json!(1));
    }

    #[test]
    fn test_operators() {
        let mut ops = Operators::AND;
        assert!(ops.contains(Operators::AND));
        assert!(!ops.contains(Operators::OR));
        ops |= Operators::NOT;
        assert_eq!(ops.count(), 2);
        assert!(Operators::NONE.is_empty());
    }

    #[test]
    fn test_merge_key_display() {
        assert_eq!(MergeKey::field("price").to_string(), "price");
        assert_eq!(MergeKey::Operator.to_string(), "@bool");
    }
}
