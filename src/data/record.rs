use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One of the five columns of a sweep table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    A2,
    A3,
    P2,
    P3,
    Max,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::A2, Field::A3, Field::P2, Field::P3, Field::Max];

    /// Header name as written by the sweep generator.
    pub fn column_name(&self) -> &'static str {
        match self {
            Field::A2 => "A2",
            Field::A3 => "A3",
            Field::P2 => "p2",
            Field::P3 => "p3",
            Field::Max => "max",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.column_name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::A2 => "A2 (2nd harmonic amplitude)",
            Field::A3 => "A3 (3rd harmonic amplitude)",
            Field::P2 => "p2 (2nd harmonic phase)",
            Field::P3 => "p3 (3rd harmonic phase)",
            Field::Max => "max",
        }
    }
}

/// One parsed row of sweep data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub a2: f64,
    pub a3: f64,
    pub p2: f64,
    pub p3: f64,
    pub max: f64,
}

impl Record {
    pub fn new(a2: f64, a3: f64, p2: f64, p3: f64, max: f64) -> Self {
        Self { a2, a3, p2, p3, max }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::A2 => self.a2,
            Field::A3 => self.a3,
            Field::P2 => self.p2,
            Field::P3 => self.p3,
            Field::Max => self.max,
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.a2, self.a3)
    }
}

/// Exact-value key over the (A2, A3) pair.
///
/// Equality and hashing use the bit pattern of the parsed values, so two keys
/// match only if the source text parsed to the same doubles. Negative zero is
/// folded into zero to keep `==` and `Hash` consistent.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey {
    pub a2: f64,
    pub a3: f64,
}

impl GroupKey {
    pub fn new(a2: f64, a3: f64) -> Self {
        Self {
            a2: canonical(a2),
            a3: canonical(a3),
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        value_bits(self.a2) == value_bits(other.a2) && value_bits(self.a3) == value_bits(other.a3)
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        value_bits(self.a2).hash(state);
        value_bits(self.a3).hash(state);
    }
}

fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Bit pattern used for exact value identity (`-0.0` and `0.0` agree).
pub fn value_bits(v: f64) -> u64 {
    canonical(v).to_bits()
}
