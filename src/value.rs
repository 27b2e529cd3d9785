use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A value stored in a blackboard memory or declared as a node property.
///
/// Numbers keep their signedness; see [`Value::to_i64`] and [`Value::to_u64`]
/// for conversions between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Lenient signed conversion; accepts an unsigned value that fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Lenient unsigned conversion; accepts a non-negative signed value.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Self::Bool(b) => b.fmt(fmt),
            Self::Int(i) => i.fmt(fmt),
            Self::UInt(u) => u.fmt(fmt),
            Self::Float(f) => f.fmt(fmt),
            Self::Str(s) => s.fmt(fmt),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v.into())
            }
        })*
    };
}

impl_from!(Bool, bool);
impl_from!(Int, i32, i64);
impl_from!(UInt, u32, u64);
impl_from!(Float, f32, f64);
impl_from!(Str, &str, String);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}
