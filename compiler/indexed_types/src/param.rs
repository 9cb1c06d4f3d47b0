//! Specialization parameters.
//!
//! A closed set of hashable shapes. Floats are stored as their bit pattern
//! so `Param` can derive `Eq` and `Hash`; NaN is rejected before keying.

use indexed_ir::Name;

use crate::{FamilyError, FamilyTag, Spec};

const NEGATIVE_ZERO: u64 = 0x8000_0000_0000_0000;

/// The parameter a template is specialized with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Param {
    /// No specialization applied.
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    /// Bit pattern of an `f64`.
    Float(u64),
    /// String interned by the family tagged `family`.
    Str { family: FamilyTag, name: Name },
    Tuple(Box<[Param]>),
    /// Another specialization used as the parameter, e.g. `A[A]`.
    Type(Spec),
}

impl Param {
    pub fn float(value: f64) -> Self {
        Param::Float(value.to_bits())
    }

    pub fn tuple(items: impl IntoIterator<Item = Param>) -> Self {
        Param::Tuple(items.into_iter().collect())
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Param::Absent)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Param::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Param::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn as_spec(&self) -> Option<Spec> {
        match self {
            Param::Type(spec) => Some(*spec),
            _ => None,
        }
    }

    /// Rewrite the parameter into the form used as a cache key.
    ///
    /// `-0.0` becomes `0.0` (they compare equal as values), NaN is rejected,
    /// and every nested type or string reference is checked against `owner`.
    pub(crate) fn canonicalize(self, owner: &impl Membership) -> Result<Self, FamilyError> {
        match self {
            Param::Float(bits) => {
                let value = f64::from_bits(bits);
                if value.is_nan() {
                    return Err(FamilyError::UnhashableParameter {
                        reason: "NaN is not equal to itself",
                    });
                }
                if bits == NEGATIVE_ZERO {
                    return Ok(Param::float(0.0));
                }
                Ok(Param::Float(bits))
            }
            Param::Tuple(items) => {
                let items = items
                    .into_vec()
                    .into_iter()
                    .map(|item| item.canonicalize(owner))
                    .collect::<Result<_, _>>()?;
                Ok(Param::Tuple(items))
            }
            Param::Type(spec) => {
                owner.check_spec(spec)?;
                Ok(Param::Type(spec))
            }
            Param::Str { family, name } => {
                owner.check_str(family, name)?;
                Ok(Param::Str { family, name })
            }
            other @ (Param::Absent | Param::Bool(_) | Param::Int(_)) => Ok(other),
        }
    }
}

/// Decides whether references held by a parameter belong to one family.
pub(crate) trait Membership {
    fn check_spec(&self, spec: Spec) -> Result<(), FamilyError>;
    fn check_str(&self, family: FamilyTag, name: Name) -> Result<(), FamilyError>;
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Int(i64::from(value))
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::float(value)
    }
}

impl From<Spec> for Param {
    fn from(spec: Spec) -> Self {
        Param::Type(spec)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Param::Absent, Into::into)
    }
}
