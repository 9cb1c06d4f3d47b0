//! Errors raised by the type family.
//!
//! Every variant signals a programming error at the call site. Nothing is
//! retried, and a failing call leaves the registry and cache untouched.

use indexed_ir::{InternError, Name};

use crate::{Spec, TemplateId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FamilyError {
    /// The parameter cannot serve as a cache key.
    #[error("unhashable parameter: {reason}")]
    UnhashableParameter { reason: &'static str },

    /// A template identity was used before it was registered.
    #[error("unknown template {id}")]
    UnknownTemplate { id: TemplateId },

    /// Two declarations resolved to the same declaration site.
    #[error("template `{path}` is already declared")]
    DuplicateIdentity { path: String },

    /// A handle that this family never produced.
    #[error("{spec:?} is not a specialization of this family")]
    NotASpecialization { spec: Spec },

    /// A string parameter interned by another family.
    #[error("string parameter {name:?} was not interned by this family")]
    ForeignString { name: Name },

    /// A declared member collides with the parameter slot.
    #[error("member `{name}` of `{path}` is reserved for the specialization parameter")]
    ReservedMember { path: String, name: String },

    #[error(transparent)]
    Intern(#[from] InternError),

    /// Template ids are exhausted.
    #[error("template registry exceeded capacity")]
    RegistryOverflow,

    /// A specialization cache shard ran out of local indices.
    #[error("specialization cache shard {shard} exceeded capacity")]
    CacheOverflow { shard: usize },
}
