//! Template declarations.
//!
//! A `Declaration` is what a declaration site hands to
//! `TypeFamily::declare`: where it is, what it extends, what it defines.

use indexed_ir::ScopePath;
use crate::{Param, Spec, Supertypes};

/// A template or subclass declaration, built up before being declared.
///
/// ```text
/// // class Vec3(Vec[3]): dim = 3
/// let vec3 = family.declare(
///     Declaration::new(scope, "Vec3")
///         .extends(family.apply(vec, 3)?)
///         .member("dim", 3),
/// )?;
/// ```
#[derive(Clone, Debug)]
pub struct Declaration<'a> {
    pub(crate) scope: ScopePath,
    pub(crate) name: &'a str,
    pub(crate) supertypes: Supertypes,
    pub(crate) members: Vec<(&'a str, Param)>,
}

impl<'a> Declaration<'a> {
    /// Declare `name` inside `scope`.
    pub fn new(scope: ScopePath, name: &'a str) -> Self {
        Self {
            scope,
            name,
            supertypes: Supertypes::new(),
            members: Vec::new(),
        }
    }

    /// Add a supertype. Order matters: earlier supertypes win parameter
    /// inheritance.
    #[must_use]
    pub fn extends(mut self, supertype: Spec) -> Self {
        self.supertypes.push(supertype);
        self
    }

    /// Add a member.
    #[must_use]
    pub fn member(mut self, name: &'a str, value: impl Into<Param>) -> Self {
        self.members.push((name, value.into()));
        self
    }
}
