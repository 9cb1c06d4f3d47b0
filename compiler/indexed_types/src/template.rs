//! Template registry.
//!
//! Records every declared template once, keyed by its declaration site.
//! Unlike the specialization cache (which stores `(template, param)` pairs),
//! the registry stores what a declaration said: supertypes and members.
//!
//! # Design
//!
//! - Dual indexing: `FxHashMap<DeclPath, TemplateId>` for identity lookup,
//!   `Vec<TemplateDef>` for O(1) lookup by id
//! - Append-only: definitions are never mutated or removed

use std::fmt;

use indexed_ir::{DeclPath, Name};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{FamilyError, Param, Spec};

/// Identity of a declared template.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct TemplateId(u32);

impl TemplateId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named member declared on a template.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: Name,
    pub value: Param,
}

/// Supertypes of a template, in declared order.
pub type Supertypes = SmallVec<[Spec; 2]>;

/// A registered template declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateDef {
    pub id: TemplateId,

    /// Where the template was declared.
    pub path: DeclPath,

    /// Specializations this template extends, left-most first.
    pub supertypes: Supertypes,

    /// Members declared on the template itself (never the parameter slot).
    pub members: Vec<Member>,
}

impl TemplateDef {
    /// Look up a member declared directly on this template.
    pub fn member(&self, name: Name) -> Option<&Param> {
        self.members
            .iter()
            .find(|member| member.name == name)
            .map(|member| &member.value)
    }
}

/// Registry of declared templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    by_path: FxHashMap<DeclPath, TemplateId>,
    defs: Vec<TemplateDef>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template declared at `path`.
    ///
    /// Fails with `RegisterError::Duplicate` if `path` is already registered;
    /// the existing definition is left as it was.
    pub fn register(
        &mut self,
        path: DeclPath,
        supertypes: Supertypes,
        members: Vec<Member>,
    ) -> Result<TemplateId, RegisterError> {
        if let Some(&existing) = self.by_path.get(&path) {
            return Err(RegisterError::Duplicate { existing });
        }

        let id = self.next_id()?;

        self.by_path.insert(path.clone(), id);
        self.defs.push(TemplateDef {
            id,
            path,
            supertypes,
            members,
        });
        Ok(id)
    }

    /// The id the next successful `register` will assign.
    pub fn next_id(&self) -> Result<TemplateId, RegisterError> {
        u32::try_from(self.defs.len())
            .map(TemplateId)
            .map_err(|_| RegisterError::Full)
    }

    /// Look up a template definition.
    pub fn definition_of(&self, id: TemplateId) -> Result<&TemplateDef, FamilyError> {
        self.defs
            .get(id.index())
            .ok_or(FamilyError::UnknownTemplate { id })
    }

    /// Find the template declared at `path`.
    pub fn lookup(&self, path: &DeclPath) -> Option<TemplateId> {
        self.by_path.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Why `TemplateRegistry::register` refused a declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// The declaration site is taken by `existing`.
    Duplicate { existing: TemplateId },
    /// Template ids are exhausted.
    Full,
}
