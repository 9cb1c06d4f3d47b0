//! The type family: template registry plus specialization factory.
//!
//! `TypeFamily` owns every piece of state the system has. It is constructed
//! once, shared by reference (it is `Sync`), and never torn down while
//! handles from it are in use.
//!
//! # Architecture
//!
//! ```text
//! TypeFamily
//!     ├── StringInterner     (template, scope and member names)
//!     ├── TemplateRegistry   (DeclPath -> TemplateDef, behind one RwLock)
//!     └── SpecCache          ((TemplateId, Param) -> Spec, sharded RwLocks)
//! ```

use std::ops::ControlFlow;

use indexed_ir::{DeclPath, Name, ScopePath, StringInterner};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::cache::{SpecCache, SpecKey};
use crate::param::Membership;
use crate::spec::FamilyTag;
use crate::template::{RegisterError, Supertypes};
use crate::{
    Declaration, FamilyConfig, FamilyError, Member, Param, Spec, TemplateDef, TemplateId,
    TemplateRegistry,
};

/// Attribute name under which a specialization exposes its parameter.
pub(crate) const PARAM_ATTR: &str = "param";

/// Owner of one registry of templates and their canonical specializations.
pub struct TypeFamily {
    tag: FamilyTag,
    config: FamilyConfig,
    names: StringInterner,
    templates: RwLock<TemplateRegistry>,
    cache: SpecCache,
}

impl TypeFamily {
    pub fn new() -> Self {
        Self::with_config(FamilyConfig::default())
    }

    pub fn with_config(config: FamilyConfig) -> Self {
        Self {
            tag: FamilyTag::fresh(),
            config,
            names: StringInterner::new(),
            templates: RwLock::new(TemplateRegistry::new()),
            cache: SpecCache::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> FamilyTag {
        self.tag
    }

    #[inline]
    pub fn config(&self) -> FamilyConfig {
        self.config
    }

    /// The interner holding this family's names.
    #[inline]
    pub fn names(&self) -> &StringInterner {
        &self.names
    }

    /// Build a declaration scope from its segments, outermost first.
    pub fn scope<S: AsRef<str>>(
        &self,
        segments: impl IntoIterator<Item = S>,
    ) -> Result<ScopePath, FamilyError> {
        Ok(ScopePath::from_segments(&self.names, segments)?)
    }

    /// A string parameter interned in this family.
    pub fn str_param(&self, value: &str) -> Result<Param, FamilyError> {
        Ok(Param::Str {
            family: self.tag,
            name: self.names.try_intern(value)?,
        })
    }

    /// Declare a template and return the type the declaration denotes.
    ///
    /// The result is always a specialization: the template specialized with
    /// the parameter of its nearest ancestor (the left-most supertype), or
    /// with `Param::Absent` when it has no supertypes.
    #[tracing::instrument(level = "debug", skip_all, fields(name = decl.name))]
    pub fn declare(&self, decl: Declaration<'_>) -> Result<Spec, FamilyError> {
        let name = self.names.try_intern(decl.name)?;
        let path = DeclPath::new(decl.scope, name);
        let path_text = path.display_with(&self.names);

        let members = decl
            .members
            .into_iter()
            .map(|(member, value)| {
                if member == PARAM_ATTR {
                    return Err(FamilyError::ReservedMember {
                        path: path_text.clone(),
                        name: member.to_owned(),
                    });
                }
                Ok(Member {
                    name: self.names.try_intern(member)?,
                    value: self.canonical_param(value)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let supertypes: Supertypes = decl.supertypes;
        for &supertype in &supertypes {
            self.key_of(supertype)?;
        }
        let inherited = self.inherited_param(&supertypes)?;

        let mut templates = self.templates.write();
        if let Some(existing) = templates.lookup(&path) {
            let def = templates.definition_of(existing)?;
            let identical = def.supertypes == supertypes && def.members == members;
            if !self.config.redeclare.allows_reuse(identical) {
                return Err(FamilyError::DuplicateIdentity { path: path_text });
            }
            let original = def.supertypes.clone();
            drop(templates);
            tracing::debug!(
                path = %path_text,
                template = %existing,
                "reusing redeclared template"
            );
            let inherited = self.inherited_param(&original)?;
            return self.specialize(existing, inherited);
        }

        // The declared type's slot is reserved before the template is
        // registered, so a full cache leaves the registry unchanged.
        let id = templates
            .next_id()
            .map_err(|_| FamilyError::RegistryOverflow)?;
        let slot = self.cache.get_or_insert(SpecKey {
            root: id,
            param: inherited,
        })?;
        templates
            .register(path, supertypes, members)
            .map_err(|err| match err {
                RegisterError::Duplicate { .. } => FamilyError::DuplicateIdentity {
                    path: path_text.clone(),
                },
                RegisterError::Full => FamilyError::RegistryOverflow,
            })?;
        drop(templates);

        tracing::debug!(path = %path_text, template = %id, "registered template");
        Ok(Spec::from_shard_local(self.tag, slot.shard, slot.local))
    }

    /// The canonical specialization of `root` with `param`.
    ///
    /// Equal parameters (by value) always yield the same handle. Nothing is
    /// cached when the call fails.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn specialize(&self, root: TemplateId, param: Param) -> Result<Spec, FamilyError> {
        let param = self.canonical_param(param)?;
        self.templates.read().definition_of(root)?;

        let slot = self.cache.get_or_insert(SpecKey { root, param })?;
        if slot.inserted {
            tracing::debug!(
                template = %root,
                shard = slot.shard,
                local = slot.local,
                "constructed specialization"
            );
        } else {
            tracing::trace!(template = %root, "specialization cache hit");
        }
        Ok(Spec::from_shard_local(self.tag, slot.shard, slot.local))
    }

    /// Re-specialize the template behind `spec` with `param`.
    ///
    /// The caller's parameter always wins; inheritance is not consulted.
    pub fn apply(&self, spec: Spec, param: impl Into<Param>) -> Result<Spec, FamilyError> {
        let key = self.key_of(spec)?;
        self.specialize(key.root, param.into())
    }

    /// The template a specialization was produced from.
    pub fn template_of(&self, spec: Spec) -> Result<TemplateId, FamilyError> {
        Ok(self.key_of(spec)?.root)
    }

    pub fn definition_of(&self, id: TemplateId) -> Result<TemplateDef, FamilyError> {
        self.templates.read().definition_of(id).cloned()
    }

    pub fn template_count(&self) -> usize {
        self.templates.read().len()
    }

    pub fn specialization_count(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a handle to its cache key, rejecting foreign handles.
    pub(crate) fn key_of(&self, spec: Spec) -> Result<SpecKey, FamilyError> {
        if spec.family() != self.tag {
            return Err(FamilyError::NotASpecialization { spec });
        }
        self.cache
            .key_at(spec.shard(), spec.local())
            .ok_or(FamilyError::NotASpecialization { spec })
    }

    fn canonical_param(&self, param: Param) -> Result<Param, FamilyError> {
        param.canonicalize(self)
    }

    /// The parameter a new template inherits: its nearest ancestor's, even
    /// when that is `Param::Absent`. Supertypes are already specializations,
    /// so the nearest ancestor is the left-most one.
    fn inherited_param(&self, supertypes: &[Spec]) -> Result<Param, FamilyError> {
        match supertypes.first() {
            Some(&nearest) => Ok(self.key_of(nearest)?.param),
            None => Ok(Param::Absent),
        }
    }

    /// Depth-first walk over `start` and their ancestors.
    ///
    /// Order is left-most first, each type before its own supertypes; a type
    /// reachable along several paths is visited once. Stops at the first
    /// `Break` and returns its value.
    pub(crate) fn walk<T>(
        &self,
        start: &[Spec],
        mut visit: impl FnMut(Spec, &SpecKey, &TemplateDef) -> ControlFlow<T>,
    ) -> Result<Option<T>, FamilyError> {
        let mut stack: Vec<Spec> = start.iter().rev().copied().collect();
        let mut seen = FxHashSet::default();

        while let Some(spec) = stack.pop() {
            if !seen.insert(spec) {
                continue;
            }
            let key = self.key_of(spec)?;
            let def = self.definition_of(key.root)?;
            if let ControlFlow::Break(value) = visit(spec, &key, &def) {
                return Ok(Some(value));
            }
            stack.extend(def.supertypes.iter().rev().copied());
        }

        Ok(None)
    }
}

impl Membership for TypeFamily {
    fn check_spec(&self, spec: Spec) -> Result<(), FamilyError> {
        self.key_of(spec).map(|_| ())
    }

    fn check_str(&self, family: FamilyTag, name: Name) -> Result<(), FamilyError> {
        if family == self.tag && self.names.resolve(name).is_some() {
            Ok(())
        } else {
            Err(FamilyError::ForeignString { name })
        }
    }
}

impl Default for TypeFamily {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
