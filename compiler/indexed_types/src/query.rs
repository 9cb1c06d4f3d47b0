//! Relational queries over a family.
//!
//! Every query treats a template and all of its specializations as one
//! family member: subclass checks compare templates, never parameters.
//! Handles this family did not produce are reported as
//! `FamilyError::NotASpecialization`, never answered with `false`.

use std::ops::ControlFlow;

use smallvec::SmallVec;

use crate::family::PARAM_ATTR;
use crate::{FamilyError, Param, Spec, TemplateId, TypeFamily};

/// A value whose runtime type is a specialization.
pub trait Typed {
    fn spec(&self) -> Spec;
}

/// A value of a specialized type, produced by `TypeFamily::instantiate`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instance {
    spec: Spec,
}

impl Typed for Instance {
    fn spec(&self) -> Spec {
        self.spec
    }
}

/// One or more types to test membership against.
pub trait Targets {
    fn as_specs(&self) -> &[Spec];
}

impl Targets for Spec {
    fn as_specs(&self) -> &[Spec] {
        std::slice::from_ref(self)
    }
}

impl Targets for [Spec] {
    fn as_specs(&self) -> &[Spec] {
        self
    }
}

impl<const N: usize> Targets for [Spec; N] {
    fn as_specs(&self) -> &[Spec] {
        self
    }
}

impl Targets for Vec<Spec> {
    fn as_specs(&self) -> &[Spec] {
        self
    }
}

impl TypeFamily {
    /// The parameter `spec` was specialized with.
    pub fn get_param(&self, spec: Spec) -> Result<Param, FamilyError> {
        Ok(self.key_of(spec)?.param)
    }

    /// The unparameterized type of `spec`'s template.
    ///
    /// Every specialization of one template yields the same handle.
    pub fn root_type(&self, spec: Spec) -> Result<Spec, FamilyError> {
        let root = self.template_of(spec)?;
        self.specialize(root, Param::Absent)
    }

    /// `spec` followed by its ancestors in walk order.
    pub fn ancestors(&self, spec: Spec) -> Result<Vec<Spec>, FamilyError> {
        let mut out = Vec::new();
        self.walk(&[spec], |ancestor, _, _| {
            out.push(ancestor);
            ControlFlow::<()>::Continue(())
        })?;
        Ok(out)
    }

    /// Whether `candidate` descends from (or is) any of `targets`.
    ///
    /// Parameters are ignored on both sides: `B[123]` is a subclass of
    /// `A[999]` whenever `B`'s template extends `A`'s.
    pub fn is_subclass<T: Targets + ?Sized>(
        &self,
        candidate: Spec,
        targets: &T,
    ) -> Result<bool, FamilyError> {
        let roots = targets
            .as_specs()
            .iter()
            .map(|&target| self.template_of(target))
            .collect::<Result<SmallVec<[TemplateId; 4]>, _>>()?;

        let found = self.walk(&[candidate], |_, key, _| {
            if roots.contains(&key.root) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found.is_some())
    }

    /// `is_subclass` applied to the runtime type of `value`.
    pub fn is_instance<T: Targets + ?Sized>(
        &self,
        value: &impl Typed,
        targets: &T,
    ) -> Result<bool, FamilyError> {
        self.is_subclass(value.spec(), targets)
    }

    /// Create a value whose runtime type is `spec`.
    pub fn instantiate(&self, spec: Spec) -> Result<Instance, FamilyError> {
        self.key_of(spec)?;
        Ok(Instance { spec })
    }

    /// Look up an attribute of a specialized type.
    ///
    /// `param` is the specialization parameter. Any other name is searched
    /// in the template's own members, then its ancestors in walk order.
    pub fn attr(&self, spec: Spec, name: &str) -> Result<Option<Param>, FamilyError> {
        if name == PARAM_ATTR {
            return self.get_param(spec).map(Some);
        }

        // A name never interned cannot be a member of anything.
        let Some(name) = self.names().get(name) else {
            self.key_of(spec)?;
            return Ok(None);
        };

        self.walk(&[spec], |_, _, def| match def.member(name) {
            Some(value) => ControlFlow::Break(value.clone()),
            None => ControlFlow::Continue(()),
        })
    }
}
