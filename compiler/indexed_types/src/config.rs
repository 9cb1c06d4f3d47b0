//! Family configuration.

/// What `TypeFamily::declare` does when a declaration site is declared again.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RedeclarePolicy {
    /// Fail with `FamilyError::DuplicateIdentity`.
    #[default]
    Reject,
    /// Return the original type when the new declaration has the same
    /// supertypes and members; fail otherwise.
    ReuseIdentical,
    /// Always return the original type. The new declaration's supertypes
    /// and members are discarded, as when a declaration site is re-run
    /// with an edited body.
    ReuseExisting,
}

impl RedeclarePolicy {
    /// Whether a redeclaration may reuse the registered template.
    pub(crate) fn allows_reuse(self, identical: bool) -> bool {
        match self {
            RedeclarePolicy::Reject => false,
            RedeclarePolicy::ReuseIdentical => identical,
            RedeclarePolicy::ReuseExisting => true,
        }
    }
}

/// Options for constructing a `TypeFamily`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FamilyConfig {
    pub redeclare: RedeclarePolicy,
}

impl FamilyConfig {
    #[must_use]
    pub fn with_redeclare(mut self, policy: RedeclarePolicy) -> Self {
        self.redeclare = policy;
        self
    }
}
