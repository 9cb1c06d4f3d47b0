//! Qualified declaration sites.
//!
//! A template's identity is the place it was declared, not its short name:
//! two `Vec` templates declared inside different functions must never share
//! a cache entry. `ScopePath` names the enclosing scope and `DeclPath`
//! pairs it with the declared name.

use smallvec::SmallVec;

use crate::{InternError, Name, StringInterner, StringLookup};

/// Separator used when rendering qualified paths.
const SEPARATOR: &str = "::";

/// The chain of enclosing scopes of a declaration, outermost first.
///
/// The empty path is the root (module-level) scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScopePath {
    segments: SmallVec<[Name; 4]>,
}

impl ScopePath {
    /// The root scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a scope path by interning each segment.
    pub fn from_segments<S: AsRef<str>>(
        interner: &StringInterner,
        segments: impl IntoIterator<Item = S>,
    ) -> Result<Self, InternError> {
        let segments = segments
            .into_iter()
            .map(|segment| interner.try_intern(segment.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { segments })
    }

    /// A nested scope one level below `self`.
    #[must_use]
    pub fn child(&self, segment: Name) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// The scope segments, outermost first.
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the path as `a::b::c`.
    pub fn display_with(&self, names: &impl StringLookup) -> String {
        let mut buf = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                buf.push_str(SEPARATOR);
            }
            buf.push_str(names.lookup(*segment));
        }
        buf
    }
}

/// A fully qualified declaration site: enclosing scope plus declared name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclPath {
    pub scope: ScopePath,
    pub name: Name,
}

impl DeclPath {
    pub fn new(scope: ScopePath, name: Name) -> Self {
        Self { scope, name }
    }

    /// Render the path as `scope::Name`, or just `Name` at the root.
    pub fn display_with(&self, names: &impl StringLookup) -> String {
        let mut buf = self.scope.display_with(names);
        if !buf.is_empty() {
            buf.push_str(SEPARATOR);
        }
        buf.push_str(names.lookup(self.name));
        buf
    }
}
