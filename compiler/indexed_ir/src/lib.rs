//! Indexed IR - names and declaration sites.
//!
//! This crate holds the identity plumbing shared by the type family:
//! - `Name`: a compact interned identifier
//! - `StringInterner`: sharded, thread-safe string interning
//! - `ScopePath` / `DeclPath`: the qualified declaration site of a template
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings become `Name(u32)`, so equality and hashing are O(1)
//! - **Qualify Everything**: a template is keyed by its full `DeclPath`, never its short name

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied handles.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod decl_path;
mod interner;
mod name;

pub use decl_path::{DeclPath, ScopePath};
pub use interner::{InternError, StringInterner, StringLookup};
pub use name::Name;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Name;
    static_assert_size!(Name, 4);
}
