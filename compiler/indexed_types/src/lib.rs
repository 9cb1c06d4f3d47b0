//! Canonical parametric type specialization.
//!
//! A template is declared once; applying a parameter to it yields a
//! specialization. Equal parameters always yield the *same* handle, and a
//! template that was never specialized is its own `Param::Absent`
//! specialization.
//!
//! # Overview
//!
//! ```text
//! let family = TypeFamily::new();
//! let vec = family.declare(Declaration::new(ScopePath::root(), "Vec"))?;
//! assert_eq!(vec, family.apply(vec, Param::Absent)?);
//! assert_eq!(family.apply(vec, 1)?, family.apply(vec, 1)?);
//!
//! // class Vec3(Vec[3])
//! let vec3 = family.declare(
//!     Declaration::new(ScopePath::root(), "Vec3").extends(family.apply(vec, 3)?),
//! )?;
//! assert_eq!(family.get_param(vec3)?, Param::Int(3));
//! assert!(family.is_subclass(vec3, &vec)?);
//! ```
//!
//! # Logging
//!
//! Declarations and cache misses are reported through `tracing`. Call
//! [`init_tracing`] and set `RUST_LOG=indexed_types=debug` (or `=trace`
//! for cache hits) to see them.

mod cache;
mod config;
mod declaration;
mod error;
mod family;
mod format;
mod param;
mod query;
mod spec;
mod template;

pub use indexed_ir::{DeclPath, Name, ScopePath};

pub use config::{FamilyConfig, RedeclarePolicy};
pub use declaration::Declaration;
pub use error::FamilyError;
pub use family::TypeFamily;
pub use format::SpecDisplay;
pub use param::Param;
pub use query::{Instance, Targets, Typed};
pub use spec::{FamilyTag, Spec};
pub use template::{Member, RegisterError, Supertypes, TemplateDef, TemplateId, TemplateRegistry};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, and
/// leaves an already-installed global subscriber in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
            if installed.is_err() {
                tracing::debug!("global tracing subscriber already installed");
            }
        }
    });
}

// Size assertions to prevent accidental regressions.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Param, Spec};
    indexed_ir::static_assert_size!(Spec, 8);
    indexed_ir::static_assert_size!(Param, 24);
}
