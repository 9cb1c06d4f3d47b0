//! Type formatting for diagnostics.
//!
//! The canonical form is `Name[param]`, with empty brackets for an absent
//! parameter. It is meant for humans and is never parsed back.

#![allow(clippy::format_push_string)] // Debug formatting prioritizes clarity over allocation

use std::fmt;

use indexed_ir::StringLookup;

use crate::{FamilyError, Param, Spec, TypeFamily};

impl TypeFamily {
    /// Format a type as `Name[param]`.
    pub fn format_spec(&self, spec: Spec) -> Result<String, FamilyError> {
        let mut buf = String::new();
        self.format_spec_into(spec, &mut buf)?;
        Ok(buf)
    }

    /// Format a type into an existing string buffer.
    pub fn format_spec_into(&self, spec: Spec, buf: &mut String) -> Result<(), FamilyError> {
        let key = self.key_of(spec)?;
        let def = self.definition_of(key.root)?;
        buf.push_str(self.names().lookup(def.path.name));
        buf.push('[');
        self.format_param_into(&key.param, buf)?;
        buf.push(']');
        Ok(())
    }

    /// Format a type with its declaration scope, as `scope::Name[param]`.
    pub fn qualified_name(&self, spec: Spec) -> Result<String, FamilyError> {
        let key = self.key_of(spec)?;
        let def = self.definition_of(key.root)?;
        let mut buf = def.path.display_with(self.names());
        buf.push('[');
        self.format_param_into(&key.param, &mut buf)?;
        buf.push(']');
        Ok(buf)
    }

    /// Format a parameter the way it appears inside brackets.
    pub fn format_param_into(&self, param: &Param, buf: &mut String) -> Result<(), FamilyError> {
        match param {
            Param::Absent => {}
            Param::Bool(value) => buf.push_str(if *value { "true" } else { "false" }),
            Param::Int(value) => buf.push_str(&value.to_string()),
            Param::Float(bits) => buf.push_str(&format!("{:?}", f64::from_bits(*bits))),
            Param::Str { family, name } => {
                if *family != self.tag() {
                    return Err(FamilyError::ForeignString { name: *name });
                }
                buf.push_str(&format!("{:?}", self.names().lookup(*name)));
            }
            Param::Tuple(items) => {
                buf.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    self.format_param_into(item, buf)?;
                }
                if items.len() == 1 {
                    buf.push(',');
                }
                buf.push(')');
            }
            Param::Type(spec) => self.format_spec_into(*spec, buf)?,
        }
        Ok(())
    }

    /// A `Display` adapter for `spec`.
    ///
    /// Handles from another family render as `<foreign>`.
    pub fn display(&self, spec: Spec) -> SpecDisplay<'_> {
        SpecDisplay { family: self, spec }
    }
}

/// Renders a specialization through its family. See `TypeFamily::display`.
pub struct SpecDisplay<'a> {
    family: &'a TypeFamily,
    spec: Spec,
}

impl fmt::Display for SpecDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family.format_spec(self.spec) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<foreign>"),
        }
    }
}
