//! Metadata tables of the `#~` stream (ECMA-335 II.22).
//!
//! Only the tables needed to find assembly-level custom attributes and name their types are
//! decoded into rows. Every other table is still sized through its column layout so that the
//! tables after it can be located.
//!
//! # Decoded tables
//!
//! | Table | Row type | Used for |
//! |-------|----------|----------|
//! | `Module` (0x00) | [`ModuleRaw`] | module name, MVID |
//! | `TypeRef` (0x01) | [`TypeRefRaw`] | names of attribute and enum types from other assemblies |
//! | `TypeDef` (0x02) | [`TypeDefRaw`] | names of types defined in this module, method/field ownership |
//! | `FieldPtr` (0x03) | [`FieldPtrRaw`] | field list indirection |
//! | `Field` (0x04) | [`FieldRaw`] | `value__` of local enums |
//! | `MethodPtr` (0x05) | [`MethodPtrRaw`] | method list indirection |
//! | `MethodDef` (0x06) | [`MethodDefRaw`] | constructors of attributes defined in this module |
//! | `MemberRef` (0x0A) | [`MemberRefRaw`] | constructors of attributes defined elsewhere |
//! | `CustomAttribute` (0x0C) | [`CustomAttributeRaw`] | the attributes themselves |
//! | `Assembly` (0x20) | [`AssemblyRaw`] | the attribute parent |
//! | `NestedClass` (0x29) | [`NestedClassRaw`] | enclosing types of nested TypeDefs |

mod assembly;
mod customattribute;
mod field;
mod fieldptr;
mod memberref;
mod methoddef;
mod methodptr;
mod module;
mod nestedclass;
mod typedef;
mod typeref;
mod types;

pub use assembly::AssemblyRaw;
pub use customattribute::CustomAttributeRaw;
pub use field::{FieldAttributes, FieldRaw};
pub use fieldptr::FieldPtrRaw;
pub use memberref::MemberRefRaw;
pub use methoddef::MethodDefRaw;
pub use methodptr::MethodPtrRaw;
pub use module::ModuleRaw;
pub use nestedclass::NestedClassRaw;
pub use typedef::{TypeAttributes, TypeDefRaw};
pub use typeref::TypeRefRaw;
pub use types::*;
