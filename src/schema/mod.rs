//! Schema definition and compilation.
//!
//! A schema travels through two stages:
//!
//! 1. [`Schema`] / [`FieldSpec`] - the declarative input: plain data,
//!    buildable in code or parsed from JSON
//! 2. [`Layout`] / [`FieldDescriptor`] - the compiled output: an
//!    immutable offset/width table plus the defaulted template buffer
//!
//! Compilation happens once per distinct schema; the resulting layout is
//! shared by every instance stamped from it.

mod layout;
mod spec;

pub use layout::{FieldDescriptor, Layout};
pub use spec::{ByteOrder, FieldSpec, Schema};
