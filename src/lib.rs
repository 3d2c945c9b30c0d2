#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod bind;
pub mod bridge;
pub mod impls;
pub mod memory;
pub mod resolve;
pub mod tag;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use bind::{
    Bind, BindConfig, BindShape, Native, Record, RecordField, RecordFieldIter, RegisterError,
    register, register_to, register_with,
};
pub use bridge::{Engine, Primitive, ScriptObject, ScriptValue};
pub use resolve::{ResolveError, deep_get};
pub use tag::{DEFAULT_TAG_KEY, TagDirective};
