//! The seam between this crate and an embedded scripting runtime.
//!
//! `vc_script` never talks to a concrete engine directly; everything it needs
//! is expressed by the three traits here. An integration implements them once
//! for its runtime's value, object and engine handles, and registration and
//! path resolution work unchanged on top.
//!
//! The [`memory`](crate::memory) module carries a complete reference
//! implementation.

// -----------------------------------------------------------------------------
// Primitive

/// The closed set of host primitives every bridge must convert natively.
///
/// Conversion happens in [`Engine::primitive`]; no coercion is performed on
/// this side of the seam beyond what the bridge does natively (a runtime with
/// a single number type is free to fold `Int`/`UInt`/`Float` together).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

// -----------------------------------------------------------------------------
// Bridge traits

/// A value handle inside the scripting runtime.
///
/// `Clone` must be cheap; handles are copied freely during registration.
pub trait ScriptValue: Clone {
    /// Returns `true` if this is the runtime's undefined sentinel.
    ///
    /// The sentinel marks *absence of a value* and is distinct from an
    /// engine-level error (a failed fetch).
    fn is_undefined(&self) -> bool;
}

/// An object handle inside the scripting runtime.
///
/// Cloning an object handle yields another handle to the *same*
/// scripting-side object, the shared-node contract that alias registration
/// relies on.
pub trait ScriptObject: Clone {
    type Value: ScriptValue;
    type Error: core::error::Error;

    /// Installs `value` as the property `name`.
    ///
    /// Property installation is assumed not to fail in normal operation;
    /// bridges that can fail here should surface the fault on a later fetch.
    fn set(&mut self, name: &str, value: Self::Value);

    /// Fetches the property `name`.
    ///
    /// A missing property is *not* an error: the bridge returns its
    /// undefined sentinel. `Err` is reserved for engine-internal faults.
    fn get(&self, name: &str) -> Result<Self::Value, Self::Error>;

    /// Returns this object viewed as a value.
    fn as_value(&self) -> Self::Value;

    /// Attempts to view `value` as an object.
    ///
    /// Returns `None` for values without properties (primitives, undefined).
    fn from_value(value: &Self::Value) -> Option<Self>;
}

/// A handle to the embedded scripting runtime itself.
///
/// The runtime is assumed single-threaded and non-reentrant; callers binding
/// from multiple threads must serialize access themselves, this crate takes
/// no locks.
pub trait Engine {
    type Value: ScriptValue;
    type Error: core::error::Error;
    type Object: ScriptObject<Value = Self::Value, Error = Self::Error>;

    /// Returns the root namespace as a destination object.
    fn global(&self) -> Self::Object;

    /// Evaluates the runtime's `name = {}` equivalent and returns a handle
    /// to the fresh object.
    ///
    /// As with an evaluated expression, the name also becomes visible in the
    /// global scope; [`register_with`](crate::register_with) re-points it on
    /// the actual destination afterwards.
    fn create_object(&mut self, name: &str) -> Result<Self::Object, Self::Error>;

    /// Converts a host primitive into a runtime value.
    fn primitive(&mut self, value: Primitive<'_>) -> Result<Self::Value, Self::Error>;
}
