//! An in-memory reference bridge.
//!
//! [`MemoryEngine`] implements the [`bridge`](crate::bridge) traits over a
//! plain object store, close enough to an embedded dynamic runtime to
//! exercise every registration and resolution path without shipping one:
//! properties live in shared handles, missing properties read as the
//! undefined sentinel, and fresh objects are installed in the global scope
//! the way an evaluated `name = {}` expression would be.
//!
//! Everything here is deliberately `!Send`: the bridge contract is
//! single-threaded, and `Rc`/`RefCell` encode that in the type system.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::bridge::{Engine, Primitive, ScriptObject, ScriptValue};

type PropertyMap = hashbrown::HashMap<Box<str>, MemoryValue, foldhash::fast::FixedState>;

/// The host-side representation of a script function.
pub type NativeFn = Rc<dyn Fn(&[MemoryValue]) -> MemoryValue>;

// -----------------------------------------------------------------------------
// MemoryValue

/// A value in the in-memory runtime.
///
/// Equality is structural for primitives and *handle identity* for objects
/// and functions: two object values are equal only when they refer to the
/// same underlying object, which is exactly the observation needed to verify
/// alias sharing.
#[derive(Clone)]
pub enum MemoryValue {
    /// The undefined sentinel: the marker for "no value present", distinct
    /// from an engine-level error.
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Function(NativeFn),
    Object(MemoryObject),
}

impl MemoryValue {
    /// Creates a string value.
    #[inline]
    pub fn string(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }

    /// Creates a callable value from a host closure.
    #[inline]
    pub fn function(f: impl Fn(&[MemoryValue]) -> MemoryValue + 'static) -> Self {
        Self::Function(Rc::new(f))
    }

    /// Returns the integer payload, if this is an `Int`.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Str`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns an object handle, if this is an `Object`.
    #[inline]
    pub fn as_object(&self) -> Option<MemoryObject> {
        MemoryObject::from_value(self)
    }

    /// Invokes the value with `args`, if this is a `Function`.
    pub fn call(&self, args: &[MemoryValue]) -> Option<MemoryValue> {
        match self {
            Self::Function(f) => Some(f(args)),
            _ => None,
        }
    }
}

impl ScriptValue for MemoryValue {
    #[inline]
    fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl PartialEq for MemoryValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Bool(value) => write!(f, "Bool({value})"),
            Self::Int(value) => write!(f, "Int({value})"),
            Self::Float(value) => write!(f, "Float({value})"),
            Self::Str(value) => write!(f, "Str({value:?})"),
            Self::Function(_) => f.write_str("Function"),
            Self::Object(object) => fmt::Debug::fmt(object, f),
        }
    }
}

// -----------------------------------------------------------------------------
// MemoryObject

/// An object in the in-memory runtime.
///
/// A `MemoryObject` is a handle: cloning it yields another handle to the
/// same property store, matching the shared-node contract of
/// [`ScriptObject`].
#[derive(Clone, Default)]
pub struct MemoryObject {
    properties: Rc<RefCell<PropertyMap>>,
}

impl MemoryObject {
    /// Creates an empty, unattached object.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    /// Returns `true` if the property `name` is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.borrow().contains_key(name)
    }
}

impl PartialEq for MemoryObject {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.properties, &other.properties)
    }
}

impl fmt::Debug for MemoryObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.properties.borrow().iter()).finish()
    }
}

impl ScriptObject for MemoryObject {
    type Value = MemoryValue;
    type Error = MemoryError;

    fn set(&mut self, name: &str, value: MemoryValue) {
        self.properties.borrow_mut().insert(name.into(), value);
    }

    fn get(&self, name: &str) -> Result<MemoryValue, MemoryError> {
        // A missing property is the undefined sentinel, never an error.
        Ok(self
            .properties
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(MemoryValue::Undefined))
    }

    #[inline]
    fn as_value(&self) -> MemoryValue {
        MemoryValue::Object(self.clone())
    }

    fn from_value(value: &MemoryValue) -> Option<Self> {
        match value {
            MemoryValue::Object(object) => Some(object.clone()),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// MemoryError

/// An engine-level fault of the in-memory runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// [`Engine::create_object`] was handed a name that is not a valid
    /// identifier, the analog of the evaluated `name = {}` expression
    /// failing to parse.
    InvalidIdentifier(Box<str>),
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(name) => {
                write!(f, "`{name}` is not a valid object identifier")
            }
        }
    }
}

impl core::error::Error for MemoryError {}

// -----------------------------------------------------------------------------
// MemoryEngine

/// The in-memory runtime handle.
///
/// # Examples
///
/// ```
/// use vc_script::memory::{MemoryEngine, MemoryValue};
/// use vc_script::{Engine, deep_get, register};
///
/// let mut engine = MemoryEngine::new();
/// register(&mut engine, "greeting", &"hello").unwrap();
///
/// let fetched = deep_get("greeting", &engine.global()).unwrap();
/// assert_eq!(fetched, MemoryValue::string("hello"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryEngine {
    global: MemoryObject,
}

impl MemoryEngine {
    /// Creates a runtime with an empty global scope.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for MemoryEngine {
    type Value = MemoryValue;
    type Error = MemoryError;
    type Object = MemoryObject;

    #[inline]
    fn global(&self) -> MemoryObject {
        self.global.clone()
    }

    fn create_object(&mut self, name: &str) -> Result<MemoryObject, MemoryError> {
        if !is_identifier(name) {
            return Err(MemoryError::InvalidIdentifier(name.into()));
        }
        let object = MemoryObject::new();
        // The evaluated expression also installs the name in the global
        // scope; the caller re-points it on the actual destination later.
        self.global.set(name, object.as_value());
        Ok(object)
    }

    fn primitive(&mut self, value: Primitive<'_>) -> Result<MemoryValue, MemoryError> {
        Ok(match value {
            Primitive::Bool(value) => MemoryValue::Bool(value),
            Primitive::Int(value) => MemoryValue::Int(value),
            // Script numbers are signed; out-of-range magnitudes degrade to
            // floating point the way dynamic runtimes represent them.
            Primitive::UInt(value) => match i64::try_from(value) {
                Ok(value) => MemoryValue::Int(value),
                Err(_) => MemoryValue::Float(value as f64),
            },
            Primitive::Float(value) => MemoryValue::Float(value),
            Primitive::Char(value) => {
                let mut buf = [0u8; 4];
                MemoryValue::string(value.encode_utf8(&mut buf))
            }
            Primitive::Str(value) => MemoryValue::string(value),
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// -----------------------------------------------------------------------------
// Tests
