//! Dotted-path lookup into a registered object graph.

use alloc::boxed::Box;
use core::fmt;

use crate::bridge::{ScriptObject, ScriptValue};

// -----------------------------------------------------------------------------
// Error

/// An error returned from a failed [`deep_get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError<E> {
    /// A path segment evaluated to the runtime's undefined sentinel.
    ///
    /// Carries the exact segment that was missing, so callers can report
    /// precisely where a lookup path diverges from the registered graph.
    Undefined(Box<str>),
    /// A segment resolved to a value without properties while further
    /// segments remained; the path is deeper than the registered structure.
    NonObject(Box<str>),
    /// The bridge itself failed to fetch a property.
    ///
    /// Propagated verbatim; distinct from a value merely being undefined.
    Engine(E),
}

impl<E> ResolveError<E> {
    /// Returns the path segment the lookup failed at, if the failure was
    /// positional rather than a bridge fault.
    #[inline]
    pub fn segment(&self) -> Option<&str> {
        match self {
            Self::Undefined(segment) | Self::NonObject(segment) => Some(segment),
            Self::Engine(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ResolveError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined(segment) => write!(f, "undefined value for \"{segment}\""),
            Self::NonObject(segment) => {
                write!(f, "value at \"{segment}\" has no properties to descend into")
            }
            Self::Engine(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for ResolveError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Undefined(_) | Self::NonObject(_) => None,
            Self::Engine(err) => Some(err),
        }
    }
}

// -----------------------------------------------------------------------------
// deep_get

/// Fetches a value from an object graph; `key` may reference descendants in
/// dotted notation.
///
/// [`ScriptObject::get`] only reaches direct children. `deep_get` walks
/// `parent.child.grandchild` paths segment by segment, failing exactly at the
/// first segment that is undefined ([`ResolveError::Undefined`]) or that has
/// no properties while segments remain ([`ResolveError::NonObject`]).
///
/// Dots are used exclusively as path separators; keys whose names contain
/// literal dots must be fetched with the bridge's own `get`. Array indexing
/// is not supported.
///
/// # Examples
///
/// ```
/// use vc_script::memory::{MemoryEngine, MemoryValue};
/// use vc_script::{Engine, ResolveError, bind_record, deep_get, register};
///
/// struct Outer {
///     inner: Inner,
/// }
///
/// struct Inner {
///     value: i64,
/// }
///
/// bind_record!(Outer { inner: "inner" });
/// bind_record!(Inner { value: "value" });
///
/// let mut engine = MemoryEngine::new();
/// register(&mut engine, "outer", &Outer { inner: Inner { value: 42 } }).unwrap();
///
/// let global = engine.global();
/// assert_eq!(deep_get("outer.inner.value", &global).unwrap(), MemoryValue::Int(42));
/// assert_eq!(
///     deep_get("outer.missing.value", &global),
///     Err(ResolveError::Undefined("missing".into())),
/// );
/// ```
pub fn deep_get<O: ScriptObject>(key: &str, root: &O) -> Result<O::Value, ResolveError<O::Error>> {
    let mut object = root.clone();
    let mut segments = key.split('.').peekable();
    loop {
        // `split` always yields at least one segment, even for an empty key.
        let segment = segments.next().unwrap_or_default();
        let value = object.get(segment).map_err(ResolveError::Engine)?;
        if value.is_undefined() {
            return Err(ResolveError::Undefined(segment.into()));
        }
        if segments.peek().is_none() {
            return Ok(value);
        }
        object = match O::from_value(&value) {
            Some(next) => next,
            None => return Err(ResolveError::NonObject(segment.into())),
        };
    }
}

// -----------------------------------------------------------------------------
// Tests
