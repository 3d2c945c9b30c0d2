//! Classification of host values into bindable shapes.
//!
//! Every value handed to [`register`](crate::register) must implement
//! [`Bind`], which classifies it into one of the four [`BindShape`]s the
//! registration algorithm matches on exhaustively. Classification happens at
//! registration time through ordinary trait impls; there is no runtime
//! reflection.

mod register;

pub use register::{BindConfig, RegisterError, register, register_to, register_with};

use crate::bridge::{Engine, Primitive};

// -----------------------------------------------------------------------------
// Bind

/// The shape of a host value, as seen by the registration algorithm.
pub enum BindShape<'a, E: Engine> {
    /// A member of the closed primitive set; converted by
    /// [`Engine::primitive`] and installed directly.
    Primitive(Primitive<'a>),
    /// A value already in the bridge's native representation, typically an
    /// engine-created function. Installed directly, without conversion.
    ///
    /// See [`Native`].
    Function(&'a E::Value),
    /// A record with named fields; registered as a child object, one
    /// property per non-omitted field.
    Record(&'a dyn Record<E>),
    /// A value the bridge cannot represent: raw memory handles, concurrency
    /// channels, absence of a value. Registration stops with
    /// [`RegisterError::UnsupportedKind`].
    Unsupported,
}

impl<E: Engine> core::fmt::Debug for BindShape<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Primitive(_) => "Primitive",
            Self::Function(_) => "Function",
            Self::Record(_) => "Record",
            Self::Unsupported => "Unsupported",
        })
    }
}

/// A host value that can be mirrored into the scripting runtime.
///
/// Impls for primitives, strings and transparent wrappers (`&T`, `Box<T>`,
/// `Rc<T>`, `Arc<T>`, `Option<T>`) are provided in [`impls`](crate::impls);
/// record types get theirs from [`bind_record!`](crate::bind_record) or a
/// manual [`Record`] impl.
pub trait Bind<E: Engine> {
    /// Classifies this value.
    fn shape(&self) -> BindShape<'_, E>;
}

// -----------------------------------------------------------------------------
// Native

/// Marks a value that is already bridge-native.
///
/// The main use is exposing engine-created functions: the host obtains a
/// callable value from its runtime, wraps it in `Native`, and places it in a
/// record field like any other value.
///
/// # Examples
///
/// ```
/// use vc_script::memory::{MemoryEngine, MemoryValue};
/// use vc_script::{Engine, Native, deep_get, register};
///
/// let mut engine = MemoryEngine::new();
/// let sum = MemoryValue::function(|args| {
///     MemoryValue::Int(args.iter().filter_map(MemoryValue::as_int).sum())
/// });
///
/// register(&mut engine, "sum", &Native(sum)).unwrap();
///
/// let fetched = deep_get("sum", &engine.global()).unwrap();
/// let result = fetched.call(&[MemoryValue::Int(2), MemoryValue::Int(40)]);
/// assert_eq!(result, Some(MemoryValue::Int(42)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Native<V>(pub V);

impl<E: Engine> Bind<E> for Native<E::Value> {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Function(&self.0)
    }
}

// -----------------------------------------------------------------------------
// Record

/// A single field of a [`Record`]: the host-side name, the keyed raw tags,
/// and the field's value.
pub struct RecordField<'a, E: Engine> {
    name: &'a str,
    tags: &'a [(&'a str, &'a str)],
    value: &'a dyn Bind<E>,
}

impl<E: Engine> Clone for RecordField<'_, E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine> Copy for RecordField<'_, E> {}

impl<'a, E: Engine> RecordField<'a, E> {
    /// Creates an untagged field.
    #[inline]
    pub const fn new(name: &'a str, value: &'a dyn Bind<E>) -> Self {
        Self {
            name,
            tags: &[],
            value,
        }
    }

    /// Attaches raw tags, keyed by tag key (see
    /// [`BindConfig::tag_key`](crate::BindConfig::tag_key)).
    #[inline]
    pub const fn with_tags(self, tags: &'a [(&'a str, &'a str)]) -> Self {
        Self { tags, ..self }
    }

    /// Returns the host-side field name.
    #[inline]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the raw tag stored under `key`, if any.
    #[inline]
    pub fn tag(&self, key: &str) -> Option<&'a str> {
        self.tags
            .iter()
            .find(|(tag_key, _)| *tag_key == key)
            .map(|(_, raw)| *raw)
    }

    /// Returns the field's value.
    #[inline]
    pub const fn value(&self) -> &'a dyn Bind<E> {
        self.value
    }
}

/// A host value with named fields, walkable in declaration order.
///
/// Most types should use [`bind_record!`](crate::bind_record). A manual impl
/// is needed when a field type only binds against one concrete engine (such
/// as a [`Native`] function value) or when a field carries tags under more
/// than one key:
///
/// ```
/// use vc_script::memory::{MemoryEngine, MemoryValue};
/// use vc_script::{Bind, BindShape, Engine, Record, RecordField, deep_get, register};
///
/// struct Greeter {
///     name: String,
///     shout: vc_script::Native<MemoryValue>,
/// }
///
/// impl Record<MemoryEngine> for Greeter {
///     fn field_len(&self) -> usize {
///         2
///     }
///
///     fn field_at(&self, index: usize) -> Option<RecordField<'_, MemoryEngine>> {
///         match index {
///             0 => Some(RecordField::new("name", &self.name).with_tags(&[("script", "name")])),
///             1 => Some(RecordField::new("shout", &self.shout).with_tags(&[("script", "shout")])),
///             _ => None,
///         }
///     }
/// }
///
/// impl Bind<MemoryEngine> for Greeter {
///     fn shape(&self) -> BindShape<'_, MemoryEngine> {
///         BindShape::Record(self)
///     }
/// }
///
/// let mut engine = MemoryEngine::new();
/// let greeter = Greeter {
///     name: "astro".into(),
///     shout: vc_script::Native(MemoryValue::function(|_| MemoryValue::string("HI"))),
/// };
/// register(&mut engine, "greeter", &greeter).unwrap();
///
/// let global = engine.global();
/// assert_eq!(deep_get("greeter.name", &global).unwrap(), MemoryValue::string("astro"));
/// assert_eq!(
///     deep_get("greeter.shout", &global).unwrap().call(&[]),
///     Some(MemoryValue::string("HI")),
/// );
/// ```
pub trait Record<E: Engine> {
    /// Returns the number of fields.
    fn field_len(&self) -> usize;

    /// Returns the field at `index`, in declaration order.
    ///
    /// Returns `None` if `index` is out of bounds.
    fn field_at(&self, index: usize) -> Option<RecordField<'_, E>>;
}

// -----------------------------------------------------------------------------
// Record Field Iterator

/// An iterator over the fields of a [`Record`], in declaration order.
pub struct RecordFieldIter<'a, E: Engine> {
    record: &'a dyn Record<E>,
    index: usize,
}

impl<'a, E: Engine> RecordFieldIter<'a, E> {
    /// Creates a new iterator for the given record.
    #[inline(always)]
    pub const fn new(record: &'a dyn Record<E>) -> Self {
        RecordFieldIter { record, index: 0 }
    }
}

impl<'a, E: Engine> Iterator for RecordFieldIter<'a, E> {
    type Item = RecordField<'a, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let field = self.record.field_at(self.index);
        self.index += field.is_some() as usize;
        field
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.record.field_len();
        (size - self.index, Some(size))
    }
}

impl<E: Engine> ExactSizeIterator for RecordFieldIter<'_, E> {}

// -----------------------------------------------------------------------------
// bind_record!

/// Implements [`Record`] and [`Bind`] for a struct from a field list.
///
/// Each field may carry a raw tag (`field: "NAME,PARAM,.."`); untagged fields
/// are exposed under their host name. Tags land under the
/// [default key](crate::DEFAULT_TAG_KEY) unless an explicit key is given
/// before the field block.
///
/// The generated impls are generic over the engine, so every field type must
/// itself bind against any engine. Types holding engine-specific values
/// (e.g. [`Native`] functions) need a manual [`Record`] impl instead.
///
/// # Examples
///
/// ```
/// use vc_script::memory::{MemoryEngine, MemoryValue};
/// use vc_script::{Engine, bind_record, deep_get, register};
///
/// struct Cluster {
///     kubernetes: String,
///     node_count: u32,
///     password: String,
/// }
///
/// bind_record!(Cluster: "infra" {
///     kubernetes: "kubernetes,alias=k8s",
///     node_count: "nodes",
///     password: "-",
/// });
///
/// let cluster = Cluster {
///     kubernetes: "v1.30".into(),
///     node_count: 3,
///     password: "hunter2".into(),
/// };
///
/// let mut engine = MemoryEngine::new();
/// let mut global = engine.global();
/// let config = vc_script::BindConfig::with_tag_key("infra");
/// vc_script::register_with(&mut engine, &mut global, "cluster", &cluster, &[], &config).unwrap();
///
/// assert_eq!(deep_get("cluster.k8s", &global).unwrap(), MemoryValue::string("v1.30"));
/// assert_eq!(deep_get("cluster.nodes", &global).unwrap(), MemoryValue::Int(3));
/// assert!(deep_get("cluster.password", &global).is_err());
/// ```
#[macro_export]
macro_rules! bind_record {
    ($ty:ty : $key:literal { $($field:ident $(: $tag:literal)?),+ $(,)? }) => {
        $crate::bind_record!(@impl $ty, $key, { $($field $(: $tag)?),+ });
    };
    ($ty:ty { $($field:ident $(: $tag:literal)?),+ $(,)? }) => {
        $crate::bind_record!(@impl $ty, $crate::DEFAULT_TAG_KEY, { $($field $(: $tag)?),+ });
    };
    (@impl $ty:ty, $key:expr, { $($field:ident $(: $tag:literal)?),+ }) => {
        impl<E: $crate::Engine> $crate::Record<E> for $ty {
            fn field_len(&self) -> usize {
                [$(::core::stringify!($field)),+].len()
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<$crate::RecordField<'_, E>> {
                let fields = [$(
                    $crate::RecordField::new(::core::stringify!($field), &self.$field)
                        $(.with_tags(&[($key, $tag)]))?
                ),+];
                fields.get(index).copied()
            }
        }

        impl<E: $crate::Engine> $crate::Bind<E> for $ty {
            #[inline]
            fn shape(&self) -> $crate::BindShape<'_, E> {
                $crate::BindShape::Record(self)
            }
        }
    };
}
