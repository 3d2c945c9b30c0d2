//! The recursive registration algorithm.

use alloc::borrow::Cow;
use core::fmt;

use crate::bind::{Bind, BindShape, RecordFieldIter};
use crate::bridge::{Engine, ScriptObject};
use crate::tag::{DEFAULT_TAG_KEY, TagDirective};

// -----------------------------------------------------------------------------
// Error

/// An error returned from a failed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError<E> {
    /// The value's shape cannot be represented in the scripting runtime.
    ///
    /// The affected subtree is simply not registered; siblings registered
    /// before it remain in place (no rollback).
    UnsupportedKind,
    /// The bridge itself failed to create an object or convert a value.
    ///
    /// Propagated verbatim; no context is added to what the bridge reports.
    Engine(E),
}

impl<E: fmt::Display> fmt::Display for RegisterError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedKind => f.write_str("unsupported kind"),
            Self::Engine(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for RegisterError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::UnsupportedKind => None,
            Self::Engine(err) => Some(err),
        }
    }
}

// -----------------------------------------------------------------------------
// BindConfig

/// Configuration for a registration pass.
///
/// The only knob today is the tag key: the name under which
/// [`RecordField::tag`](crate::RecordField::tag) is consulted. It defaults to
/// [`DEFAULT_TAG_KEY`] and can be repointed to reuse tags written for another
/// convention. The configuration is threaded explicitly through
/// [`register_with`]; there is no process-wide state, so concurrent or
/// test-isolated passes cannot interfere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    tag_key: Cow<'static, str>,
}

impl BindConfig {
    /// Creates a configuration reading the [`DEFAULT_TAG_KEY`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            tag_key: Cow::Borrowed(DEFAULT_TAG_KEY),
        }
    }

    /// Creates a configuration reading tags under `key` instead.
    #[inline]
    pub fn with_tag_key(key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag_key: key.into(),
        }
    }

    /// Returns the tag key consulted on each field.
    #[inline]
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }
}

impl Default for BindConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Registers `value` under `name` in the engine's global namespace.
///
/// This is the entry point for root objects; nested destinations go through
/// [`register_to`].
///
/// # Examples
///
/// ```
/// use vc_script::memory::{MemoryEngine, MemoryValue};
/// use vc_script::{Engine, deep_get, register};
///
/// let mut engine = MemoryEngine::new();
/// register(&mut engine, "answer", &42_i64).unwrap();
///
/// assert_eq!(deep_get("answer", &engine.global()).unwrap(), MemoryValue::Int(42));
/// ```
pub fn register<E: Engine>(
    engine: &mut E,
    name: &str,
    value: &dyn Bind<E>,
) -> Result<(), RegisterError<E::Error>> {
    let mut global = engine.global();
    register_to(engine, &mut global, name, value)
}

/// Registers `value` under `name` on the destination object `dest`.
///
/// Behaves like [`register`], except the new property lands on `dest`
/// instead of the root namespace. Injecting `dest` itself into the runtime
/// is not handled here; it must already live somewhere reachable.
pub fn register_to<E: Engine>(
    engine: &mut E,
    dest: &mut E::Object,
    name: &str,
    value: &dyn Bind<E>,
) -> Result<(), RegisterError<E::Error>> {
    register_with(engine, dest, name, value, &[], &BindConfig::new())
}

/// Registers `value` under `name` and every name in `aliases` on `dest`.
///
/// Each alias refers to the identical registered representation: for record
/// values, the primary name and all aliases are set to the same created
/// object, so mutations through one path are visible through the others.
///
/// Record fields are processed in declaration order. A name that collides
/// with an earlier property on the destination silently overwrites it, in
/// the same way repeated property assignment does inside the runtime.
///
/// The first [`Unsupported`](BindShape::Unsupported) value anywhere in the
/// recursion aborts the call chain; fields registered before the failing one
/// remain registered.
pub fn register_with<E: Engine>(
    engine: &mut E,
    dest: &mut E::Object,
    name: &str,
    value: &dyn Bind<E>,
    aliases: &[&str],
    config: &BindConfig,
) -> Result<(), RegisterError<E::Error>> {
    match value.shape() {
        BindShape::Unsupported => Err(RegisterError::UnsupportedKind),
        BindShape::Primitive(primitive) => {
            let value = engine.primitive(primitive).map_err(RegisterError::Engine)?;
            set_all(dest, name, aliases, value);
            Ok(())
        }
        BindShape::Function(value) => {
            set_all(dest, name, aliases, value.clone());
            Ok(())
        }
        BindShape::Record(record) => {
            let mut object = engine.create_object(name).map_err(RegisterError::Engine)?;
            for field in RecordFieldIter::new(record) {
                let directive = TagDirective::parse(field.tag(config.tag_key()), field.name());
                if directive.omit() {
                    continue;
                }
                register_with(
                    engine,
                    &mut object,
                    directive.name(),
                    field.value(),
                    directive.aliases(),
                    config,
                )?;
            }
            set_all(dest, name, aliases, object.as_value());
            Ok(())
        }
    }
}

/// Installs `value` under the primary name first, then under every alias.
fn set_all<O: ScriptObject>(dest: &mut O, name: &str, aliases: &[&str], value: O::Value) {
    dest.set(name, value.clone());
    for alias in aliases {
        dest.set(alias, value.clone());
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{BindConfig, RegisterError, register, register_to, register_with};
    use crate::bind::{Bind, BindShape, Native, Record, RecordField};
    use crate::bridge::Engine;
    use crate::memory::{MemoryEngine, MemoryValue};
    use crate::resolve::{ResolveError, deep_get};

    struct InnerObject {
        value: i64,
    }

    crate::bind_record!(InnerObject {
        value: "value",
    });

    struct ObjectWithMethods {
        name: String,
        sum: Native<MemoryValue>,
        inner: InnerObject,
        skip_me: bool,
        no_tag: i64,
    }

    impl ObjectWithMethods {
        fn sample() -> Self {
            ObjectWithMethods {
                name: "astro".into(),
                sum: Native(MemoryValue::function(|args| {
                    MemoryValue::Int(args.iter().filter_map(MemoryValue::as_int).sum())
                })),
                inner: InnerObject { value: 42 },
                skip_me: true,
                no_tag: 24,
            }
        }
    }

    // `sum` holds an engine-specific value, so the record impl is manual.
    impl Record<MemoryEngine> for ObjectWithMethods {
        fn field_len(&self) -> usize {
            5
        }

        fn field_at(&self, index: usize) -> Option<RecordField<'_, MemoryEngine>> {
            match index {
                0 => Some(RecordField::new("name", &self.name).with_tags(&[("script", "name")])),
                1 => Some(RecordField::new("sum", &self.sum).with_tags(&[("script", "sum")])),
                2 => Some(RecordField::new("inner", &self.inner).with_tags(&[("script", "inner")])),
                3 => Some(RecordField::new("skip_me", &self.skip_me).with_tags(&[("script", "-")])),
                4 => Some(RecordField::new("no_tag", &self.no_tag)),
                _ => None,
            }
        }
    }

    impl Bind<MemoryEngine> for ObjectWithMethods {
        fn shape(&self) -> BindShape<'_, MemoryEngine> {
            BindShape::Record(self)
        }
    }

    struct ChannelLike;

    impl Bind<MemoryEngine> for ChannelLike {
        fn shape(&self) -> BindShape<'_, MemoryEngine> {
            BindShape::Unsupported
        }
    }

    #[test]
    fn registers_nested_record() {
        let mut engine = MemoryEngine::new();
        register(&mut engine, "top", &ObjectWithMethods::sample()).unwrap();

        let global = engine.global();
        assert_eq!(
            deep_get("top.name", &global).unwrap(),
            MemoryValue::string("astro"),
        );
        assert_eq!(
            deep_get("top.inner.value", &global).unwrap(),
            MemoryValue::Int(42),
        );
        // Untagged fields are exposed under their host name.
        assert_eq!(deep_get("top.no_tag", &global).unwrap(), MemoryValue::Int(24));
    }

    #[test]
    fn registered_function_is_callable() {
        let mut engine = MemoryEngine::new();
        register(&mut engine, "top", &ObjectWithMethods::sample()).unwrap();

        let sum = deep_get("top.sum", &engine.global()).unwrap();
        let result = sum.call(&[MemoryValue::Int(19), MemoryValue::Int(23)]);
        assert_eq!(result, Some(MemoryValue::Int(42)));
    }

    #[test]
    fn omitted_field_is_absent() {
        let mut engine = MemoryEngine::new();
        register(&mut engine, "top", &ObjectWithMethods::sample()).unwrap();

        let global = engine.global();
        assert_eq!(
            deep_get("top.skip_me", &global),
            Err(ResolveError::Undefined("skip_me".into())),
        );
        assert_eq!(
            deep_get("top.SkipMe", &global),
            Err(ResolveError::Undefined("SkipMe".into())),
        );
    }

    #[test]
    fn aliases_share_one_object() {
        struct Infra {
            kubernetes: InnerObject,
        }

        crate::bind_record!(Infra {
            kubernetes: "kubernetes,alias=k8s",
        });

        let mut engine = MemoryEngine::new();
        let infra = Infra {
            kubernetes: InnerObject { value: 7 },
        };
        register(&mut engine, "infra", &infra).unwrap();

        let global = engine.global();
        let primary = deep_get("infra.kubernetes", &global).unwrap();
        let alias = deep_get("infra.k8s", &global).unwrap();
        // Handle identity, not just structural equality.
        assert_eq!(primary, alias);

        // A mutation through one path is visible through the other.
        let mut handle = primary.as_object().unwrap();
        crate::bridge::ScriptObject::set(&mut handle, "extra", MemoryValue::Bool(true));
        assert_eq!(
            deep_get("infra.k8s.extra", &global).unwrap(),
            MemoryValue::Bool(true),
        );
    }

    #[test]
    fn primitive_aliases_share_one_value() {
        struct Leaf {
            num: i64,
        }

        crate::bind_record!(Leaf {
            num: "num,alias=n,alias=number",
        });

        let mut engine = MemoryEngine::new();
        register(&mut engine, "leaf", &Leaf { num: 5 }).unwrap();

        let global = engine.global();
        for key in ["leaf.num", "leaf.n", "leaf.number"] {
            assert_eq!(deep_get(key, &global).unwrap(), MemoryValue::Int(5));
        }
    }

    #[test]
    fn unsupported_kind_aborts_without_rollback() {
        struct Mixed {
            ok: i64,
            broken: ChannelLike,
            late: i64,
        }

        impl Record<MemoryEngine> for Mixed {
            fn field_len(&self) -> usize {
                3
            }

            fn field_at(&self, index: usize) -> Option<RecordField<'_, MemoryEngine>> {
                match index {
                    0 => Some(RecordField::new("ok", &self.ok)),
                    1 => Some(RecordField::new("broken", &self.broken)),
                    2 => Some(RecordField::new("late", &self.late)),
                    _ => None,
                }
            }
        }

        impl Bind<MemoryEngine> for Mixed {
            fn shape(&self) -> BindShape<'_, MemoryEngine> {
                BindShape::Record(self)
            }
        }

        let mut engine = MemoryEngine::new();
        let mixed = Mixed {
            ok: 1,
            broken: ChannelLike,
            late: 2,
        };
        let err = register(&mut engine, "mixed", &mixed).unwrap_err();
        assert_eq!(err, RegisterError::UnsupportedKind);

        // The created object was abandoned before being attached, but the
        // engine-side name from the evaluated expression still points at it,
        // with the sibling registered before the failure intact.
        let global = engine.global();
        assert_eq!(deep_get("mixed.ok", &global).unwrap(), MemoryValue::Int(1));
        assert_eq!(
            deep_get("mixed.broken", &global),
            Err(ResolveError::Undefined("broken".into())),
        );
        assert_eq!(
            deep_get("mixed.late", &global),
            Err(ResolveError::Undefined("late".into())),
        );

        // Exactly one property made it in before the abort.
        let partial = deep_get("mixed", &global).unwrap().as_object().unwrap();
        assert_eq!(partial.len(), 1);
        assert!(partial.contains("ok"));
        assert!(!partial.contains("broken"));
    }

    #[test]
    fn unsupported_root_leaves_prior_registrations() {
        let mut engine = MemoryEngine::new();
        register(&mut engine, "first", &1_i64).unwrap();
        assert_eq!(
            register(&mut engine, "second", &ChannelLike),
            Err(RegisterError::UnsupportedKind),
        );

        let global = engine.global();
        assert_eq!(deep_get("first", &global).unwrap(), MemoryValue::Int(1));
        assert_eq!(
            deep_get("second", &global),
            Err(ResolveError::Undefined("second".into())),
        );
    }

    #[test]
    fn later_fields_silently_overwrite() {
        struct Clash {
            a: i64,
            b: i64,
        }

        crate::bind_record!(Clash {
            a: "same",
            b: "same",
        });

        let mut engine = MemoryEngine::new();
        register(&mut engine, "clash", &Clash { a: 1, b: 2 }).unwrap();
        assert_eq!(
            deep_get("clash.same", &engine.global()).unwrap(),
            MemoryValue::Int(2),
        );
    }

    #[test]
    fn alternate_tag_key() {
        struct Tagged {
            value: i64,
        }

        crate::bind_record!(Tagged: "js" {
            value: "v",
        });

        let mut engine = MemoryEngine::new();
        let mut global = engine.global();
        let config = BindConfig::with_tag_key("js");
        register_with(&mut engine, &mut global, "tagged", &Tagged { value: 9 }, &[], &config)
            .unwrap();
        assert_eq!(deep_get("tagged.v", &global).unwrap(), MemoryValue::Int(9));

        // Under the default key the same tags are invisible, so the field
        // falls back to its host name.
        let mut engine = MemoryEngine::new();
        register(&mut engine, "tagged", &Tagged { value: 9 }).unwrap();
        let global = engine.global();
        assert_eq!(deep_get("tagged.value", &global).unwrap(), MemoryValue::Int(9));
        assert_eq!(
            deep_get("tagged.v", &global),
            Err(ResolveError::Undefined("v".into())),
        );
    }

    #[test]
    fn register_to_targets_nested_object() {
        let mut engine = MemoryEngine::new();
        let mut parent = engine.create_object("parent").unwrap();
        register_to(&mut engine, &mut parent, "inner", &InnerObject { value: 3 }).unwrap();

        assert_eq!(
            deep_get("parent.inner.value", &engine.global()).unwrap(),
            MemoryValue::Int(3),
        );
    }

    #[test]
    fn top_level_aliases_apply() {
        let mut engine = MemoryEngine::new();
        let mut global = engine.global();
        register_with(
            &mut engine,
            &mut global,
            "value",
            &InnerObject { value: 1 },
            &["alt", "other"],
            &BindConfig::new(),
        )
        .unwrap();

        let primary = deep_get("value", &global).unwrap();
        assert_eq!(primary, deep_get("alt", &global).unwrap());
        assert_eq!(primary, deep_get("other", &global).unwrap());
    }

    #[test]
    fn invalid_object_name_surfaces_engine_error() {
        let mut engine = MemoryEngine::new();
        let err = register(&mut engine, "not a name", &InnerObject { value: 1 }).unwrap_err();
        assert!(matches!(err, RegisterError::Engine(_)));
    }

    #[test]
    fn references_are_transparent() {
        use alloc::boxed::Box;

        let mut engine = MemoryEngine::new();
        let inner = InnerObject { value: 11 };
        register(&mut engine, "by_ref", &&inner).unwrap();
        register(&mut engine, "boxed", &Box::new(InnerObject { value: 12 })).unwrap();
        register(&mut engine, "some", &Some(13_i64)).unwrap();

        let global = engine.global();
        assert_eq!(deep_get("by_ref.value", &global).unwrap(), MemoryValue::Int(11));
        assert_eq!(deep_get("boxed.value", &global).unwrap(), MemoryValue::Int(12));
        assert_eq!(deep_get("some", &global).unwrap(), MemoryValue::Int(13));
    }

    #[test]
    fn absent_values_are_unsupported() {
        let mut engine = MemoryEngine::new();
        assert_eq!(
            register(&mut engine, "none", &Option::<i64>::None),
            Err(RegisterError::UnsupportedKind),
        );
        assert_eq!(
            register(&mut engine, "unit", &()),
            Err(RegisterError::UnsupportedKind),
        );
    }
}
