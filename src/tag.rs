//! Parsing of per-field registration tags.

use smallvec::SmallVec;

/// The tag key read by default when registering a record.
///
/// See [`BindConfig`](crate::BindConfig) for using an alternate key.
pub const DEFAULT_TAG_KEY: &str = "script";

/// The primary tag token that hides a field from the scripting runtime.
pub const OMIT_TOKEN: &str = "-";

const ALIAS_PREFIX: &str = "alias=";

type AliasList<'a> = SmallVec<[&'a str; 4]>;

// -----------------------------------------------------------------------------
// TagDirective

/// The parsed form of a single field tag.
///
/// A directive is constructed fresh for every field inspected during a
/// registration pass and dropped right after; it is a transient decision
/// record, never a persisted entity.
///
/// # Examples
///
/// ```
/// use vc_script::TagDirective;
///
/// let directive = TagDirective::parse(Some("kubernetes,alias=k8s"), "Kubernetes");
/// assert_eq!(directive.name(), "kubernetes");
/// assert_eq!(directive.aliases(), ["k8s"]);
/// assert!(!directive.omit());
///
/// // Untagged fields fall back to their host-side name.
/// let directive = TagDirective::parse(None, "Kubernetes");
/// assert_eq!(directive.name(), "Kubernetes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective<'a> {
    name: &'a str,
    omit: bool,
    aliases: AliasList<'a>,
}

impl<'a> TagDirective<'a> {
    /// Parses a raw tag into a directive, using `fallback` (the host-side
    /// field name) when the tag carries no usable name.
    ///
    /// Parsing is total: every input produces a directive. The first
    /// comma-separated token is the exposed name (`-` means omit); remaining
    /// tokens are scanned for `alias=NAME`. Anything else, including the
    /// reserved `omitempty`, `returns` and `throws` keywords, is silently
    /// ignored so that tags written against future revisions keep parsing.
    pub fn parse(raw: Option<&'a str>, fallback: &'a str) -> Self {
        let raw = match raw {
            None | Some("") => return Self::untagged(fallback),
            Some(raw) => raw,
        };

        let mut tokens = raw.split(',');
        let name = tokens.next().unwrap_or("");
        if name == OMIT_TOKEN {
            // The fallback name is kept for diagnostics only; the field
            // will not be registered.
            return Self {
                name: fallback,
                omit: true,
                aliases: AliasList::new(),
            };
        }

        let mut aliases = AliasList::new();
        for token in tokens {
            if let Some(alias) = token.strip_prefix(ALIAS_PREFIX)
                && !alias.is_empty()
            {
                aliases.push(alias);
            }
        }

        Self {
            // An exposed name is never empty unless the field is omitted.
            name: if name.is_empty() { fallback } else { name },
            omit: false,
            aliases,
        }
    }

    /// The directive of a field without any tag.
    #[inline]
    pub fn untagged(fallback: &'a str) -> Self {
        Self {
            name: fallback,
            omit: false,
            aliases: AliasList::new(),
        }
    }

    /// Returns the name under which the field is exposed.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns `true` if the field is hidden from the scripting runtime.
    #[inline]
    pub fn omit(&self) -> bool {
        self.omit
    }

    /// Returns the declared aliases, in input order.
    #[inline]
    pub fn aliases(&self) -> &[&'a str] {
        &self.aliases
    }
}

// -----------------------------------------------------------------------------
// Tests
