//! Resolution and proxy configuration

use crate::accessor::PropNames;

/// Options for resolving a getter or setter map
///
/// The defaults match the lenient lookups used for value maps: unknown
/// requested names are dropped, unsupported values are an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Restrict resolution to these names
    pub props: Option<PropNames>,
    /// Drop requested names that cannot be resolved instead of failing
    pub ignore_inaccessible: bool,
    /// Fail when no resolver supports the value, instead of returning `None`
    pub fail_on_unsupported: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            props: None,
            ignore_inaccessible: true,
            fail_on_unsupported: true,
        }
    }
}

impl ResolveOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict resolution to `props`
    pub fn with_props(mut self, props: impl Into<PropNames>) -> Self {
        self.props = Some(props.into());
        self
    }

    /// Fail on requested names that cannot be resolved
    pub fn strict(mut self) -> Self {
        self.ignore_inaccessible = false;
        self
    }

    /// Return `None` for unsupported values
    pub fn lenient(mut self) -> Self {
        self.fail_on_unsupported = false;
        self
    }
}

/// Options for building an [`AccessProxy`](crate::AccessProxy)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOptions {
    /// Restrict the proxy to these names
    pub props: Option<PropNames>,
    /// Build without setters
    pub read_only: bool,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            props: None,
            read_only: true,
        }
    }
}

impl ProxyOptions {
    /// Read-only proxy over every property
    pub fn new() -> Self {
        Self::default()
    }

    /// Also resolve setters
    pub fn writable(mut self) -> Self {
        self.read_only = false;
        self
    }

    /// Restrict the proxy to `props`
    pub fn with_props(mut self, props: impl Into<PropNames>) -> Self {
        self.props = Some(props.into());
        self
    }

    /// Strict resolution options derived from these proxy options
    pub(crate) fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            props: self.props.clone(),
            ignore_inaccessible: false,
            fail_on_unsupported: true,
        }
    }
}
