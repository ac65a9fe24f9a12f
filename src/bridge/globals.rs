// UI global namespace installation.
//
// Built once when the UI context starts and read-only afterwards. Besides the
// contract object it carries two conditional bindings: a `global` alias for
// environments that lack one, and (development builds only) the host
// module-loading primitives used by hot reload.

use crate::bridge::adapter::ClientApi;
use crate::bridge::contract::API_GLOBAL;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Conventional name for "the global object".
pub const GLOBAL_ALIAS: &str = "global";

/// Name of the environment's window object.
pub const WINDOW_OBJECT: &str = "window";

/// Build flavour, fixed at compile time by the `dev-loader` feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildProfile {
    Production,
    Development,
}

impl BuildProfile {
    pub const CURRENT: BuildProfile = if cfg!(feature = "dev-loader") {
        BuildProfile::Development
    } else {
        BuildProfile::Production
    };

    pub fn exposes_loader(self) -> bool {
        matches!(self, BuildProfile::Development)
    }
}

/// Host module-loading primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderPrimitive {
    Require,
    Module,
    Exports,
}

impl LoaderPrimitive {
    pub const ALL: [LoaderPrimitive; 3] = [
        LoaderPrimitive::Require,
        LoaderPrimitive::Module,
        LoaderPrimitive::Exports,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LoaderPrimitive::Require => "require",
            LoaderPrimitive::Module => "module",
            LoaderPrimitive::Exports => "exports",
        }
    }
}

/// A value bound in the UI global namespace.
#[derive(Clone)]
pub enum GlobalBinding {
    /// Object supplied by the environment itself
    Environment,
    /// Another name for an existing binding
    Alias(&'static str),
    /// The bridge contract object
    Api(Arc<ClientApi>),
    Loader(LoaderPrimitive),
}

impl fmt::Debug for GlobalBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalBinding::Environment => f.write_str("Environment"),
            GlobalBinding::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
            GlobalBinding::Api(_) => f.write_str("Api"),
            GlobalBinding::Loader(primitive) => f.debug_tuple("Loader").field(primitive).finish(),
        }
    }
}

/// Globals present before installation.
#[derive(Debug, Clone)]
pub struct UiEnvironment {
    bindings: IndexMap<String, GlobalBinding>,
}

impl Default for UiEnvironment {
    fn default() -> Self {
        let mut bindings = IndexMap::new();
        bindings.insert(WINDOW_OBJECT.to_string(), GlobalBinding::Environment);
        Self { bindings }
    }
}

impl UiEnvironment {
    /// Add an environment-provided global (e.g. a bundler that already
    /// defines `global`).
    pub fn with_global(mut self, name: &str) -> Self {
        self.bindings
            .insert(name.to_string(), GlobalBinding::Environment);
        self
    }
}

/// The installed, read-only UI global namespace.
#[derive(Debug)]
pub struct UiGlobals {
    bindings: IndexMap<String, GlobalBinding>,
    profile: BuildProfile,
}

impl UiGlobals {
    /// Install the contract surface into `environment`.
    ///
    /// Use [`BuildProfile::CURRENT`] outside tests.
    pub fn install(environment: UiEnvironment, api: Arc<ClientApi>, profile: BuildProfile) -> Self {
        let mut bindings = environment.bindings;

        bindings.insert(API_GLOBAL.to_string(), GlobalBinding::Api(api));

        if !bindings.contains_key(GLOBAL_ALIAS) {
            bindings.insert(
                GLOBAL_ALIAS.to_string(),
                GlobalBinding::Alias(WINDOW_OBJECT),
            );
        }

        if profile.exposes_loader() {
            tracing::warn!("Development build: exposing module loader primitives to the UI");
            for primitive in LoaderPrimitive::ALL {
                bindings.insert(primitive.name().to_string(), GlobalBinding::Loader(primitive));
            }
        }

        tracing::debug!(
            "UI globals installed ({:?}): {:?}",
            profile,
            bindings.keys().collect::<Vec<_>>()
        );

        Self { bindings, profile }
    }

    pub fn profile(&self) -> BuildProfile {
        self.profile
    }

    pub fn get(&self, name: &str) -> Option<&GlobalBinding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Look a name up, following aliases.
    pub fn resolve(&self, name: &str) -> Option<&GlobalBinding> {
        let mut current = name;
        // Alias chains are at most one hop today; the bound keeps a cycle from spinning.
        for _ in 0..self.bindings.len() {
            match self.bindings.get(current)? {
                GlobalBinding::Alias(target) => current = *target,
                binding => return Some(binding),
            }
        }
        None
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// The installed contract object.
    pub fn api(&self) -> Option<Arc<ClientApi>> {
        match self.bindings.get(API_GLOBAL) {
            Some(GlobalBinding::Api(api)) => Some(Arc::clone(api)),
            _ => None,
        }
    }
}
