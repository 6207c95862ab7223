//! Capability gating for drivers with optional dependencies.
//!
//! A driver may need a vendor runtime library or an optional feature of the
//! build that is not present on every machine. The gate lets such a driver be
//! declared, registered and listed unconditionally, and defers the failure to
//! the moment somebody tries to construct it.
//!
//! ```text
//! static GATE ──first use──▶ DependencyResolver::resolve(dep) for every dep
//!      │                            │
//!      │                 all resolved?  yes ──▶ GateOutcome::Enabled
//!      │                                no  ──▶ GateOutcome::Disabled { missing }
//!      └── cached in a OnceCell, never resolved again
//! ```
//!
//! # Example
//!
//! ```rust
//! use hal_core::gate::{CapabilityGate, StaticResolver};
//! use hal_core::HalResult;
//!
//! static VISA_LASER_GATE: CapabilityGate = CapabilityGate::new("VisaLaser", &["visa"]);
//!
//! struct VisaLaser;
//!
//! impl VisaLaser {
//!     fn new() -> HalResult<Self> {
//!         VISA_LASER_GATE.construct(|| Ok(VisaLaser))
//!     }
//! }
//!
//! let resolver = StaticResolver::new(["serial"]);
//! VISA_LASER_GATE.evaluate_with(&resolver);
//! let err = VisaLaser::new().err().unwrap();
//! assert!(err.to_string().contains("visa"));
//! ```

use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{HalError, HalResult};

// =============================================================================
// Dependency Resolvers
// =============================================================================

/// Decides whether a named optional dependency is available.
pub trait DependencyResolver: Send + Sync {
    /// True if `name` resolves on this machine / in this build.
    fn resolve(&self, name: &str) -> bool;
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for Box<R> {
    fn resolve(&self, name: &str) -> bool {
        (**self).resolve(name)
    }
}

/// An explicit set of available names.
///
/// Used for operator-declared availability (`[dependencies] available = [...]`)
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    names: HashSet<String>,
}

impl StaticResolver {
    /// Create a resolver that resolves exactly `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DependencyResolver for StaticResolver {
    fn resolve(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Optional Cargo features compiled into a driver crate.
///
/// The `cfg!` must be evaluated in the crate that owns the features:
///
/// ```rust,ignore
/// static FEATURES: &[(&str, bool)] = &[
///     ("serial", cfg!(feature = "serial")),
///     ("visa", cfg!(feature = "visa")),
/// ];
/// let resolver = CompiledFeatures::new(FEATURES);
/// ```
#[derive(Debug, Clone)]
pub struct CompiledFeatures {
    features: &'static [(&'static str, bool)],
}

impl CompiledFeatures {
    /// Wrap a `(feature, enabled)` table.
    pub const fn new(features: &'static [(&'static str, bool)]) -> Self {
        Self { features }
    }

    /// Names of the enabled features.
    pub fn enabled(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.features
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| *name)
    }
}

impl DependencyResolver for CompiledFeatures {
    fn resolve(&self, name: &str) -> bool {
        self.features
            .iter()
            .any(|(feature, enabled)| *enabled && *feature == name)
    }
}

/// Vendor runtime libraries.
///
/// A name `visa` resolves if one of the extra directories holds a regular file
/// `libvisa.so` (optionally versioned, `libvisa.so.1`), `libvisa.dylib` or
/// `visa.dll`, or, when the system loader is consulted, if the loader can open
/// the platform file name of the library (`libvisa.so` on Linux) or one of its
/// versioned sonames (`libvisa.so.0` to `libvisa.so.9`). The loader searches
/// its own path: `LD_LIBRARY_PATH`, `ld.so.conf` and multiarch directories,
/// `DYLD_LIBRARY_PATH`, `PATH` on Windows.
///
/// A library opened for the check is closed again immediately.
#[derive(Debug, Clone)]
pub struct SharedLibraries {
    dirs: Vec<PathBuf>,
    use_loader: bool,
}

/// Highest soname version tried through the loader.
const MAX_SONAME_VERSION: u32 = 9;

impl SharedLibraries {
    /// Search only the given directories, without the system loader.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            use_loader: false,
        }
    }

    /// Ask the system dynamic loader, with its usual search path.
    pub fn from_env() -> Self {
        Self {
            dirs: Vec::new(),
            use_loader: true,
        }
    }

    /// Add more directories in front of the current search list.
    pub fn with_dirs<I, P>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut dirs: Vec<PathBuf> = extra.into_iter().map(Into::into).collect();
        dirs.append(&mut self.dirs);
        self.dirs = dirs;
        self
    }

    /// Extra directories searched, in order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// True if the system loader is consulted after the directories.
    pub fn uses_loader(&self) -> bool {
        self.use_loader
    }

    fn dir_provides(dir: &Path, name: &str) -> bool {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return false;
        };
        entries.flatten().any(|entry| {
            library_file_matches(&entry.file_name().to_string_lossy(), name)
                && entry.path().is_file()
        })
    }
}

fn library_file_matches(file_name: &str, name: &str) -> bool {
    let so = format!("lib{}.so", name);
    let versioned = file_name
        .strip_prefix(&so)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|version| {
            !version.is_empty() && version.chars().all(|c| c.is_ascii_digit() || c == '.')
        });
    file_name == so
        || versioned
        || file_name == format!("lib{}.dylib", name)
        || file_name.eq_ignore_ascii_case(&format!("{}.dll", name))
}

/// File names handed to the loader for `name`, most specific platform name first.
fn loader_candidates(name: &str) -> Vec<OsString> {
    let mut candidates = vec![libloading::library_filename(name)];
    if cfg!(all(unix, not(target_os = "macos"))) {
        candidates.extend(
            (0..=MAX_SONAME_VERSION)
                .map(|version| OsString::from(format!("lib{}.so.{}", name, version))),
        );
    }
    candidates
}

/// Open and close `name` through the system loader.
#[allow(unsafe_code)]
fn loader_provides(name: &str) -> bool {
    // Bare library names only: a path would bypass the loader search
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') {
        return false;
    }
    loader_candidates(name).iter().any(|candidate| {
        // SAFETY: opening runs the library's initializers; dependencies are
        // vendor runtimes the drivers would load anyway.
        match unsafe { libloading::Library::new(candidate) } {
            Ok(library) => {
                debug!(dependency = name, file = ?candidate, "library opened by the loader");
                drop(library);
                true
            }
            Err(_) => false,
        }
    })
}

impl DependencyResolver for SharedLibraries {
    fn resolve(&self, name: &str) -> bool {
        self.dirs.iter().any(|dir| Self::dir_provides(dir, name))
            || (self.use_loader && loader_provides(name))
    }
}

/// Resolves a name if any of the inner resolvers does.
#[derive(Default)]
pub struct AnyOf {
    resolvers: Vec<Box<dyn DependencyResolver>>,
}

impl AnyOf {
    /// Create an empty chain (resolves nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver to the chain.
    pub fn with(mut self, resolver: impl DependencyResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl DependencyResolver for AnyOf {
    fn resolve(&self, name: &str) -> bool {
        self.resolvers.iter().any(|r| r.resolve(name))
    }
}

static PROCESS_RESOLVER: OnceCell<Box<dyn DependencyResolver>> = OnceCell::new();

/// Install the process-wide resolver used by [`CapabilityGate::outcome`].
///
/// Must happen before the first gate is evaluated through the process
/// resolver; a second installation is rejected.
pub fn install_resolver(resolver: impl DependencyResolver + 'static) -> HalResult<()> {
    PROCESS_RESOLVER
        .set(Box::new(resolver))
        .map_err(|_| HalError::Configuration("dependency resolver already installed".into()))
}

/// The process-wide resolver, defaulting to [`SharedLibraries::from_env`].
pub fn process_resolver() -> &'static dyn DependencyResolver {
    PROCESS_RESOLVER
        .get_or_init(|| Box::new(SharedLibraries::from_env()))
        .as_ref()
}

// =============================================================================
// Capability Gate
// =============================================================================

/// Result of evaluating a capability gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every dependency resolved.
    Enabled,
    /// At least one dependency is missing; construction is blocked.
    Disabled {
        /// Unresolved dependencies, in declaration order.
        missing: Vec<String>,
    },
    /// The gate declares no dependency at all.
    Malformed,
}

impl GateOutcome {
    /// True for [`GateOutcome::Enabled`].
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// One-time dependency check attached to a driver type.
///
/// Declare it as a `static` so the outcome is shared by every construction
/// attempt of the type.
pub struct CapabilityGate {
    class: &'static str,
    requires: &'static [&'static str],
    outcome: OnceCell<GateOutcome>,
}

impl CapabilityGate {
    /// Declare a gate for `class` requiring every name in `requires`.
    pub const fn new(class: &'static str, requires: &'static [&'static str]) -> Self {
        Self {
            class,
            requires,
            outcome: OnceCell::new(),
        }
    }

    /// Name of the gated type.
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Declared dependencies.
    pub fn requires(&self) -> &'static [&'static str] {
        self.requires
    }

    /// True once the outcome has been computed.
    pub fn is_evaluated(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Outcome using the process-wide resolver.
    pub fn outcome(&self) -> &GateOutcome {
        self.evaluate_with(process_resolver())
    }

    /// Outcome using `resolver` if the gate has not been evaluated yet.
    ///
    /// The first evaluation wins: once computed, the outcome is returned as is
    /// and `resolver` is not consulted.
    pub fn evaluate_with(&self, resolver: &dyn DependencyResolver) -> &GateOutcome {
        self.outcome.get_or_init(|| self.resolve_outcome(resolver))
    }

    fn resolve_outcome(&self, resolver: &dyn DependencyResolver) -> GateOutcome {
        if self.requires.is_empty() {
            warn!(class = self.class, "capability gate declared without dependencies");
            return GateOutcome::Malformed;
        }

        let missing: Vec<String> = self
            .requires
            .iter()
            .filter(|dep| {
                let found = resolver.resolve(dep);
                debug!(class = self.class, dependency = **dep, found, "resolved optional dependency");
                !found
            })
            .map(|dep| dep.to_string())
            .collect();

        if missing.is_empty() {
            GateOutcome::Enabled
        } else {
            warn!(
                class = self.class,
                missing = ?missing,
                "optional dependencies unavailable, construction disabled"
            );
            GateOutcome::Disabled { missing }
        }
    }

    /// True if construction is allowed (process-wide resolver).
    pub fn is_enabled(&self) -> bool {
        self.outcome().is_enabled()
    }

    /// Fail unless construction is allowed (process-wide resolver).
    pub fn ensure(&self) -> HalResult<()> {
        self.ensure_with(process_resolver())
    }

    /// Fail unless construction is allowed, evaluating with `resolver` if needed.
    pub fn ensure_with(&self, resolver: &dyn DependencyResolver) -> HalResult<()> {
        match self.evaluate_with(resolver) {
            GateOutcome::Enabled => Ok(()),
            GateOutcome::Disabled { missing } => Err(HalError::MissingDependencies {
                class: self.class.to_string(),
                required: self.requires.iter().map(|d| d.to_string()).collect(),
                missing: missing.clone(),
            }),
            GateOutcome::Malformed => Err(HalError::EmptyRequirement {
                class: self.class.to_string(),
            }),
        }
    }

    /// Run `build` only if the gate is enabled.
    pub fn construct<T>(&self, build: impl FnOnce() -> HalResult<T>) -> HalResult<T> {
        self.ensure()?;
        build()
    }
}

impl std::fmt::Debug for CapabilityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityGate")
            .field("class", &self.class)
            .field("requires", &self.requires)
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

/// Types whose construction is guarded by a [`CapabilityGate`].
///
/// Implement it with [`requires_dependencies!`](crate::requires_dependencies)
/// and start every constructor with `Self::ensure_available()?`.
pub trait Gated {
    /// The gate shared by every instance of the type.
    fn gate() -> &'static CapabilityGate;

    /// Fail unless the type's dependencies resolved.
    fn ensure_available() -> HalResult<()> {
        Self::gate().ensure()
    }
}

/// Declare the optional dependencies of a type and implement [`Gated`] for it.
///
/// ```rust
/// use hal_core::gate::Gated;
/// use hal_core::{requires_dependencies, HalResult};
///
/// pub struct KeysightDac;
/// requires_dependencies!(KeysightDac, "visa", "keysight_sdk");
///
/// impl KeysightDac {
///     pub fn new() -> HalResult<Self> {
///         Self::ensure_available()?;
///         Ok(Self)
///     }
/// }
///
/// assert_eq!(KeysightDac::gate().requires(), &["visa", "keysight_sdk"]);
/// ```
#[macro_export]
macro_rules! requires_dependencies {
    ($ty:ident, $($dep:literal),+ $(,)?) => {
        impl $crate::gate::Gated for $ty {
            fn gate() -> &'static $crate::gate::CapabilityGate {
                static GATE: $crate::gate::CapabilityGate =
                    $crate::gate::CapabilityGate::new(stringify!($ty), &[$($dep),+]);
                &GATE
            }
        }
    };
}
