//! Static registration table of runnable examples.
//!
//! Examples are registered explicitly at startup under a unique name.
//! Discovery keeps the naming convention: only names starting with the
//! registry prefix (case-insensitive, `"Example"` by default) are listed.
//! Listing order is the byte order of the names, so output is reproducible.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use samplekit_settings::Settings;

use crate::cancellation::CancellationSignal;
use crate::error::{ExampleResult, RegistryError};

/// Default name prefix that marks a registered unit as an example.
pub const DEFAULT_PREFIX: &str = "Example";

type BlockingFn = dyn Fn(&Settings) -> ExampleResult<()> + Send + Sync;
type AsyncFn = dyn Fn(Arc<Settings>) -> BoxFuture<'static, ExampleResult<()>> + Send + Sync;
type CancellableFn = dyn Fn(ExampleContext) -> BoxFuture<'static, ExampleResult<()>> + Send + Sync;

/// Everything a cancellable example receives.
#[derive(Debug, Clone)]
pub struct ExampleContext {
    pub settings: Arc<Settings>,
    pub cancellation: CancellationSignal,
}

impl ExampleContext {
    pub fn new(settings: Arc<Settings>, cancellation: CancellationSignal) -> Self {
        Self {
            settings,
            cancellation,
        }
    }
}

/// The callable shapes an example may take.
#[derive(Clone)]
pub enum EntryPoint {
    /// Synchronous closure, run on the blocking thread pool. The coordinator
    /// stops waiting for it on timeout or cancellation, but the closure
    /// itself always runs to completion.
    Blocking(Arc<BlockingFn>),
    /// Asynchronous, unaware of cancellation.
    Async(Arc<AsyncFn>),
    /// Asynchronous and handed the shared cancellation signal.
    Cancellable(Arc<CancellableFn>),
}

impl EntryPoint {
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn(&Settings) -> ExampleResult<()> + Send + Sync + 'static,
    {
        Self::Blocking(Arc::new(f))
    }

    pub fn asynchronous<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<Settings>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ExampleResult<()>> + Send + 'static,
    {
        Self::Async(Arc::new(move |settings| f(settings).boxed()))
    }

    pub fn cancellable<F, Fut>(f: F) -> Self
    where
        F: Fn(ExampleContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ExampleResult<()>> + Send + 'static,
    {
        Self::Cancellable(Arc::new(move |ctx| f(ctx).boxed()))
    }

    pub fn accepts_cancellation(&self) -> bool {
        matches!(self, Self::Cancellable(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Blocking(_) => "blocking",
            Self::Async(_) => "async",
            Self::Cancellable(_) => "cancellable",
        }
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryPoint::{}", self.kind())
    }
}

/// One registered example.
#[derive(Debug, Clone)]
pub struct ExampleUnit {
    name: String,
    entry: EntryPoint,
}

impl ExampleUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &EntryPoint {
        &self.entry
    }
}

/// Case-insensitive substring selection over example names.
///
/// An absent or empty filter selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    needle: Option<String>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn substring(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        if needle.is_empty() {
            return Self::all();
        }
        Self {
            needle: Some(needle.to_lowercase()),
        }
    }

    /// Build from an optional CLI argument.
    pub fn from_arg(arg: Option<&str>) -> Self {
        arg.map(Self::substring).unwrap_or_default()
    }

    pub fn is_all(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.needle {
            None => f.write_str("*"),
            Some(needle) => f.write_str(needle),
        }
    }
}

/// Registration table of examples, keyed by unique name.
#[derive(Debug, Clone)]
pub struct ExampleRegistry {
    prefix: String,
    units: BTreeMap<String, Arc<ExampleUnit>>,
}

impl Default for ExampleRegistry {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

impl ExampleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that discovers only names starting with `prefix`.
    /// An empty prefix discovers every registered unit.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            units: BTreeMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Add a unit to the table.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        entry: EntryPoint,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.units.contains_key(&name) {
            return Err(RegistryError::DuplicateName { name });
        }
        let unit = Arc::new(ExampleUnit {
            name: name.clone(),
            entry,
        });
        self.units.insert(name, unit);
        Ok(self)
    }

    /// Every discoverable example, ordered by name.
    pub fn list_all(&self) -> Vec<Arc<ExampleUnit>> {
        self.units
            .values()
            .filter(|unit| self.is_discoverable(unit.name()))
            .cloned()
            .collect()
    }

    /// Exact-name lookup among discoverable examples.
    pub fn get(&self, name: &str) -> Option<Arc<ExampleUnit>> {
        self.units
            .get(name)
            .filter(|unit| self.is_discoverable(unit.name()))
            .cloned()
    }

    /// Discoverable examples matching `filter`, in listing order.
    pub fn select(&self, filter: &Filter) -> Vec<Arc<ExampleUnit>> {
        self.list_all()
            .into_iter()
            .filter(|unit| filter.matches(unit.name()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.list_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_discoverable(&self, name: &str) -> bool {
        name.get(..self.prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.prefix))
    }
}
