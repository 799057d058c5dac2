//! The configurator: binds a target struct to an ordered provider chain.

pub mod settings;
mod walker;

use std::fmt;

use crate::error::ConfigError;
use crate::field::{Configurable, Field, FieldMut};
use crate::providers::Provider;

pub use settings::{FailPolicy, Logger, Settings};
pub use walker::{describe, LeafField};

/// Box a list of providers for [`Configurator::new`].
///
/// ```
/// use fieldwise::{providers, DefaultProvider, EnvProvider};
///
/// let chain = providers![EnvProvider::new(), DefaultProvider];
/// assert_eq!(chain.len(), 2);
/// ```
#[macro_export]
macro_rules! providers {
    ($($provider:expr),* $(,)?) => {
        ::std::vec![$(::std::boxed::Box::new($provider) as ::std::boxed::Box<dyn $crate::Provider>),*]
    };
}

/// Populates a struct from an ordered chain of providers.
///
/// Providers are offered each leaf field in the order they were given; the
/// first one to claim a field wins.
pub struct Configurator<'a> {
    target: &'a mut dyn Configurable,
    providers: Vec<Box<dyn Provider>>,
    settings: Settings,
}

impl<'a> Configurator<'a> {
    /// Bind `target` to `providers` with default [`Settings`].
    ///
    /// Fails if `providers` is empty or `target` is not a configurable struct.
    pub fn new(
        target: &'a mut dyn Field,
        providers: impl IntoIterator<Item = Box<dyn Provider>>,
    ) -> Result<Self, ConfigError> {
        let providers: Vec<_> = providers.into_iter().collect();
        if providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }

        let type_name = target.type_name();
        let FieldMut::Struct(target) = target.as_field_mut() else {
            return Err(ConfigError::NotAStruct { type_name });
        };

        Ok(Self {
            target,
            providers,
            settings: Settings::default(),
        })
    }

    /// Replace the diagnostic logger.
    pub fn set_logger(mut self, logger: impl Fn(fmt::Arguments<'_>) + Send + Sync + 'static) -> Self {
        self.settings.logger = Logger::new(logger);
        self
    }

    /// Suppress all diagnostic output.
    pub fn disable_logging(mut self) -> Self {
        self.settings.logging = false;
        self
    }

    /// Keep walking past fields that cannot be set and report them all at the end.
    pub fn ignore_errors(mut self) -> Self {
        self.settings.fail_policy = FailPolicy::Collect;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|provider| provider.name())
    }

    /// Walk the target and fill every leaf field from the provider chain.
    ///
    /// Fields set before a failure keep their new values. Under the default
    /// fail-fast policy the error holds the single field that stopped the
    /// walk; after [`ignore_errors`](Self::ignore_errors) it holds every
    /// field that was left untouched.
    pub fn init_values(&mut self) -> Result<(), ConfigError> {
        let errors = walker::Walker::new(&self.providers, &self.settings).run(&mut *self.target);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Unresolved(errors))
        }
    }
}

impl fmt::Debug for Configurator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configurator")
            .field("target", &self.target.struct_name())
            .field("providers", &self.providers().collect::<Vec<_>>())
            .field("settings", &self.settings)
            .finish()
    }
}
