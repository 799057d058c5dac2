//! fieldwise — fill configuration structs from an ordered chain of providers.
//!
//! Declare a struct with [`configurable!`], pick providers (flags, environment,
//! `default` tags, JSON/YAML/TOML files, or your own), and let a
//! [`Configurator`] walk the struct: every leaf field goes to the providers in
//! order until one claims it.
//!
//! ```
//! use fieldwise::{configurable, providers, Configurator, DefaultProvider, Env, EnvProvider};
//!
//! configurable! {
//!     #[derive(Debug, Default)]
//!     pub struct Service {
//!         pub name: String => [env = "NAME", default = "svc"],
//!         pub port: u16 => [env = "PORT", default = "8080"],
//!         pub db: Database,
//!     }
//! }
//!
//! configurable! {
//!     #[derive(Debug, Default)]
//!     pub struct Database {
//!         pub host: String => [env = "DB_HOST", default = "localhost"],
//!     }
//! }
//!
//! let env = Env::from_vars([("PORT", "9000")]);
//! let mut service = Service::default();
//! Configurator::new(&mut service, providers![EnvProvider::with_env(env), DefaultProvider])?
//!     .disable_logging()
//!     .init_values()?;
//!
//! assert_eq!(service.name, "svc");
//! assert_eq!(service.port, 9000);
//! assert_eq!(service.db.host, "localhost");
//! # Ok::<(), fieldwise::ConfigError>(())
//! ```

pub mod configurator;
pub mod constants;
pub mod env;
pub mod error;
pub mod field;
pub mod providers;

pub use configurator::{describe, Configurator, FailPolicy, LeafField, Logger, Settings};
pub use env::{Env, Lookup};
pub use error::{ConfigError, FieldError, ValueError};
pub use field::{Configurable, Field, FieldMeta, FieldPath, Tags, Value};
pub use providers::{
    from_fn, DefaultProvider, EnvProvider, FileProvider, FlagProvider, Format, Provided, Provider,
};
