//! Command line flags declared with the `flag` tag.
//!
//! The tag reads `name|default|usage`; only the name is required. Flags are
//! collected from a probe instance of the target type, turned into a
//! `clap::Command` and parsed once when the provider is built.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use crate::configurator::{describe, LeafField};
use crate::constants::{FLAG_PART_SEPARATOR, TAG_FLAG};
use crate::error::ConfigError;
use crate::field::{Configurable, FieldMeta, FieldPath, Value};

use super::{Provided, Provider};

const HELP_FLAG: &str = "help";

/// Parsed `flag` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: &'static str,
    pub default: Option<&'static str>,
    pub usage: &'static str,
}

impl FlagSpec {
    pub fn parse(tag: &'static str) -> Self {
        let mut parts = tag.splitn(3, FLAG_PART_SEPARATOR);
        let name = parts.next().unwrap_or_default().trim();
        let default = parts.next().filter(|d| !d.is_empty());
        let usage = parts.next().unwrap_or_default();
        Self {
            name,
            default,
            usage,
        }
    }

    fn of(field: &FieldMeta) -> Option<Self> {
        field
            .tags
            .get(TAG_FLAG)
            .map(Self::parse)
            .filter(|spec| !spec.name.is_empty())
    }
}

/// Sets fields from parsed command line flags.
#[derive(Debug, Clone, Default)]
pub struct FlagProvider {
    values: HashMap<&'static str, String>,
}

impl FlagProvider {
    /// Register the flags of `T` and parse the process arguments.
    ///
    /// `--help` and `--version` surface as [`ConfigError::Flags`]; call
    /// `exit()` on the inner `clap::Error` to print them.
    pub fn for_type<T: Configurable + Default>() -> Result<Self, ConfigError> {
        Self::from_args::<T, _, _>(std::env::args_os())
    }

    /// Register the flags of `T` and parse `args` (the first item is the binary name).
    pub fn from_args<T, I, A>(args: I) -> Result<Self, ConfigError>
    where
        T: Configurable + Default,
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        let mut probe = T::default();
        let leaves = describe(&mut probe);
        let command = Self::command(probe.struct_name(), &leaves);
        let matches = command.try_get_matches_from(args)?;

        let values = flag_specs(&leaves)
            .filter_map(|(spec, _)| {
                matches
                    .get_one::<String>(spec.name)
                    .map(|raw| (spec.name, raw.clone()))
            })
            .collect();
        Ok(Self { values })
    }

    /// The `clap::Command` describing every flag found in `leaves`.
    ///
    /// A field flagged `help` replaces clap's generated `--help`.
    pub fn command(name: &'static str, leaves: &[LeafField]) -> Command {
        let claims_help = flag_specs(leaves).any(|(spec, _)| spec.name == HELP_FLAG);
        let command = Command::new(name).disable_help_flag(claims_help);
        flag_specs(leaves).fold(command, |command, (spec, leaf)| {
            let mut arg = Arg::new(spec.name)
                .long(spec.name)
                .help(spec.usage)
                .action(ArgAction::Set);
            if leaf.switch {
                arg = arg.num_args(0..=1).default_missing_value("true");
            }
            command.arg(arg)
        })
    }

    /// Raw value passed for a flag, if it was on the command line.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Flag specs of `leaves`, first declaration wins for repeated names.
fn flag_specs(leaves: &[LeafField]) -> impl Iterator<Item = (FlagSpec, &LeafField)> {
    let mut seen = Vec::new();
    leaves.iter().filter_map(move |leaf| {
        let spec = FlagSpec::of(leaf.meta)?;
        if seen.contains(&spec.name) {
            return None;
        }
        seen.push(spec.name);
        Some((spec, leaf))
    })
}

impl Provider for FlagProvider {
    fn name(&self) -> &str {
        "flag"
    }

    fn provide(&self, field: &FieldMeta, value: &mut dyn Value, _path: &FieldPath) -> Provided {
        let Some(spec) = FlagSpec::of(field) else {
            return Provided::NotApplicable;
        };
        match (self.value(spec.name), spec.default) {
            (Some(raw), _) => value.set_str(raw).into(),
            (None, Some(default)) => value.set_str(default).into(),
            (None, None) => Provided::NotApplicable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::configurable! {
        #[derive(Debug, Default)]
        struct Cli {
            port: u16 => [flag = "port|8080|listen port"],
            host: String => [flag = "host||bind address"],
            verbose: bool => [flag = "verbose"],
            again: u16 => [flag = "port"],
            untagged: String,
        }
    }

    fn meta_of(name: &str) -> &'static FieldMeta {
        describe(&mut Cli::default())
            .into_iter()
            .find(|leaf| leaf.meta.name == name)
            .map(|leaf| leaf.meta)
            .unwrap()
    }

    #[test]
    fn parses_tag_parts() {
        assert_eq!(
            FlagSpec::parse("port|8080|listen port"),
            FlagSpec {
                name: "port",
                default: Some("8080"),
                usage: "listen port"
            }
        );
        assert_eq!(
            FlagSpec::parse("host||bind|address"),
            FlagSpec {
                name: "host",
                default: None,
                usage: "bind|address"
            }
        );
        assert_eq!(FlagSpec::parse("quiet").default, None);
    }

    #[test]
    fn passed_flags_are_claimed() {
        let provider =
            FlagProvider::from_args::<Cli, _, _>(["app", "--port", "9000", "--host=0.0.0.0", "--verbose"])
                .unwrap();
        let path = FieldPath::new();

        let mut port = 0u16;
        assert_eq!(provider.provide(meta_of("port"), &mut port, &path), Provided::Claimed);
        assert_eq!(port, 9000);

        let mut host = String::new();
        assert!(provider.provide(meta_of("host"), &mut host, &path).is_claimed());
        assert_eq!(host, "0.0.0.0");

        let mut verbose = false;
        assert!(provider.provide(meta_of("verbose"), &mut verbose, &path).is_claimed());
        assert!(verbose);
    }

    #[test]
    fn absent_flags_fall_back_to_tag_default() {
        let provider = FlagProvider::from_args::<Cli, _, _>(["app"]).unwrap();
        let path = FieldPath::new();

        let mut port = 0u16;
        assert!(provider.provide(meta_of("port"), &mut port, &path).is_claimed());
        assert_eq!(port, 8080);

        let mut host = String::new();
        assert_eq!(
            provider.provide(meta_of("host"), &mut host, &path),
            Provided::NotApplicable
        );
        let mut untagged = String::new();
        assert_eq!(
            provider.provide(meta_of("untagged"), &mut untagged, &path),
            Provided::NotApplicable
        );
    }

    #[test]
    fn repeated_flag_names_share_one_argument() {
        let provider = FlagProvider::from_args::<Cli, _, _>(["app", "--port", "7000"]).unwrap();
        let mut again = 0u16;
        assert!(provider.provide(meta_of("again"), &mut again, &FieldPath::new()).is_claimed());
        assert_eq!(again, 7000);
    }

    #[test]
    fn bad_value_fails() {
        let provider = FlagProvider::from_args::<Cli, _, _>(["app", "--port", "http"]).unwrap();
        let mut port = 0u16;
        assert!(matches!(
            provider.provide(meta_of("port"), &mut port, &FieldPath::new()),
            Provided::Failed(_)
        ));
    }

    #[test]
    fn unknown_flag_is_a_construction_error() {
        let err = FlagProvider::from_args::<Cli, _, _>(["app", "--nope", "1"]).unwrap_err();
        assert!(matches!(err, ConfigError::Flags(_)));
    }

    #[test]
    fn field_may_take_over_help() {
        crate::configurable! {
            #[derive(Debug, Default)]
            struct Usage {
                help: bool => [flag = "help|false|show usage"],
            }
        }
        let meta = describe(&mut Usage::default())[0].meta;

        let absent = FlagProvider::from_args::<Usage, _, _>(["app"]).unwrap();
        let mut help = true;
        assert!(absent.provide(meta, &mut help, &FieldPath::new()).is_claimed());
        assert!(!help);

        let passed = FlagProvider::from_args::<Usage, _, _>(["app", "--help"]).unwrap();
        assert!(passed.provide(meta, &mut help, &FieldPath::new()).is_claimed());
        assert!(help);
    }

    #[test]
    fn command_lists_every_flag_once() {
        let leaves = describe(&mut Cli::default());
        let command = FlagProvider::command("cli", &leaves);
        let names: Vec<_> = command.get_arguments().map(|arg| arg.get_id().as_str()).collect();
        assert_eq!(names, vec!["port", "host", "verbose"]);
    }
}
