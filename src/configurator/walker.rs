//! Depth-first walk over a configurable struct.
//!
//! Fields are visited pre-order, in declaration order at every level. Nested
//! structs are walked in place, optional structs are allocated first, and
//! every leaf is offered to the providers in order until one claims it.

use std::ops::ControlFlow;

use crate::error::FieldError;
use crate::field::{Configurable, FieldMeta, FieldMut, FieldPath, FieldVisitor, Value};
use crate::providers::{Provided, Provider};

use super::settings::{FailPolicy, Settings};

pub(crate) struct Walker<'c> {
    providers: &'c [Box<dyn Provider>],
    settings: &'c Settings,
    path: FieldPath,
    errors: Vec<FieldError>,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(providers: &'c [Box<dyn Provider>], settings: &'c Settings) -> Self {
        Self {
            providers,
            settings,
            path: FieldPath::new(),
            errors: Vec::new(),
        }
    }

    /// Walk `target` and return the fields that could not be set.
    pub(crate) fn run(mut self, target: &mut dyn Configurable) -> Vec<FieldError> {
        // Break only means the fail policy stopped the walk; the error is already recorded.
        let _ = target.visit_fields(&mut self);
        self.errors
    }

    fn apply_providers(&mut self, meta: &'static FieldMeta, value: &mut dyn Value) -> ControlFlow<()> {
        self.settings
            .log(format_args!("configurator: current path: {}", self.path));

        let providers = self.providers;
        for provider in providers {
            match provider.provide(meta, value, &self.path) {
                Provided::Claimed => {
                    self.settings.log(format_args!(""));
                    return ControlFlow::Continue(());
                }
                Provided::NotApplicable => {}
                Provided::Failed(source) => {
                    self.settings.log(format_args!(
                        "configurator: field [{}] with tags [{}] rejected by {}: {source}",
                        meta.name,
                        meta.tags,
                        provider.name()
                    ));
                    return self.fail(FieldError::Invalid {
                        path: self.path.clone(),
                        tags: meta.tags,
                        provider: provider.name().to_string(),
                        source,
                    });
                }
            }
        }

        self.settings.log(format_args!(
            "configurator: field [{}] with tags [{}] cannot be set!",
            meta.name, meta.tags
        ));
        self.fail(FieldError::Unset {
            path: self.path.clone(),
            tags: meta.tags,
        })
    }

    fn fail(&mut self, error: FieldError) -> ControlFlow<()> {
        self.errors.push(error);
        match self.settings.fail_policy {
            FailPolicy::FailFast => ControlFlow::Break(()),
            FailPolicy::Collect => ControlFlow::Continue(()),
        }
    }
}

impl FieldVisitor for Walker<'_> {
    fn visit(&mut self, meta: &'static FieldMeta, field: FieldMut<'_>) -> ControlFlow<()> {
        self.path.push(meta.name);
        let flow = match field {
            FieldMut::Struct(inner) => inner.visit_fields(self),
            FieldMut::OptionalStruct(slot) => slot.allocate().visit_fields(self),
            FieldMut::Leaf(value) => self.apply_providers(meta, value),
        };
        self.path.pop();
        flow
    }
}

/// One leaf field of a configurable struct, as found by [`describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafField {
    pub path: FieldPath,
    pub meta: &'static FieldMeta,
    pub value_type: &'static str,
    pub switch: bool,
}

/// List every leaf of `target` in walk order without consulting any provider.
///
/// Optional structs are allocated along the way so their fields are listed
/// too; describe a throwaway default instance when that matters.
pub fn describe(target: &mut dyn Configurable) -> Vec<LeafField> {
    let mut describer = Describer::default();
    let _ = target.visit_fields(&mut describer);
    describer.leaves
}

#[derive(Default)]
struct Describer {
    path: FieldPath,
    leaves: Vec<LeafField>,
}

impl FieldVisitor for Describer {
    fn visit(&mut self, meta: &'static FieldMeta, field: FieldMut<'_>) -> ControlFlow<()> {
        self.path.push(meta.name);
        match field {
            FieldMut::Struct(inner) => {
                let _ = inner.visit_fields(self);
            }
            FieldMut::OptionalStruct(slot) => {
                let _ = slot.allocate().visit_fields(self);
            }
            FieldMut::Leaf(value) => self.leaves.push(LeafField {
                path: self.path.clone(),
                meta,
                value_type: value.value_type(),
                switch: value.is_switch(),
            }),
        }
        self.path.pop();
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::configurable! {
        #[derive(Debug, Default)]
        struct App {
            name: String => [env = "NAME"],
            verbose: bool,
            db: Db,
            cache: Option<Box<Db>>,
        }
    }

    crate::configurable! {
        #[derive(Debug, Default)]
        struct Db {
            host: String,
        }
    }

    #[test]
    fn describe_lists_leaves_in_walk_order() {
        let leaves = describe(&mut App::default());
        let paths: Vec<String> = leaves.iter().map(|leaf| leaf.path.to_string()).collect();
        assert_eq!(paths, vec!["name", "verbose", "db.host", "cache.host"]);
        assert_eq!(leaves[0].meta.tags.get("env"), Some("NAME"));
        assert_eq!(leaves[0].value_type, "String");
        assert!(leaves[1].switch);
        assert!(!leaves[2].switch);
    }

    #[test]
    fn describe_allocates_optional_structs() {
        let mut app = App::default();
        assert!(app.cache.is_none());
        describe(&mut app);
        assert!(app.cache.is_some());
    }

    #[test]
    fn fail_fast_stops_after_first_error() {
        let providers: Vec<Box<dyn Provider>> = vec![Box::new(crate::providers::from_fn(
            "never",
            |_: &FieldMeta, _: &mut dyn Value, _: &FieldPath| Provided::NotApplicable,
        ))];
        let settings = Settings {
            logging: false,
            ..Settings::default()
        };
        let errors = Walker::new(&providers, &settings).run(&mut App::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path().to_string(), "name");
    }

    #[test]
    fn collect_reports_every_field() {
        let providers: Vec<Box<dyn Provider>> = vec![Box::new(crate::providers::from_fn(
            "never",
            |_: &FieldMeta, _: &mut dyn Value, _: &FieldPath| Provided::NotApplicable,
        ))];
        let settings = Settings {
            logging: false,
            fail_policy: FailPolicy::Collect,
            ..Settings::default()
        };
        let errors = Walker::new(&providers, &settings).run(&mut App::default());
        let paths: Vec<String> = errors.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["name", "verbose", "db.host", "cache.host"]);
    }
}
