// SPDX-License-Identifier: MPL-2.0
//! Toast registry: the fixed name → component mapping of a toast stack.
//!
//! A registry is built once, when the application is configured, and never
//! changes afterwards. Either use [`create_toast_stack`] with a list of
//! entries or the [`RegistryBuilder`].

use super::component::ToastComponent;
use super::options::ToastOptions;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// One configuration entry.
pub enum ToastEntry<M> {
    /// A bare component.
    Component(ToastComponent<M>),
    /// A component with entry-level options. A missing component is a
    /// configuration error.
    Configured {
        component: Option<ToastComponent<M>>,
        options: ToastOptions,
    },
}

impl<M> From<ToastComponent<M>> for ToastEntry<M> {
    fn from(component: ToastComponent<M>) -> Self {
        ToastEntry::Component(component)
    }
}

/// A registered toast.
pub struct ToastDefinition<M> {
    name: String,
    index: usize,
    component: ToastComponent<M>,
    options: Option<ToastOptions>,
}

impl<M> ToastDefinition<M> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the entry in the configuration.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn component(&self) -> &ToastComponent<M> {
        &self.component
    }

    /// Entry-level options.
    #[must_use]
    pub fn options(&self) -> Option<&ToastOptions> {
        self.options.as_ref()
    }
}

impl<M> fmt::Debug for ToastDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastDefinition")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("component", &self.component)
            .field("options", &self.options)
            .finish()
    }
}

/// The immutable set of toasts an application can open.
pub struct Registry<M> {
    names: Vec<String>,
    definitions: Vec<ToastDefinition<M>>,
    default_options: ToastOptions,
}

impl<M> Registry<M> {
    #[must_use]
    pub fn builder() -> RegistryBuilder<M> {
        RegistryBuilder::new()
    }

    /// Registered names, in configuration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn definitions(&self) -> &[ToastDefinition<M>] {
        &self.definitions
    }

    /// Built-in defaults overlaid with the caller's defaults.
    #[must_use]
    pub fn default_options(&self) -> &ToastOptions {
        &self.default_options
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|registered| registered == name)
    }

    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&ToastDefinition<M>> {
        self.definitions.iter().find(|definition| definition.name == name)
    }

    /// Validates `name`, failing with [`Error::UnknownName`].
    pub fn require(&self, name: &str) -> Result<&ToastDefinition<M>> {
        self.definition(name).ok_or_else(|| Error::UnknownName {
            name: name.to_string(),
            valid: self.names.clone(),
        })
    }
}

impl<M> fmt::Debug for Registry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names)
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

/// Turns a toast configuration into a [`Registry`].
///
/// An empty configuration yields a registry with no names. Fails with
/// [`Error::Configuration`] when a name is empty or repeated, an entry has no
/// component, or an option layer holds out-of-range values.
pub fn create_toast_stack<M, I, N>(
    config: I,
    defaults: Option<ToastOptions>,
) -> Result<Registry<M>>
where
    I: IntoIterator<Item = (N, ToastEntry<M>)>,
    N: Into<String>,
{
    let mut builder = RegistryBuilder::new();
    for (name, entry) in config {
        builder = builder.entry(name, entry);
    }
    if let Some(defaults) = defaults {
        builder = builder.defaults(defaults);
    }
    builder.build()
}

/// Collects registry entries; validation happens in [`RegistryBuilder::build`].
pub struct RegistryBuilder<M> {
    entries: Vec<(String, ToastEntry<M>)>,
    defaults: Option<ToastOptions>,
}

impl<M> Default for RegistryBuilder<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            defaults: None,
        }
    }
}

impl<M> RegistryBuilder<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn toast(self, name: impl Into<String>, component: ToastComponent<M>) -> Self {
        self.entry(name, ToastEntry::Component(component))
    }

    #[must_use]
    pub fn toast_with_options(
        self,
        name: impl Into<String>,
        component: ToastComponent<M>,
        options: ToastOptions,
    ) -> Self {
        self.entry(
            name,
            ToastEntry::Configured {
                component: Some(component),
                options,
            },
        )
    }

    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, entry: ToastEntry<M>) -> Self {
        self.entries.push((name.into(), entry));
        self
    }

    /// Global defaults applied below every entry.
    #[must_use]
    pub fn defaults(mut self, defaults: ToastOptions) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn build(self) -> Result<Registry<M>> {
        let default_options = match self.defaults {
            Some(custom) => {
                custom.validate("the default options")?;
                custom.or(&ToastOptions::builtin())
            }
            None => ToastOptions::builtin(),
        };

        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(self.entries.len());
        let mut definitions = Vec::with_capacity(self.entries.len());

        for (index, (name, entry)) in self.entries.into_iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "toast entry #{index} has an empty name"
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(Error::Configuration(format!(
                    "toast '{name}' is registered more than once"
                )));
            }

            let (component, options) = match entry {
                ToastEntry::Component(component) => (component, None),
                ToastEntry::Configured {
                    component: Some(component),
                    options,
                } => (component, Some(options)),
                ToastEntry::Configured {
                    component: None, ..
                } => {
                    return Err(Error::Configuration(format!(
                        "the component for toast '{name}' must be a valid toast component"
                    )));
                }
            };

            if let Some(options) = component.options() {
                options.validate(&format!("the component options of '{name}'"))?;
            }
            if let Some(options) = &options {
                options.validate(&format!("the options of '{name}'"))?;
            }

            names.push(name.clone());
            definitions.push(ToastDefinition {
                name,
                index,
                component,
                options,
            });
        }

        Ok(Registry {
            names,
            definitions,
            default_options,
        })
    }
}
