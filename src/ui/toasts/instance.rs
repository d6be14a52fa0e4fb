// SPDX-License-Identifier: MPL-2.0
//! Open toast instances.

use super::component::ToastComponent;
use super::options::EffectiveOptions;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Callback run when an operation completes or an instance closes.
pub type Callback = Rc<dyn Fn()>;

/// Identifier of one open toast, `"{name}_{sequence}"`.
///
/// Sequences come from a per-store counter, so ids never repeat within a
/// store's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(String);

impl InstanceId {
    pub(crate) fn new(name: &str, sequence: u64) -> Self {
        Self(format!("{name}_{sequence:x}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One live occurrence of a registered toast.
pub struct ToastInstance<M> {
    id: InstanceId,
    name: String,
    component: ToastComponent<M>,
    options: EffectiveOptions,
    params: Option<Value>,
    on_close: Option<Callback>,
}

impl<M> ToastInstance<M> {
    pub(crate) fn new(
        id: InstanceId,
        name: String,
        component: ToastComponent<M>,
        options: EffectiveOptions,
        params: Option<Value>,
        on_close: Option<Callback>,
    ) -> Self {
        Self {
            id,
            name,
            component,
            options,
            params,
            on_close,
        }
    }

    #[must_use]
    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn component(&self) -> &ToastComponent<M> {
        &self.component
    }

    /// Options resolved when the toast was opened.
    #[must_use]
    pub fn options(&self) -> &EffectiveOptions {
        &self.options
    }

    #[must_use]
    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    /// Returns the parameter stored under `key`, or `default` when the
    /// params are absent, not an object, or hold `null` for that key.
    #[must_use]
    pub fn get_param(&self, key: &str, default: Option<Value>) -> Option<Value> {
        self.params
            .as_ref()
            .and_then(|params| params.get(key))
            .filter(|value| !value.is_null())
            .cloned()
            .or(default)
    }

    pub(crate) fn on_close(&self) -> Option<&Callback> {
        self.on_close.as_ref()
    }
}

impl<M> fmt::Debug for ToastInstance<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastInstance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("options", &self.options)
            .field("params", &self.params)
            .field("on_close", &self.on_close.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::toasts::options::{resolve, OptionLayers};
    use iced::widget::text;
    use serde_json::json;

    fn instance(params: Option<Value>) -> ToastInstance<()> {
        ToastInstance::new(
            InstanceId::new("Success", 1),
            "Success".to_string(),
            ToastComponent::new(|_props| text("ok").into()),
            resolve(&OptionLayers::default()),
            params,
            None,
        )
    }

    #[test]
    fn instance_ids_embed_name_and_sequence() {
        assert_eq!(InstanceId::new("Success", 26).as_str(), "Success_1a");
        assert_ne!(InstanceId::new("Success", 1), InstanceId::new("Success", 2));
    }

    #[test]
    fn get_param_reads_object_keys() {
        let toast = instance(Some(json!({ "message": "saved", "count": 3 })));
        assert_eq!(toast.get_param("message", None), Some(json!("saved")));
        assert_eq!(toast.get_param("count", Some(json!(0))), Some(json!(3)));
    }

    #[test]
    fn get_param_falls_back_to_default() {
        let toast = instance(Some(json!({ "message": null })));
        assert_eq!(toast.get_param("message", Some(json!("fallback"))), Some(json!("fallback")));
        assert_eq!(toast.get_param("missing", None), None);

        let scalar = instance(Some(json!("ok")));
        assert_eq!(scalar.get_param("message", Some(json!(1))), Some(json!(1)));

        let empty = instance(None);
        assert_eq!(empty.get_param("message", None), None);
    }
}
