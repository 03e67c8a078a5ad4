use super::Containers;
use crate::{registry::props, Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

wrapper! {
    /// A template for rolling out pods, with triggers that start new deployments
    DeploymentConfig
}

impl Containers for DeploymentConfig {}

impl DeploymentConfig {
    /// Desired number of replicas
    pub fn replicas(&self) -> Result<Option<i64>> {
        self.core.int(props::REPLICAS)
    }

    /// Change the desired number of replicas
    ///
    /// Negative counts are rejected with [`Error::InvalidValue`].
    pub fn set_replicas(&mut self, replicas: i64) -> Result<()> {
        if replicas < 0 {
            return Err(Error::InvalidValue {
                property: props::REPLICAS.into(),
                reason: format!("replica count must not be negative, got {replicas}"),
            });
        }
        self.core.set(props::REPLICAS, replicas)
    }

    /// Labels selecting the pods this configuration manages
    pub fn selector(&self) -> Result<BTreeMap<String, String>> {
        self.core.string_map(props::SELECTOR)
    }

    /// Replace the selector
    pub fn set_selector(&mut self, selector: BTreeMap<String, String>) -> Result<()> {
        self.core.set(props::SELECTOR, selector_value(selector))
    }

    /// Labels put on the pods of the template
    pub fn template_labels(&self) -> Result<BTreeMap<String, String>> {
        self.core.string_map(props::TEMPLATE_LABELS)
    }

    /// Revision of the latest deployment
    pub fn latest_version(&self) -> Result<Option<i64>> {
        self.core.int(props::LATEST_VERSION)
    }

    /// Types of the configured triggers, e.g. `ConfigChange` or `ImageChange`
    pub fn triggers(&self) -> Result<Vec<String>> {
        let list = self.core.document().as_list(self.core.path(props::TRIGGERS)?);
        Ok(list
            .iter()
            .filter_map(|t| t.get("type").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

pub(crate) fn selector_value(selector: BTreeMap<String, String>) -> Value {
    Value::Object(selector.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}

#[cfg(test)]
mod tests {
    use super::DeploymentConfig;
    use crate::{kinds::fixtures::core, resource::KindResource, Error};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn legacy() -> DeploymentConfig {
        DeploymentConfig::from_core(core(json!({
            "kind": "DeploymentConfig",
            "apiVersion": "v1beta3",
            "metadata": {"name": "frontend"},
            "triggers": [{"type": "ConfigChange"}, {"type": "ImageChange", "imageChangeParams": {}}],
            "template": {"controllerTemplate": {
                "replicas": 2,
                "replicaSelector": {"name": "frontend"},
                "template": {"metadata": {"labels": {"name": "frontend", "tier": "web"}}}
            }},
            "latestVersion": 4
        })))
    }

    #[test]
    fn reads_versioned_paths() {
        let dc = legacy();
        assert_eq!(dc.replicas().unwrap(), Some(2));
        assert_eq!(dc.selector().unwrap()["name"], "frontend");
        assert_eq!(dc.template_labels().unwrap().len(), 2);
        assert_eq!(dc.latest_version().unwrap(), Some(4));
        assert_eq!(dc.triggers().unwrap(), ["ConfigChange", "ImageChange"]);
    }

    #[test]
    fn replicas_must_not_be_negative() {
        let mut dc = legacy();
        let err = dc.set_replicas(-1).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
        assert_eq!(dc.replicas().unwrap(), Some(2));

        dc.set_replicas(0).unwrap();
        assert_eq!(dc.replicas().unwrap(), Some(0));
    }

    #[test]
    fn writes_current_shape() {
        let mut dc = DeploymentConfig::from_core(core(json!({"kind": "DeploymentConfig", "apiVersion": "v1"})));
        dc.set_replicas(3).unwrap();
        dc.set_selector(BTreeMap::from([("app".to_string(), "web".to_string())])).unwrap();
        assert_eq!(dc.core.document().root()["spec"], json!({"replicas": 3, "selector": {"app": "web"}}));
    }
}
