use super::deployment_config::selector_value;
use crate::{registry::props, Error, Result};
use std::collections::BTreeMap;

wrapper! {
    /// A stable address load balancing over the pods matching a selector
    Service
}

impl Service {
    /// Port the service listens on
    pub fn port(&self) -> Result<Option<i64>> {
        self.core.int(props::PORT)
    }

    /// Change the port the service listens on
    pub fn set_port(&mut self, port: i64) -> Result<()> {
        if !(1..=65535).contains(&port) {
            return Err(Error::InvalidValue {
                property: props::PORT.into(),
                reason: format!("{port} is not a valid port"),
            });
        }
        self.core.set(props::PORT, port)
    }

    /// Port on the pods that traffic is forwarded to
    ///
    /// May name a container port instead of numbering it.
    pub fn target_port(&self) -> Result<Option<String>> {
        Ok(self.core.get(props::TARGET_PORT)?.and_then(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }

    /// Labels selecting the backing pods
    pub fn selector(&self) -> Result<BTreeMap<String, String>> {
        self.core.string_map(props::SELECTOR)
    }

    /// Replace the selector
    pub fn set_selector(&mut self, selector: BTreeMap<String, String>) -> Result<()> {
        self.core.set(props::SELECTOR, selector_value(selector))
    }

    /// Address assigned inside the cluster
    pub fn cluster_ip(&self) -> Result<Option<String>> {
        self.core.string(props::CLUSTER_IP)
    }
}
