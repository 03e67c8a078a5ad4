use super::Containers;
use crate::{registry::props, Result};

wrapper! {
    /// A group of containers scheduled together on one node
    Pod
}

impl Containers for Pod {}

impl Pod {
    /// Address of the pod inside the cluster network
    pub fn ip(&self) -> Result<Option<String>> {
        self.core.string(props::IP)
    }

    /// Node the pod is scheduled on
    pub fn host(&self) -> Result<Option<String>> {
        self.core.string(props::HOST)
    }

    /// Lifecycle phase, e.g. `Running`
    pub fn phase(&self) -> Result<Option<String>> {
        self.core.string(props::PHASE)
    }

    /// Restart policy
    ///
    /// Legacy documents nest the policy as a single-key object (`{"always": {}}`);
    /// the key is reported in that case.
    pub fn restart_policy(&self) -> Result<Option<String>> {
        let Some(node) = self.core.get(props::RESTART_POLICY)? else {
            return Ok(None);
        };
        Ok(match node {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => map.keys().next().cloned(),
            _ => None,
        })
    }
}
