use crate::{registry::props, resource::Resource, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A container inside a pod template
///
/// Fields this crate does not model are kept in `extra` and written back untouched.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Name, unique within the pod
    pub name: String,

    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Exposed ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,

    /// Environment variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    /// Everything else
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Container {
    /// A container running `image`
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: Some(image.into()),
            ..Default::default()
        }
    }

    /// Expose a port
    #[must_use]
    pub fn with_port(mut self, port: i64, protocol: &str) -> Self {
        self.ports.push(ContainerPort {
            container_port: port,
            protocol: Some(protocol.to_string()),
            name: None,
        });
        self
    }

    /// Set an environment variable
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvVar {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }
}

/// A port exposed by a [`Container`]
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port number inside the container
    pub container_port: i64,
    /// `TCP` or `UDP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Optional port name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An environment variable of a [`Container`]
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvVar {
    /// Variable name
    pub name: String,
    /// Literal value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Container list management for kinds that carry a pod template
pub trait Containers: Resource {
    /// Containers in declaration order
    ///
    /// Entries that do not look like containers are skipped.
    fn containers(&self) -> Result<Vec<Container>> {
        let core = self.core();
        let list = core.document().as_list(core.path(props::CONTAINERS)?);
        Ok(list
            .iter()
            .filter_map(|v| match Container::deserialize(v) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!("skipping malformed container in {} {}: {e}", core.kind(), v);
                    None
                }
            })
            .collect())
    }

    /// The container called `name`
    fn container(&self, name: &str) -> Result<Option<Container>> {
        Ok(self.containers()?.into_iter().find(|c| c.name == name))
    }

    /// Add a container, replacing any container of the same name in place
    fn add_container(&mut self, container: Container) -> Result<()> {
        if container.name.is_empty() {
            return Err(Error::InvalidValue {
                property: props::CONTAINERS.into(),
                reason: "container name must not be empty".into(),
            });
        }
        let value = serde_json::to_value(&container).map_err(Error::SerdeError)?;
        let mut list = self.core().document().as_list(self.core().path(props::CONTAINERS)?).to_vec();
        match list.iter().position(|v| v.get("name").and_then(Value::as_str) == Some(container.name.as_str())) {
            Some(pos) => list[pos] = value,
            None => list.push(value),
        }
        self.core_mut().set(props::CONTAINERS, list)
    }

    /// Remove the container called `name`, reporting whether it existed
    fn remove_container(&mut self, name: &str) -> Result<bool> {
        let mut list = self.core().document().as_list(self.core().path(props::CONTAINERS)?).to_vec();
        let before = list.len();
        list.retain(|v| v.get("name").and_then(Value::as_str) != Some(name));
        if list.len() == before {
            return Ok(false);
        }
        self.core_mut().set(props::CONTAINERS, list)?;
        Ok(true)
    }

    /// Images referenced by the containers, in declaration order
    fn images(&self) -> Result<Vec<String>> {
        Ok(self.containers()?.into_iter().filter_map(|c| c.image).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Container, Containers};
    use crate::{
        kinds::fixtures::core,
        resource::{KindResource, Resource},
        DeploymentConfig, Pod,
    };
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn unknown_container_fields_survive() {
        let pod = Pod::from_core(core(json!({
            "kind": "Pod",
            "apiVersion": "v1",
            "spec": {"containers": [
                {"name": "web", "image": "nginx:1.7", "imagePullPolicy": "Always"},
                "garbage"
            ]}
        })));
        let containers = pod.containers().unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].extra["imagePullPolicy"], "Always");
        assert_json_eq!(
            serde_json::to_value(&containers[0]).unwrap(),
            json!({"name": "web", "image": "nginx:1.7", "imagePullPolicy": "Always"})
        );
    }

    #[test]
    fn add_replaces_by_name_and_remove_reports() {
        let mut dc = DeploymentConfig::from_core(core(json!({"kind": "DeploymentConfig", "apiVersion": "v1"})));
        dc.add_container(Container::new("web", "nginx:1.7").with_port(8080, "TCP")).unwrap();
        dc.add_container(Container::new("cache", "redis:3")).unwrap();
        dc.add_container(Container::new("web", "nginx:1.9")).unwrap();
        assert_eq!(dc.images().unwrap(), ["nginx:1.9", "redis:3"]);
        assert!(dc.container("web").unwrap().unwrap().ports.is_empty());

        assert!(dc.remove_container("cache").unwrap());
        assert!(!dc.remove_container("cache").unwrap());
        assert_eq!(dc.containers().unwrap().len(), 1);
        assert!(dc.add_container(Container::default()).is_err());
    }

    #[test]
    fn legacy_pod_manifest() {
        let mut pod = Pod::from_core(core(json!({"kind": "Pod", "apiVersion": "v1beta1", "id": "p"})));
        pod.add_container(Container::new("web", "nginx").with_env("MODE", "prod")).unwrap();
        assert_json_eq!(
            pod.core().document().root()["desiredState"],
            json!({"manifest": {"containers": [{"name": "web", "image": "nginx", "env": [{"name": "MODE", "value": "prod"}]}]}})
        );
    }
}
