use crate::{registry::props, Result};

wrapper! {
    /// A namespace with the annotations the platform shows to users
    Project
}

impl Project {
    /// Name shown in consoles
    pub fn display_name(&self) -> Result<Option<String>> {
        self.core.string(props::DISPLAY_NAME)
    }

    /// Change the name shown in consoles
    pub fn set_display_name(&mut self, name: &str) -> Result<()> {
        self.core.set(props::DISPLAY_NAME, name)
    }

    /// Free text description
    pub fn description(&self) -> Result<Option<String>> {
        self.core.string(props::DESCRIPTION)
    }

    /// Change the description
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.core.set(props::DESCRIPTION, description)
    }
}

wrapper! {
    /// A user known to the platform
    User
}

impl User {
    /// Full name
    pub fn full_name(&self) -> Result<Option<String>> {
        self.core.string(props::FULL_NAME)
    }

    /// Identities mapped to this user, as `provider:name`
    pub fn identities(&self) -> Result<Vec<String>> {
        self.core.strings(props::IDENTITIES)
    }

    /// Groups the user belongs to
    pub fn groups(&self) -> Result<Vec<String>> {
        self.core.strings(props::GROUPS)
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, User};
    use crate::{kinds::fixtures::core, resource::KindResource};
    use serde_json::json;

    #[test]
    fn project_annotations() {
        let mut project = Project::from_core(core(json!({
            "kind": "Project",
            "apiVersion": "v1",
            "metadata": {"name": "demo", "annotations": {"openshift.io/display-name": "Demo"}}
        })));
        assert_eq!(project.display_name().unwrap().as_deref(), Some("Demo"));
        project.set_description("scratch space").unwrap();
        assert_eq!(
            project.core.document().root()["metadata"]["annotations"]["openshift.io/description"],
            "scratch space"
        );
    }

    #[test]
    fn legacy_project() {
        let project = Project::from_core(core(json!({
            "kind": "Project",
            "apiVersion": "v1beta1",
            "id": "demo",
            "displayName": "Demo",
            "annotations": {"description": "old"}
        })));
        assert_eq!(project.display_name().unwrap().as_deref(), Some("Demo"));
        assert_eq!(project.description().unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn user_fields() {
        let user = User::from_core(core(json!({
            "kind": "User",
            "apiVersion": "v1",
            "metadata": {"name": "alice"},
            "fullName": "Alice Liddell",
            "identities": ["github:alice"],
            "groups": null
        })));
        assert_eq!(user.full_name().unwrap().as_deref(), Some("Alice Liddell"));
        assert_eq!(user.identities().unwrap(), ["github:alice"]);
        assert!(user.groups().unwrap().is_empty());
    }
}
