use crate::{registry::props, Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};

wrapper! {
    /// Sensitive key/value data, base64 encoded on the wire
    Secret
}

impl Secret {
    /// Secret type, e.g. `Opaque`
    pub fn secret_type(&self) -> Result<Option<String>> {
        self.core.string(props::TYPE)
    }

    /// Keys present in the data map
    pub fn keys(&self) -> Result<Vec<String>> {
        let data = self.core.get(props::DATA)?.and_then(|v| v.as_object());
        Ok(data.map(|m| m.keys().cloned().collect()).unwrap_or_default())
    }

    /// Decoded value of one key
    pub fn data(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.core.path(props::DATA)?.join(key);
        let Some(encoded) = self.core.document().get_str(&path) else {
            return Ok(None);
        };
        STANDARD.decode(encoded).map(Some).map_err(|e| Error::InvalidValue {
            property: format!("{}.{key}", props::DATA),
            reason: e.to_string(),
        })
    }

    /// Encode and store the value of one key
    pub fn set_data(&mut self, key: &str, value: impl AsRef<[u8]>) -> Result<()> {
        let path = self.core.path(props::DATA)?.join(key);
        self.core.document_mut().set(&path, STANDARD.encode(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Secret;
    use crate::{kinds::fixtures::core, resource::KindResource, Error};
    use serde_json::json;

    #[test]
    fn data_is_base64_on_the_wire() {
        let mut secret = Secret::from_core(core(json!({
            "kind": "Secret",
            "apiVersion": "v1",
            "type": "Opaque",
            "data": {"username": "YWRtaW4="}
        })));
        assert_eq!(secret.secret_type().unwrap().as_deref(), Some("Opaque"));
        assert_eq!(secret.data("username").unwrap().as_deref(), Some(&b"admin"[..]));
        assert_eq!(secret.data("password").unwrap(), None);

        secret.set_data("password", "s3cr3t").unwrap();
        assert_eq!(secret.core.document().root()["data"]["password"], "czNjcjN0");
        assert_eq!(secret.keys().unwrap(), ["username", "password"]);
    }

    #[test]
    fn corrupt_data_is_reported() {
        let secret = Secret::from_core(core(json!({"kind": "Secret", "apiVersion": "v1", "data": {"k": "!!"}})));
        assert!(matches!(secret.data("k"), Err(Error::InvalidValue { .. })));
    }
}
