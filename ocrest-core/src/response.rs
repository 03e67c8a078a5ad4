//! Structured responses: platform status objects and severity-tagged message lists
use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Kubernetes-style status object
///
/// Returned by the platform for deletions and for most failures.
/// It is converted into a [`RestResponse`] so callers only deal with one shape.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    /// Status of the operation
    ///
    /// One of: `Success` or `Failure`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusSummary>,

    /// Suggested HTTP return code (0 if unset)
    #[serde(default, skip_serializing_if = "is_u16_zero")]
    pub code: u16,

    /// A human-readable description of the status of this operation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// A machine-readable description of why this operation is in the `Failure` status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Extended data associated with the reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StatusDetails>,
}

impl Status {
    /// Checks if this `Status` represents failure
    ///
    /// Note that it is possible for `Status` to be in indeterminate state
    /// when neither `Success` nor `Failure` was reported.
    pub fn is_failure(&self) -> bool {
        self.status == Some(StatusSummary::Failure)
    }
}

/// Overall status of the operation - whether it succeeded or not
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatusSummary {
    /// Operation succeeded
    Success,
    /// Operation failed
    Failure,
}

/// Status details object on the [`Status`] object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    /// The name attribute of the resource associated with the status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// The kind attribute of the resource associated with the status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// The causes associated with the failure, one per offending field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<StatusCause>,
}

/// Status cause object on the [`StatusDetails`] object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct StatusCause {
    /// A machine-readable description of the cause of the error
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// A human-readable description of the cause of the error
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// The field of the resource that has caused this error, as named by its JSON serialization
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,
}

fn is_u16_zero(&v: &u16) -> bool {
    v == 0
}

/// Severity of a [`Message`]
///
/// Unknown severities received from the platform are read as [`Severity::Info`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Diagnostic output
    Debug,
    /// Informational output
    Info,
    /// Something the caller should look at
    Warning,
    /// The operation failed
    Error,
    /// Content produced by a successful operation, such as generated credentials
    Result,
}

impl Severity {
    /// The lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Result => "result",
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Severity::Debug,
            "warning" | "warn" => Severity::Warning,
            "error" => Severity::Error,
            "result" => Severity::Result,
            _ => Severity::Info,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::from(s.as_str())
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a [`RestResponse`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Human readable text
    #[serde(default)]
    pub text: String,
    /// How severe this message is
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Numeric exit code, 0 for success
    #[serde(default, rename = "exit_code", alias = "exitCode")]
    pub exit_code: i32,
    /// The request field this message refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn default_severity() -> Severity {
    Severity::Info
}

impl Message {
    /// Construct a message without a field reference
    pub fn new(text: impl Into<String>, severity: Severity, exit_code: i32) -> Self {
        Self {
            text: text.into(),
            severity,
            exit_code,
            field: None,
        }
    }

    /// Attach a field reference
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Whether this message reports a failure
    pub fn is_failure(&self) -> bool {
        self.exit_code != 0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.severity, field, self.text),
            None => write!(f, "[{}] {}", self.severity, self.text),
        }
    }
}

/// An ordered list of severity-tagged messages returned by the platform
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RestResponse {
    /// Messages in the order the platform sent them
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Status keyword sent alongside the messages, e.g. `ok` or `not_found`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RestResponse {
    /// A response carrying the given messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            status: None,
        }
    }

    /// Extract a response from a payload
    ///
    /// Understands both a `messages` envelope and a `Status` object.
    /// Returns `None` for payloads carrying neither.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let root = doc.root().as_object()?;
        if root.get("kind").and_then(|k| k.as_str()) == Some("Status") {
            let status: Status = serde_json::from_value(doc.root().clone()).ok()?;
            return Some(status.into());
        }
        if root.get("messages").is_some_and(|m| m.is_array()) {
            return serde_json::from_value(doc.root().clone()).ok();
        }
        None
    }

    /// Whether there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages, in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages referring to `field`, or all messages when `field` is `None`
    pub fn messages_for(&self, field: Option<&str>) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| field.is_none() || m.field.as_deref() == field)
            .collect()
    }

    /// Messages referring to `field` (any field when `None`) with the given severity
    pub fn messages_matching(&self, field: Option<&str>, severity: Severity) -> Vec<&Message> {
        self.messages_for(field)
            .into_iter()
            .filter(|m| m.severity == severity)
            .collect()
    }

    /// The first message carrying a non-zero exit code
    pub fn failure(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_failure())
    }
}

impl fmt::Display for RestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texts: Vec<String> = self.messages.iter().map(ToString::to_string).collect();
        f.write_str(&texts.join("; "))
    }
}

impl From<Status> for RestResponse {
    fn from(status: Status) -> Self {
        let failed = status.is_failure();
        let (severity, exit_code) = if failed {
            (Severity::Error, i32::from(status.code.max(1)))
        } else {
            (Severity::Info, 0)
        };
        let mut messages = vec![];
        if !status.message.is_empty() {
            messages.push(Message::new(status.message, severity, exit_code));
        }
        for cause in status.details.into_iter().flat_map(|d| d.causes) {
            let mut msg = Message::new(cause.message, severity, exit_code);
            if !cause.field.is_empty() {
                msg = msg.with_field(cause.field);
            }
            messages.push(msg);
        }
        let summary = if failed { "Failure" } else { "Success" };
        Self {
            messages,
            status: Some(summary.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Message, RestResponse, Severity, Status, StatusSummary};
    use crate::document::Document;

    const INVALID_STATUS: &str = r#"
    {
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "message": "Route \"www_\" is invalid: metadata.name: Invalid value: \"www_\"",
      "reason": "Invalid",
      "details": {
        "name": "www_",
        "kind": "Route",
        "causes": [
          {
            "reason": "FieldValueInvalid",
            "message": "Invalid value: \"www_\": must be a DNS subdomain",
            "field": "metadata.name"
          }
        ]
      },
      "code": 422
    }
    "#;

    const BROKER_ENVELOPE: &str = r#"
    {
      "status": "created",
      "data": null,
      "messages": [
        {"severity": "info", "text": "Application db was created.", "exit_code": 0, "field": null},
        {"severity": "RESULT", "text": "user: admin password: s3cret", "exit_code": 0, "field": "result"},
        {"severity": "debug", "text": "gear placed on node-1", "exit_code": 0}
      ]
    }
    "#;

    #[test]
    fn status_converts_into_messages() {
        let doc = Document::parse(INVALID_STATUS).unwrap();
        let resp = RestResponse::from_document(&doc).unwrap();
        assert_eq!(resp.messages().len(), 2);
        assert_eq!(resp.messages()[0].severity, Severity::Error);
        assert_eq!(resp.messages()[0].exit_code, 422);
        let by_field = resp.messages_for(Some("metadata.name"));
        assert_eq!(by_field.len(), 1);
        assert!(by_field[0].text.contains("DNS subdomain"));
        assert!(resp.failure().is_some());
    }

    #[test]
    fn success_status_is_not_a_failure() {
        let deleted = r#"{"kind":"Status","apiVersion":"v1","metadata":{},"status":"Success","details":{"name":"db","kind":"services"}}"#;
        let resp = RestResponse::from_document(&Document::parse(deleted).unwrap()).unwrap();
        assert!(resp.failure().is_none());
        assert_eq!(resp.status.as_deref(), Some("Success"));

        let plain: RestResponse = Status {
            status: Some(StatusSummary::Success),
            ..Default::default()
        }
        .into();
        assert!(plain.is_empty());
    }

    #[test]
    fn envelope_messages_keep_order_and_severity() {
        let resp = RestResponse::from_document(&Document::parse(BROKER_ENVELOPE).unwrap()).unwrap();
        let severities: Vec<_> = resp.messages().iter().map(|m| m.severity).collect();
        assert_eq!(severities, [Severity::Info, Severity::Result, Severity::Debug]);
        assert_eq!(resp.messages()[0].field, None);
        assert_eq!(resp.messages_matching(Some("result"), Severity::Result).len(), 1);
        assert!(resp.failure().is_none());
    }

    #[test]
    fn severity_filter_returns_matches_in_order() {
        let resp = RestResponse::new(vec![
            Message::new("starting", Severity::Info, 0).with_field("name"),
            Message::new("name taken", Severity::Error, 101).with_field("name"),
            Message::new("name too long", Severity::Error, 102).with_field("name"),
            Message::new("checked quota", Severity::Debug, 0).with_field("name"),
        ]);
        let errors = resp.messages_matching(Some("name"), Severity::Error);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].text, "name taken");
        assert_eq!(errors[1].text, "name too long");
        assert_eq!(resp.messages_matching(None, Severity::Error).len(), 2);
        assert!(resp.messages_matching(Some("scale"), Severity::Error).is_empty());
    }

    #[test]
    fn plain_documents_carry_no_response() {
        let doc = Document::parse(r#"{"kind":"Service","apiVersion":"v1"}"#).unwrap();
        assert!(RestResponse::from_document(&doc).is_none());
    }
}
