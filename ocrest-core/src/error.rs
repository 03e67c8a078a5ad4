use thiserror::Error;

/// Errors raised locally, before any request reaches the platform
#[derive(Error, Debug)]
pub enum Error {
    /// A link parameter was missing or failed its declared validation rule
    ///
    /// Nothing has been sent over the wire when this is returned.
    #[error("invalid parameter {parameter:?} for link {link:?}: {reason}")]
    ParameterValidation {
        /// Name of the link being executed
        link: String,
        /// Name of the offending parameter
        parameter: String,
        /// What was wrong with it
        reason: String,
    },

    /// The property table has no entry for a required accessor
    ///
    /// This indicates a mismatch between the accessors and the property table.
    #[error("no property {property:?} registered for kind {kind:?} at version {api_version:?}")]
    UnknownProperty {
        /// The api version of the resource
        api_version: String,
        /// The kind of the resource
        kind: String,
        /// The logical property name
        property: String,
    },

    /// A normalized quantity does not fit the numeric range
    #[error("arithmetic overflow normalizing {magnitude}{unit} to bytes")]
    ArithmeticOverflow {
        /// The magnitude that was supplied
        magnitude: u64,
        /// The unit it was expressed in
        unit: String,
    },

    /// A value was rejected by a typed accessor
    #[error("invalid value for {property:?}: {reason}")]
    InvalidValue {
        /// The logical property name
        property: String,
        /// What was wrong with the value
        reason: String,
    },

    /// The resource does not advertise the requested link
    #[error("resource does not advertise a link named {0:?}")]
    LinkNotFound(String),

    /// A resource of a different kind than expected was encountered
    #[error("expected a {expected} resource but got {actual:?}")]
    KindMismatch {
        /// The kind that was asked for
        expected: String,
        /// The kind that was found
        actual: String,
    },

    /// Failed to serialize or deserialize a document
    #[error("Error (de)serializing document: {0}")]
    SerdeError(#[source] serde_json::Error),

    /// Failed to assemble an http request
    #[error("HttpError: {0}")]
    HttpError(#[source] http::Error),

    /// The property table could not be parsed
    #[error("invalid property table: {0}")]
    InvalidSchema(#[source] serde_yaml::Error),
}
