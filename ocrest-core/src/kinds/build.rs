use super::string_enum;
use crate::{registry::props, Result};
use std::{fmt, time::Duration};

wrapper! {
    /// A single run of a build configuration
    Build
}

/// Lifecycle phase of a [`Build`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildPhase {
    /// Accepted but not yet scheduled
    New,
    /// Waiting for a build pod
    Pending,
    /// The build pod is running
    Running,
    /// Finished and produced its output
    Complete,
    /// Finished without producing output
    Failed,
    /// Could not be started
    Error,
    /// Stopped on request
    Cancelled,
    /// A phase this crate does not know about
    Other(String),
}

impl BuildPhase {
    /// Whether the build will not change phase again
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BuildPhase::Complete | BuildPhase::Failed | BuildPhase::Error | BuildPhase::Cancelled
        )
    }

    /// The wire form of the phase
    pub fn as_str(&self) -> &str {
        match self {
            BuildPhase::New => "New",
            BuildPhase::Pending => "Pending",
            BuildPhase::Running => "Running",
            BuildPhase::Complete => "Complete",
            BuildPhase::Failed => "Failed",
            BuildPhase::Error => "Error",
            BuildPhase::Cancelled => "Cancelled",
            BuildPhase::Other(s) => s,
        }
    }
}

impl From<String> for BuildPhase {
    fn from(s: String) -> Self {
        match s.as_str() {
            "New" => BuildPhase::New,
            "Pending" => BuildPhase::Pending,
            "Running" => BuildPhase::Running,
            "Complete" => BuildPhase::Complete,
            "Failed" => BuildPhase::Failed,
            "Error" => BuildPhase::Error,
            "Cancelled" => BuildPhase::Cancelled,
            _ => BuildPhase::Other(s),
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Build {
    /// Current phase, `None` until the platform reports one
    pub fn phase(&self) -> Result<Option<BuildPhase>> {
        string_enum(&self.core, props::PHASE)
    }

    /// Whether the build has reached a final phase
    pub fn is_finished(&self) -> Result<bool> {
        Ok(self.phase()?.is_some_and(|p| p.is_finished()))
    }

    /// Human readable detail about the phase
    pub fn message(&self) -> Result<Option<String>> {
        self.core.string(props::MESSAGE)
    }

    /// Image the build pushes to
    pub fn output_image(&self) -> Result<Option<String>> {
        self.core.string(props::OUTPUT_IMAGE)
    }

    /// Source repository
    pub fn source_uri(&self) -> Result<Option<String>> {
        self.core.string(props::SOURCE_URI)
    }

    /// Build strategy, e.g. `Source` or `Docker`
    pub fn strategy_type(&self) -> Result<Option<String>> {
        self.core.string(props::STRATEGY_TYPE)
    }

    /// Name of the pod running the build, when the version exposes it
    pub fn pod_name(&self) -> Option<String> {
        self.core.optional_string(props::POD_NAME)
    }

    /// Name of the configuration this build was started from
    pub fn build_config_name(&self) -> Option<String> {
        self.core.optional_string(props::BUILD_CONFIG)
    }

    /// How long the build ran; reported in nanoseconds on the wire
    pub fn duration(&self) -> Result<Option<Duration>> {
        let nanos = self.core.int(props::DURATION)?;
        Ok(nanos.and_then(|n| u64::try_from(n).ok()).map(Duration::from_nanos))
    }
}
