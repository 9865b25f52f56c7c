use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Addition,
    Merge,
    Conflict,
}

/// 單一實體的 reconcile 結果，每個實體剛好對應一個
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ServiceAdded {
        service: String,
    },
    ServiceTagsMerged {
        service: String,
        added: usize,
    },
    ServiceUrlsMerged {
        service: String,
        added: usize,
    },
    ForwardingEndpointConfigured {
        service: String,
        urls: Vec<String>,
    },
    ServiceConflict {
        service: String,
    },
    InvalidServiceIdentity,
    ScenarioAdded {
        service: String,
        scenario: String,
    },
    ScenarioTagsMerged {
        service: String,
        scenario: String,
        added: usize,
    },
    ScenarioConflict {
        service: String,
        scenario: String,
    },
    InvalidScenarioIdentity {
        service: String,
    },
    ProxySettingsApplied {
        settings: String,
    },
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::ServiceAdded { .. }
            | Self::ForwardingEndpointConfigured { .. }
            | Self::ScenarioAdded { .. }
            | Self::ProxySettingsApplied { .. } => OutcomeKind::Addition,
            Self::ServiceTagsMerged { .. }
            | Self::ServiceUrlsMerged { .. }
            | Self::ScenarioTagsMerged { .. } => OutcomeKind::Merge,
            Self::ServiceConflict { .. }
            | Self::InvalidServiceIdentity
            | Self::ScenarioConflict { .. }
            | Self::InvalidScenarioIdentity { .. } => OutcomeKind::Conflict,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceAdded { service } => write!(f, "Service '{}' added", service),
            Self::ServiceTagsMerged { service, added } => {
                write!(f, "Service '{}' tags extended with {} new tag(s)", service, added)
            }
            Self::ServiceUrlsMerged { service, added } => {
                write!(f, "Service '{}' real URLs extended with {} new URL(s)", service, added)
            }
            Self::ForwardingEndpointConfigured { service, urls } => write!(
                f,
                "Service '{}' forwarding endpoint configured: {}",
                service,
                urls.join(", ")
            ),
            Self::ServiceConflict { service } => write!(
                f,
                "Service '{}' not added: conflicting name, no new data",
                service
            ),
            Self::InvalidServiceIdentity => {
                f.write_str("Service not added: invalid identity (empty name)")
            }
            Self::ScenarioAdded { service, scenario } => {
                write!(f, "New scenario '{}' added to service '{}'", scenario, service)
            }
            Self::ScenarioTagsMerged {
                service,
                scenario,
                added,
            } => write!(
                f,
                "Scenario '{}' of service '{}' tags extended with {} new tag(s)",
                scenario, service, added
            ),
            Self::ScenarioConflict { service, scenario } => write!(
                f,
                "Scenario '{}' of service '{}' is a duplicate, no new data",
                scenario, service
            ),
            Self::InvalidScenarioIdentity { service } => write!(
                f,
                "Scenario not added to service '{}': invalid identity (empty name)",
                service
            ),
            Self::ProxySettingsApplied { settings } => write!(f, "Proxy settings set ({})", settings),
        }
    }
}

/// Ordered, append-only record of what an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    additions: Vec<String>,
    conflicts: Vec<String>,
    merges: Vec<String>,
}

impl ReconciliationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        let message = outcome.to_string();
        tracing::debug!(kind = ?outcome.kind(), "{}", message);
        match outcome.kind() {
            OutcomeKind::Addition => self.additions.push(message),
            OutcomeKind::Merge => self.merges.push(message),
            OutcomeKind::Conflict => self.conflicts.push(message),
        }
    }

    pub fn additions(&self) -> &[String] {
        &self.additions
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    pub fn merges(&self) -> &[String] {
        &self.merges
    }

    pub fn total(&self) -> usize {
        self.additions.len() + self.conflicts.len() + self.merges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} addition(s), {} merge(s), {} conflict(s)",
            self.additions.len(),
            self.merges.len(),
            self.conflicts.len()
        )
    }
}
