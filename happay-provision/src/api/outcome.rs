//! Per-row result of an add-user call

/// What happened to one provisioning call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// HTTP 200, carrying the provider-assigned user id
    Provisioned { user_id: String },
    /// Any non-200 response
    Rejected { status_code: u16, body: String },
    /// No usable response: connection, timeout, bad body, or a 200 without a user id
    Failed { reason: String },
}

impl ProvisionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Provisioned { .. })
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Provisioned { user_id } => Some(user_id.as_str()),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Provisioned { .. } => Some(200),
            Self::Rejected { status_code, .. } => Some(*status_code),
            Self::Failed { .. } => None,
        }
    }

    /// Human-readable failure reason, `None` on success
    pub fn error(&self) -> Option<String> {
        match self {
            Self::Provisioned { .. } => None,
            Self::Rejected { status_code, body } => Some(format!("{} - {}", status_code, body)),
            Self::Failed { reason } => Some(reason.clone()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Provisioned { .. } => "provisioned",
            Self::Rejected { .. } => "rejected",
            Self::Failed { .. } => "failed",
        }
    }
}
