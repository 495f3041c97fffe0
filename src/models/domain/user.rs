use serde::{Deserialize, Serialize};

/// Role carried in the identity provider's token. Accounts themselves live
/// with the identity provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Examiner,
    #[default]
    Candidate,
}

impl UserRole {
    /// Admins and examiners author questions and may read every attempt.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Examiner)
    }
}
