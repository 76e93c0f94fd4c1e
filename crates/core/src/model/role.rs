use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portal account role. Decides which dashboard a user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Individual member preparing for certification.
    Individual,
    /// Education/training partner delivering courses.
    TrainingPartner,
    /// Professional development partner issuing PDC activities.
    DevelopmentPartner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Individual,
        Role::TrainingPartner,
        Role::DevelopmentPartner,
        Role::Admin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Individual => "individual",
            Role::TrainingPartner => "training_partner",
            Role::DevelopmentPartner => "development_partner",
            Role::Admin => "admin",
        }
    }

    /// Only individual members sit mock exams.
    #[must_use]
    pub fn can_take_exams(self) -> bool {
        matches!(self, Role::Individual)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "individual" | "member" => Ok(Role::Individual),
            "ecp" | "training_partner" => Ok(Role::TrainingPartner),
            "pdp" | "development_partner" => Ok(Role::DevelopmentPartner),
            "admin" | "super_admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
