//! User account and role models.

use serde::{Deserialize, Serialize};

/// A user's role, fixed at sign-up.
///
/// `Unknown` covers the window where an identity is resolved but the
/// account record has not loaded yet, and any unrecognized role string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    Patient,
    Doctor,
    Unknown,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse(&s)
    }
}

impl Role {
    /// Canonical lowercase name, as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Unknown => "unknown",
        }
    }

    /// Parse a role string; anything unrecognized maps to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "patient" => Role::Patient,
            "doctor" => Role::Doctor,
            _ => Role::Unknown,
        }
    }

    /// Whether this is a concrete role that may be persisted.
    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown)
    }

    /// Object-storage folder for this role's profile photos.
    pub fn storage_folder(&self) -> Option<&'static str> {
        match self {
            Role::Patient => Some("patients"),
            Role::Doctor => Some("doctors"),
            Role::Unknown => None,
        }
    }
}

/// An account record keyed by the identity provider's subject id.
///
/// The `uid` is the foreign key into every other entity. Role is immutable
/// after creation; there is no update path by design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    /// Identity provider subject id
    pub uid: String,
    /// Sign-up email
    pub email: String,
    /// Display name captured at sign-up
    pub full_name: String,
    /// Patient or doctor
    pub role: Role,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

impl UserAccount {
    /// Create a new account record at sign-up.
    pub fn new(uid: String, email: String, full_name: String, role: Role) -> Self {
        Self {
            uid,
            email,
            full_name,
            role,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("patient"), Role::Patient);
        assert_eq!(Role::parse("doctor"), Role::Doctor);
        assert_eq!(Role::parse("admin"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);

        assert_eq!(Role::Patient.as_str(), "patient");
        assert_eq!(Role::parse(Role::Doctor.as_str()), Role::Doctor);
    }

    #[test]
    fn test_unknown_role_from_wire() {
        let role: Role = serde_json::from_str(r#""nurse""#).unwrap();
        assert_eq!(role, Role::Unknown);

        let role: Role = serde_json::from_str(r#""patient""#).unwrap();
        assert_eq!(role, Role::Patient);
    }

    #[test]
    fn test_storage_folder() {
        assert_eq!(Role::Patient.storage_folder(), Some("patients"));
        assert_eq!(Role::Doctor.storage_folder(), Some("doctors"));
        assert_eq!(Role::Unknown.storage_folder(), None);
    }

    #[test]
    fn test_new_account() {
        let account = UserAccount::new(
            "uid-1".into(),
            "max@example.com".into(),
            "Max Tan".into(),
            Role::Patient,
        );
        assert_eq!(account.uid, "uid-1");
        assert!(account.role.is_known());
        assert!(!account.created_at.is_empty());
    }
}
