//! User profile record and role tags.

use serde::{Deserialize, Serialize};

/// Application area a user is permitted into.
///
/// The backend sends roles as lowercase strings. Tags outside the known set
/// deserialize to [`Role::Unknown`] so a misconfigured account never panics
/// the client; authorization treats unknown roles as unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Landing path for a user's own area after login.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Teacher => "/teacher",
            _ => "/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

/// Full user profile as returned by `GET /profile/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// Partial profile update sent via `PUT /profile/me`.
///
/// Only populated fields are serialized; the server replies with the full
/// updated record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_known_tags() {
        for (tag, role) in [
            ("\"student\"", Role::Student),
            ("\"teacher\"", Role::Teacher),
            ("\"admin\"", Role::Admin),
        ] {
            let parsed: Role = serde_json::from_str(tag).unwrap();
            assert_eq!(parsed, role);
            assert_eq!(serde_json::to_string(&role).unwrap(), tag);
        }
    }

    #[test]
    fn unrecognized_role_maps_to_unknown() {
        let parsed: Role = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(parsed, Role::Unknown);
    }

    #[test]
    fn landing_paths() {
        assert_eq!(Role::Admin.landing_path(), "/admin");
        assert_eq!(Role::Teacher.landing_path(), "/teacher");
        assert_eq!(Role::Student.landing_path(), "/dashboard");
        assert_eq!(Role::Unknown.landing_path(), "/dashboard");
    }

    #[test]
    fn profile_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            time_zone: Some("Africa/Nairobi".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"time_zone": "Africa/Nairobi"}));
    }
}
