use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::profiles_errors::{ProfileError, Result};

/// Known investor profile labels, as collected during onboarding
pub const INVESTOR_PROFILES: [&str; 3] = ["conservador", "moderado", "arrojado"];

/// Known risk tolerance labels
pub const RISK_TOLERANCES: [&str; 3] = ["baixa", "media", "alta"];

/// Domain model for the onboarding profile. Written once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub full_name: String,
    pub investor_profile: String,
    pub risk_tolerance: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for profiles
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProfileDB {
    pub user_id: String,
    pub full_name: String,
    pub investor_profile: String,
    pub risk_tolerance: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating the onboarding profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub user_id: String,
    pub full_name: String,
    pub investor_profile: String,
    pub risk_tolerance: String,
}

impl NewProfile {
    /// Validates the new profile data
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ProfileError::InvalidData(
                "User ID cannot be empty".to_string(),
            ));
        }
        if self.full_name.trim().is_empty() {
            return Err(ProfileError::InvalidData(
                "Full name cannot be empty".to_string(),
            ));
        }
        if !INVESTOR_PROFILES.contains(&self.investor_profile.as_str()) {
            return Err(ProfileError::InvalidData(format!(
                "Unknown investor profile: {}",
                self.investor_profile
            )));
        }
        if !RISK_TOLERANCES.contains(&self.risk_tolerance.as_str()) {
            return Err(ProfileError::InvalidData(format!(
                "Unknown risk tolerance: {}",
                self.risk_tolerance
            )));
        }
        Ok(())
    }
}

// Conversion implementations
impl From<ProfileDB> for Profile {
    fn from(db: ProfileDB) -> Self {
        Self {
            user_id: db.user_id,
            full_name: db.full_name,
            investor_profile: db.investor_profile,
            risk_tolerance: db.risk_tolerance,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewProfile> for ProfileDB {
    fn from(domain: NewProfile) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            user_id: domain.user_id,
            full_name: domain.full_name,
            investor_profile: domain.investor_profile,
            risk_tolerance: domain.risk_tolerance,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_labels_are_validated() {
        let mut profile = NewProfile {
            user_id: "u1".to_string(),
            full_name: "Maria Silva".to_string(),
            investor_profile: "moderado".to_string(),
            risk_tolerance: "media".to_string(),
        };
        assert!(profile.validate().is_ok());

        profile.investor_profile = "agressivo".to_string();
        assert!(profile.validate().is_err());
    }
}
