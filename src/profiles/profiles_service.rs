use log::info;
use std::sync::Arc;

use crate::db::DbPool;
use crate::profiles::Result;

use super::profiles_model::{NewProfile, Profile};
use super::profiles_repository::ProfileRepository;

/// Service for the onboarding profile
pub struct ProfileService {
    repository: ProfileRepository,
}

impl ProfileService {
    /// Creates a new ProfileService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            repository: ProfileRepository::new(pool),
        }
    }

    /// Records the onboarding profile. Fails if one already exists.
    pub fn create_profile(&self, new_profile: NewProfile) -> Result<Profile> {
        info!("Creating profile for user {}", new_profile.user_id);
        self.repository.create(new_profile)
    }

    /// Retrieves the profile for a user
    pub fn get_profile(&self, user_id: &str) -> Result<Profile> {
        self.repository.get_by_user_id(user_id)
    }
}
