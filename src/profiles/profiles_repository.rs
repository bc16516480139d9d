use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::profiles::{ProfileError, Result};
use crate::schema::profiles;

use super::profiles_model::{NewProfile, Profile, ProfileDB};

/// Repository for onboarding profiles
pub struct ProfileRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates the profile. The profile is set once: a second create
    /// for the same user fails.
    pub fn create(&self, new_profile: NewProfile) -> Result<Profile> {
        new_profile.validate()?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        let existing = profiles::table
            .find(&new_profile.user_id)
            .first::<ProfileDB>(&mut conn)
            .optional()
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(ProfileError::AlreadyExists(new_profile.user_id));
        }

        let profile_db: ProfileDB = new_profile.into();

        diesel::insert_into(profiles::table)
            .values(&profile_db)
            .execute(&mut conn)
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        Ok(profile_db.into())
    }

    /// Retrieves the profile for a user
    pub fn get_by_user_id(&self, user_id: &str) -> Result<Profile> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        let profile = profiles::table
            .find(user_id)
            .first::<ProfileDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ProfileError::NotFound(format!("Profile for user {} not found", user_id))
                }
                _ => ProfileError::DatabaseError(e.to_string()),
            })?;

        Ok(profile.into())
    }
}
