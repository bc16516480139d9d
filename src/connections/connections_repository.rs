use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::connections::{ConnectionError, Result};
use crate::db::get_connection;
use crate::schema::pluggy_connections;

use super::connections_model::{NewPluggyConnection, PluggyConnection, PluggyConnectionDB};

/// Repository for stored Pluggy connections
pub struct ConnectionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl ConnectionRepository {
    /// Creates a new ConnectionRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| ConnectionError::DatabaseError(e.to_string()))
    }

    /// Creates or refreshes a connection, keyed by item_id
    pub fn upsert(&self, new_connection: NewPluggyConnection) -> Result<PluggyConnection> {
        new_connection.validate()?;

        let mut conn = self.conn()?;

        let existing = pluggy_connections::table
            .filter(pluggy_connections::item_id.eq(&new_connection.item_id))
            .first::<PluggyConnectionDB>(&mut conn)
            .optional()
            .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

        match existing {
            Some(mut connection_db) => {
                connection_db.connector_name = new_connection.connector_name;
                connection_db.connector_logo = new_connection.connector_logo;
                connection_db.connector_color = new_connection.connector_color;
                connection_db.updated_at = chrono::Utc::now().naive_utc();

                diesel::update(pluggy_connections::table.find(&connection_db.id))
                    .set(&connection_db)
                    .execute(&mut conn)
                    .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

                Ok(connection_db.into())
            }
            None => {
                let mut connection_db: PluggyConnectionDB = new_connection.into();
                connection_db.id = uuid::Uuid::new_v4().to_string();

                diesel::insert_into(pluggy_connections::table)
                    .values(&connection_db)
                    .execute(&mut conn)
                    .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

                Ok(connection_db.into())
            }
        }
    }

    /// Retrieves a connection by its item_id
    pub fn get_by_item_id(&self, item_id: &str) -> Result<PluggyConnection> {
        let mut conn = self.conn()?;

        let connection = pluggy_connections::table
            .filter(pluggy_connections::item_id.eq(item_id))
            .first::<PluggyConnectionDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ConnectionError::NotFound(format!(
                    "Connection with item_id {} not found",
                    item_id
                )),
                _ => ConnectionError::DatabaseError(e.to_string()),
            })?;

        Ok(connection.into())
    }

    /// Lists all stored connections
    pub fn list(&self) -> Result<Vec<PluggyConnection>> {
        let mut conn = self.conn()?;

        pluggy_connections::table
            .order(pluggy_connections::connector_name.asc())
            .load::<PluggyConnectionDB>(&mut conn)
            .map_err(|e| ConnectionError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(PluggyConnection::from).collect())
    }

    /// Updates the status label of a connection
    pub fn update_status(&self, item_id: &str, status: &str) -> Result<()> {
        let mut conn = self.conn()?;

        diesel::update(
            pluggy_connections::table.filter(pluggy_connections::item_id.eq(item_id)),
        )
        .set((
            pluggy_connections::status.eq(status),
            pluggy_connections::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Deletes a connection by its item_id
    pub fn delete_by_item_id(&self, item_id: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(
            pluggy_connections::table.filter(pluggy_connections::item_id.eq(item_id)),
        )
        .execute(&mut conn)
        .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ConnectionError::NotFound(format!(
                "Connection with item_id {} not found",
                item_id
            )));
        }

        Ok(affected)
    }
}
