//! Vehicle repository.

use chrono::Utc;

use dispatch_core::entities::Vehicle;
use dispatch_core::enums::VehicleStatus;
use dispatch_core::ids::PREFIX_VEHICLE;

use crate::DispatchDb;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};

const SELECT_COLS: &str = "id, status, updated_at";

fn row_to_vehicle(row: &libsql::Row) -> Result<Vehicle, DatabaseError> {
    Ok(Vehicle {
        id: row.get(0)?,
        status: parse_enum(&row.get::<String>(1)?)?,
        updated_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

/// Fetch a vehicle on a specific connection or transaction.
pub(crate) async fn fetch_vehicle(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Vehicle>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM vehicles WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_vehicle(&row)?)),
        None => Ok(None),
    }
}

impl DispatchDb {
    /// Register a vehicle with a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn create_vehicle(&self, status: VehicleStatus) -> Result<Vehicle, DatabaseError> {
        let vehicle = Vehicle {
            id: self.generate_id(PREFIX_VEHICLE).await?,
            status,
            updated_at: Utc::now(),
        };
        self.insert_vehicle(&vehicle).await?;
        Ok(vehicle)
    }

    /// Register a vehicle under a caller-chosen ID (e.g. a fleet number).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails (e.g. the ID already exists).
    pub async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), DatabaseError> {
        let _gate = self.write_guard().await;
        self.conn()
            .execute(
                &format!("INSERT INTO vehicles ({SELECT_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![
                    vehicle.id.as_str(),
                    vehicle.status.as_str(),
                    vehicle.updated_at.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(vehicle_id = %vehicle.id, status = %vehicle.status, "registered vehicle");
        Ok(())
    }

    /// Fetch a vehicle by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no vehicle has this ID.
    pub async fn get_vehicle(&self, id: &str) -> Result<Vehicle, DatabaseError> {
        let _gate = self.read_guard().await;
        fetch_vehicle(self.conn(), id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }
}
