//! Route, stop and assignment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{u64_at, Database, DbResult, SqlU64};
use crate::models::{Route, RouteAssignment, RouteStop};

const ROUTE_COLUMNS: &str = "id, driver_id, vehicle_id, date, status, created_at";

const STOP_COLUMNS: &str = "id, route_id, request_id, stop_number, estimated_arrival, completed";

const ASSIGNMENT_COLUMNS: &str =
    "id, route_id, driver_id, vehicle_id, assigned_by, assigned_at, status";

impl Database {
    /// Insert a new route, returning the assigned id.
    pub fn insert_route(&self, route: &Route) -> DbResult<u64> {
        self.conn.execute(
            r#"
            INSERT INTO routes (driver_id, vehicle_id, date, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                SqlU64(route.driver_id),
                SqlU64(route.vehicle_id),
                SqlU64(route.date),
                route.status,
                SqlU64(route.created_at),
            ],
        )?;
        Ok(Self::last_id(&self.conn))
    }

    /// Get a route by ID.
    pub fn get_route(&self, id: u64) -> DbResult<Option<Route>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM routes WHERE id = ?", ROUTE_COLUMNS),
                [SqlU64(id)],
                route_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Overwrite a route's status.
    pub fn set_route_status(&self, id: u64, status: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE routes SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![SqlU64(id), status],
        )?;
        Ok(rows_affected > 0)
    }

    /// Insert a stop, returning the assigned id.
    pub fn insert_route_stop(&self, stop: &RouteStop) -> DbResult<u64> {
        self.conn.execute(
            r#"
            INSERT INTO route_stops (route_id, request_id, stop_number, estimated_arrival, completed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                SqlU64(stop.route_id),
                SqlU64(stop.request_id),
                stop.stop_number,
                SqlU64(stop.estimated_arrival),
                stop.completed,
            ],
        )?;
        Ok(Self::last_id(&self.conn))
    }

    /// Get a stop by ID.
    pub fn get_route_stop(&self, id: u64) -> DbResult<Option<RouteStop>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM route_stops WHERE id = ?", STOP_COLUMNS),
                [SqlU64(id)],
                stop_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a route's stops by stop number, ties broken by insertion order.
    pub fn list_stops_for_route(&self, route_id: u64) -> DbResult<Vec<RouteStop>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM route_stops WHERE route_id = ? ORDER BY stop_number, id",
            STOP_COLUMNS
        ))?;
        let rows = stmt.query_map([SqlU64(route_id)], stop_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mark a stop completed. Completing an already-completed stop still matches.
    pub fn mark_stop_completed(&self, id: u64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("UPDATE route_stops SET completed = 1 WHERE id = ?", [SqlU64(id)])?;
        Ok(rows_affected > 0)
    }

    /// Point a route at its driver and vehicle and log the assignment, atomically.
    pub fn insert_route_assignment(&self, assignment: &RouteAssignment) -> DbResult<u64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            UPDATE routes SET
                driver_id = ?2,
                vehicle_id = ?3,
                status = ?4,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                SqlU64(assignment.route_id),
                SqlU64(assignment.driver_id),
                SqlU64(assignment.vehicle_id),
                assignment.status,
            ],
        )?;
        tx.execute(
            r#"
            INSERT INTO route_assignments (
                route_id, driver_id, vehicle_id, assigned_by, assigned_at, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                SqlU64(assignment.route_id),
                SqlU64(assignment.driver_id),
                SqlU64(assignment.vehicle_id),
                assignment.assigned_by,
                SqlU64(assignment.assigned_at),
                assignment.status,
            ],
        )?;
        let id = Self::last_id(&tx);
        tx.commit()?;
        Ok(id)
    }

    /// Get an assignment record by ID.
    pub fn get_route_assignment(&self, id: u64) -> DbResult<Option<RouteAssignment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM route_assignments WHERE id = ?", ASSIGNMENT_COLUMNS),
                [SqlU64(id)],
                assignment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Assignment history of a route, oldest first.
    pub fn list_assignments_for_route(&self, route_id: u64) -> DbResult<Vec<RouteAssignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM route_assignments WHERE route_id = ? ORDER BY id",
            ASSIGNMENT_COLUMNS
        ))?;
        let rows = stmt.query_map([SqlU64(route_id)], assignment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn route_from_row(row: &Row<'_>) -> rusqlite::Result<Route> {
    Ok(Route {
        id: u64_at(row, 0)?,
        driver_id: u64_at(row, 1)?,
        vehicle_id: u64_at(row, 2)?,
        date: u64_at(row, 3)?,
        status: row.get(4)?,
        created_at: u64_at(row, 5)?,
    })
}

fn stop_from_row(row: &Row<'_>) -> rusqlite::Result<RouteStop> {
    Ok(RouteStop {
        id: u64_at(row, 0)?,
        route_id: u64_at(row, 1)?,
        request_id: u64_at(row, 2)?,
        stop_number: row.get(3)?,
        estimated_arrival: u64_at(row, 4)?,
        completed: row.get(5)?,
    })
}

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<RouteAssignment> {
    Ok(RouteAssignment {
        id: u64_at(row, 0)?,
        route_id: u64_at(row, 1)?,
        driver_id: u64_at(row, 2)?,
        vehicle_id: u64_at(row, 3)?,
        assigned_by: row.get(4)?,
        assigned_at: u64_at(row, 5)?,
        status: row.get(6)?,
    })
}
