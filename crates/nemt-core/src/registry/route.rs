//! Route planning: routes, their stops, and driver/vehicle assignment.
//!
//! No route is computed here. Stops are stored in the order the dispatcher
//! gives them, and assignment does not consult the driver or vehicle
//! registries; callers run eligibility and suitability checks first.

use tracing::info;

use super::{not_found, require, RegistryResult};
use crate::db::Database;
use crate::models::{status, CallContext, Route, RouteAssignment, RouteStop};

/// Stores routes, stops and the assignment audit log.
pub struct RoutePlanner<'a> {
    db: &'a Database,
}

impl<'a> RoutePlanner<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Open an unassigned route in `planning`.
    pub fn create_route(&self, ctx: &CallContext, date: u64) -> RegistryResult<u64> {
        let id = self.db.insert_route(&Route::new(ctx, date))?;
        info!(route_id = id, date, actor = %ctx.actor, "created route");
        Ok(id)
    }

    pub fn get_route(&self, id: u64) -> RegistryResult<Option<Route>> {
        Ok(self.db.get_route(id)?)
    }

    /// Append a stop. `request_id` and `stop_number` are taken as given.
    pub fn add_route_stop(
        &self,
        ctx: &CallContext,
        route_id: u64,
        request_id: u64,
        stop_number: u32,
        estimated_arrival: u64,
    ) -> RegistryResult<u64> {
        require(self.db.get_route(route_id)?, "route", route_id)?;

        let stop = RouteStop {
            id: 0,
            route_id,
            request_id,
            stop_number,
            estimated_arrival,
            completed: false,
        };
        let id = self.db.insert_route_stop(&stop)?;
        info!(
            stop_id = id,
            route_id,
            request_id,
            stop_number,
            actor = %ctx.actor,
            "added route stop"
        );
        Ok(id)
    }

    pub fn get_route_stop(&self, id: u64) -> RegistryResult<Option<RouteStop>> {
        Ok(self.db.get_route_stop(id)?)
    }

    /// Stops on a route by stop number.
    pub fn list_route_stops(&self, route_id: u64) -> RegistryResult<Vec<RouteStop>> {
        require(self.db.get_route(route_id)?, "route", route_id)?;
        Ok(self.db.list_stops_for_route(route_id)?)
    }

    /// Put a driver and vehicle on the route and log the assignment.
    ///
    /// Reassigning an already-assigned route is allowed and adds another
    /// audit record.
    pub fn assign_route(
        &self,
        ctx: &CallContext,
        route_id: u64,
        driver_id: u64,
        vehicle_id: u64,
    ) -> RegistryResult<u64> {
        require(self.db.get_route(route_id)?, "route", route_id)?;

        let assignment = RouteAssignment {
            id: 0,
            route_id,
            driver_id,
            vehicle_id,
            assigned_by: ctx.actor.clone(),
            assigned_at: ctx.block_height,
            status: status::ASSIGNED.to_string(),
        };
        let id = self.db.insert_route_assignment(&assignment)?;
        info!(
            assignment_id = id,
            route_id,
            driver_id,
            vehicle_id,
            actor = %ctx.actor,
            "assigned route"
        );
        Ok(id)
    }

    pub fn get_route_assignment(&self, id: u64) -> RegistryResult<Option<RouteAssignment>> {
        Ok(self.db.get_route_assignment(id)?)
    }

    /// Assignment history of a route, oldest first.
    pub fn list_route_assignments(&self, route_id: u64) -> RegistryResult<Vec<RouteAssignment>> {
        require(self.db.get_route(route_id)?, "route", route_id)?;
        Ok(self.db.list_assignments_for_route(route_id)?)
    }

    /// Overwrite the route's status with any value.
    pub fn update_route_status(
        &self,
        ctx: &CallContext,
        route_id: u64,
        status: &str,
    ) -> RegistryResult<u64> {
        if !self.db.set_route_status(route_id, status)? {
            return Err(not_found("route", route_id));
        }
        info!(route_id, status, actor = %ctx.actor, "updated route status");
        Ok(route_id)
    }

    /// Mark a stop completed. Repeating this on a completed stop is fine.
    pub fn complete_route_stop(&self, ctx: &CallContext, stop_id: u64) -> RegistryResult<u64> {
        if !self.db.mark_stop_completed(stop_id)? {
            return Err(not_found("route stop", stop_id));
        }
        info!(stop_id, actor = %ctx.actor, "completed route stop");
        Ok(stop_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNASSIGNED;

    const BLOCK_HEIGHT: u64 = 100;

    fn dispatcher() -> CallContext {
        CallContext::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM", BLOCK_HEIGHT)
    }

    #[test]
    fn test_create_route() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        let route_date = BLOCK_HEIGHT + 100;

        assert_eq!(planner.create_route(&dispatcher(), route_date).unwrap(), 1);

        let route = planner.get_route(1).unwrap().unwrap();
        assert_eq!(route.date, route_date);
        assert_eq!(route.status, "planning");
        assert_eq!(route.driver_id, UNASSIGNED);
        assert_eq!(route.vehicle_id, UNASSIGNED);
        assert_eq!(route.created_at, BLOCK_HEIGHT);
    }

    #[test]
    fn test_add_route_stops() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        let route_date = BLOCK_HEIGHT + 100;
        planner.create_route(&dispatcher(), route_date).unwrap();

        let stop1 = planner
            .add_route_stop(&dispatcher(), 1, 101, 1, route_date + 10)
            .unwrap();
        let stop2 = planner
            .add_route_stop(&dispatcher(), 1, 102, 2, route_date + 30)
            .unwrap();
        assert_eq!(stop1, 1);
        assert_eq!(stop2, 2);

        let first = planner.get_route_stop(1).unwrap().unwrap();
        assert_eq!(first.route_id, 1);
        assert_eq!(first.request_id, 101);
        assert_eq!(first.stop_number, 1);
        assert_eq!(first.estimated_arrival, route_date + 10);
        assert!(!first.completed);

        let second = planner.get_route_stop(2).unwrap().unwrap();
        assert_eq!(second.stop_number, 2);
        assert_eq!(second.estimated_arrival, route_date + 30);
        assert!(!second.completed);
    }

    #[test]
    fn test_add_stop_to_unknown_route() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);

        let err = planner
            .add_route_stop(&dispatcher(), 1, 101, 1, 210)
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_duplicate_stop_numbers_accepted() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        planner.create_route(&dispatcher(), 200).unwrap();

        planner.add_route_stop(&dispatcher(), 1, 101, 1, 210).unwrap();
        planner.add_route_stop(&dispatcher(), 1, 102, 1, 220).unwrap();

        assert_eq!(planner.list_route_stops(1).unwrap().len(), 2);
    }

    #[test]
    fn test_assign_route() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        planner.create_route(&dispatcher(), BLOCK_HEIGHT + 100).unwrap();

        assert_eq!(planner.assign_route(&dispatcher(), 1, 201, 301).unwrap(), 1);

        let route = planner.get_route(1).unwrap().unwrap();
        assert_eq!(route.driver_id, 201);
        assert_eq!(route.vehicle_id, 301);
        assert_eq!(route.status, "assigned");
        assert!(route.is_assigned());

        let assignment = planner.get_route_assignment(1).unwrap().unwrap();
        assert_eq!(assignment.route_id, 1);
        assert_eq!(assignment.driver_id, 201);
        assert_eq!(assignment.vehicle_id, 301);
        assert_eq!(assignment.status, "assigned");
        assert_eq!(assignment.assigned_by, dispatcher().actor);
        assert_eq!(assignment.assigned_at, BLOCK_HEIGHT);
    }

    #[test]
    fn test_reassignment_keeps_history() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        planner.create_route(&dispatcher(), 200).unwrap();

        planner.assign_route(&dispatcher(), 1, 201, 301).unwrap();
        planner.assign_route(&dispatcher(), 1, 202, 302).unwrap();

        let route = planner.get_route(1).unwrap().unwrap();
        assert_eq!(route.driver_id, 202);

        let history = planner.list_route_assignments(1).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].driver_id, 201);
        assert_eq!(history[1].driver_id, 202);
    }

    #[test]
    fn test_assign_unknown_route() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);

        assert!(planner
            .assign_route(&dispatcher(), 3, 201, 301)
            .unwrap_err()
            .is_not_found());
        assert!(planner.get_route_assignment(1).unwrap().is_none());
    }

    #[test]
    fn test_update_route_status() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        planner.create_route(&dispatcher(), BLOCK_HEIGHT + 100).unwrap();

        assert_eq!(
            planner
                .update_route_status(&dispatcher(), 1, "in-progress")
                .unwrap(),
            1
        );
        assert_eq!(planner.get_route(1).unwrap().unwrap().status, "in-progress");

        assert!(planner
            .update_route_status(&dispatcher(), 2, "in-progress")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_complete_route_stop() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        planner.create_route(&dispatcher(), BLOCK_HEIGHT + 100).unwrap();
        planner
            .add_route_stop(&dispatcher(), 1, 101, 1, BLOCK_HEIGHT + 110)
            .unwrap();

        assert_eq!(planner.complete_route_stop(&dispatcher(), 1).unwrap(), 1);
        assert!(planner.get_route_stop(1).unwrap().unwrap().completed);

        // Idempotent
        assert_eq!(planner.complete_route_stop(&dispatcher(), 1).unwrap(), 1);
        assert!(planner.get_route_stop(1).unwrap().unwrap().completed);

        assert!(planner
            .complete_route_stop(&dispatcher(), 2)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_full_range_ids_and_clock() {
        let db = Database::open_in_memory().unwrap();
        let planner = RoutePlanner::new(&db);
        let late = CallContext::new(dispatcher().actor, u64::MAX);

        let route_id = planner.create_route(&late, u64::MAX).unwrap();
        let stop_id = planner
            .add_route_stop(&late, route_id, u64::MAX, 1, u64::MAX)
            .unwrap();
        planner
            .assign_route(&late, route_id, u64::MAX, i64::MAX as u64 + 1)
            .unwrap();

        let route = planner.get_route(route_id).unwrap().unwrap();
        assert_eq!(route.date, u64::MAX);
        assert_eq!(route.created_at, u64::MAX);
        assert_eq!(route.driver_id, u64::MAX);
        assert_eq!(route.vehicle_id, i64::MAX as u64 + 1);

        let stop = planner.get_route_stop(stop_id).unwrap().unwrap();
        assert_eq!(stop.request_id, u64::MAX);
        assert_eq!(stop.estimated_arrival, u64::MAX);

        let history = planner.list_route_assignments(route_id).unwrap();
        assert_eq!(history[0].assigned_at, u64::MAX);

        // Unknown huge ids are ordinary misses
        assert!(planner.get_route(u64::MAX).unwrap().is_none());
        assert!(planner
            .update_route_status(&late, u64::MAX, "completed")
            .unwrap_err()
            .is_not_found());
    }
}
