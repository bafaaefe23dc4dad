pub mod log_routes;
pub mod maintenance_routes;
pub mod snapshot_routes;
pub mod step_routes;
pub mod transaction_routes;
