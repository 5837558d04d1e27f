pub mod docs_routes;
pub mod monitor_routes;
