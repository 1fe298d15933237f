pub mod assignment;
pub mod cheapest_arc;
pub mod routing_engine;
pub mod schedule;
pub mod search_params;
