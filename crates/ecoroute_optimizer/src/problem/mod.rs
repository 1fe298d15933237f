pub mod depot;
pub mod kilograms;
pub mod kmh;
pub mod location;
pub mod order;
pub mod priority;
pub mod routing_problem;
pub mod time_window;
pub mod travel_matrices;
pub mod vehicle;
