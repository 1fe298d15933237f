pub mod solve;
pub mod solve_params;
