pub mod assembler;
pub mod capacity_dimension;
pub mod cost_model;
pub mod disjunction;
pub mod formulation;
pub mod objective;
pub mod time_dimension;
