pub mod engine;
pub mod formulation;
pub mod json;
pub mod parsers;
pub mod problem;
pub mod solution;
pub mod solver;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
