pub mod cache;
pub mod distance_matrix;
pub mod distance_matrix_client;
pub mod distance_matrix_provider;
pub mod geodesy;
