pub mod error;
pub mod orders_csv;
pub mod vehicles_csv;
