pub mod csv_output;
pub mod extractor;
pub mod geojson;
pub mod output_error;
pub mod route;
