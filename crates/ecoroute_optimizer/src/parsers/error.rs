use thiserror::Error;

/// The whole file could not be read. Malformed records never produce an
/// error, they are skipped.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open input: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn parse_optional_f64(value: Option<&str>) -> Result<Option<f64>, String> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("'{value}' is not a number")),
    }
}

/// Builds a trimming, flexible reader so that short or padded rows still parse.
pub(crate) fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}
