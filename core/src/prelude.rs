use crate::export::ChannelTable;
use crate::record::RepeaterRecord;

/// Common error type for the record model and the exporters.
#[derive(thiserror::Error, Debug)]
pub enum RepeaterError {
    #[error("{callsign}: missing or unusable field `{field}`")]
    MissingField {
        callsign: String,
        field: &'static str,
    },
    #[error("{callsign}: tone `{tone}` does not match the DMR pattern")]
    MalformedTone { callsign: String, tone: String },
    #[error("registry corruption: {0}")]
    RegistryCorruption(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
}

impl RepeaterError {
    pub(crate) fn missing(record: &RepeaterRecord, field: &'static str) -> Self {
        RepeaterError::MissingField {
            callsign: record.display_name().to_string(),
            field,
        }
    }
}

pub type RepeaterResult<T> = Result<T, RepeaterError>;

/// A device-specific channel table producer.
///
/// Implementations only read the registry; rows that cannot be derived are
/// skipped and counted rather than failing the whole export.
pub trait ChannelExporter {
    /// Label used in the summary line, e.g. `Chirp`.
    fn name(&self) -> &'static str;

    fn export(&self, records: &[RepeaterRecord]) -> ChannelTable;
}
