use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("history file {path} is not valid JSON: {source}")]
    HistoryParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize history: {0}")]
    HistorySerialize(#[source] serde_json::Error),
}
