use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("report is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("CSV error at line {line_index}: {source}")]
    Csv {
        line_index: usize,
        #[source]
        source: csv::Error,
    },

    #[error("report is missing its header row")]
    MissingHeader,

    #[error("header column {column_index} invalid: {message}")]
    InvalidHeader {
        column_index: usize,
        message: String,
    },

    #[error("report header does not contain any year columns")]
    NoYearColumns,

    #[error("failed to build wage dataframe: {message}")]
    Frame { message: String },
}
