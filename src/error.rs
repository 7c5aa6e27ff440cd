use std::path::PathBuf;
use thiserror::Error;

// Every variant aborts the batch run. Nothing here is retried.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("capacity must be an integer, got {0:?}")]
    Capacity(String),

    #[error("{}expected 10 fields, found {found}", line_prefix(.line))]
    FieldCount { line: Option<usize>, found: usize },

    #[error("{}invalid {field} grade {value:?}", line_prefix(.line))]
    Grade {
        line: Option<usize>, // set by at_line when read from a file
        field: &'static str,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdmissionError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AdmissionError::File {
            path: path.into(),
            source,
        }
    }

    // Attach the 1-based line number of the applicant file.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            AdmissionError::FieldCount { found, .. } => AdmissionError::FieldCount {
                line: Some(line),
                found,
            },
            AdmissionError::Grade { field, value, .. } => AdmissionError::Grade {
                line: Some(line),
                field,
                value,
            },
            other => other,
        }
    }
}

fn line_prefix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("line {}: ", line),
        None => String::new(),
    }
}
