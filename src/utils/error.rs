use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Excel workbook error: {0}")]
    ExcelError(#[from] calamine::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid record in {source_name} (row {row}): {reason}")]
    InvalidRecord {
        source_name: String,
        row: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that failed at this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2, // 重試錯誤
            ErrorSeverity::High => 1,   // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl DashboardError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashboardError::ZipError(_) | DashboardError::IoError(_) => ErrorSeverity::Critical,
            DashboardError::ConfigError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            DashboardError::ExcelError(_)
            | DashboardError::CsvError(_)
            | DashboardError::InvalidRecord { .. } => ErrorSeverity::High,
            DashboardError::SerializationError(_) => ErrorSeverity::Medium,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::IoError(e) => format!("Could not read or write a file: {}", e),
            DashboardError::ExcelError(e) => format!("The workbook could not be read: {}", e),
            DashboardError::CsvError(e) => format!("A CSV file is malformed: {}", e),
            DashboardError::InvalidRecord {
                source_name,
                row,
                reason,
            } => format!("Row {} of {} was rejected: {}", row, source_name, reason),
            DashboardError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::IoError(_) => "Check that the input files exist and the output directory is writable",
            DashboardError::ZipError(_) => "Disable compression or free disk space and retry",
            DashboardError::ExcelError(_) => {
                "Make sure the workbook has Manufacturers, Legend and UPS_Gateways sheets"
            }
            DashboardError::CsvError(_) | DashboardError::InvalidRecord { .. } => {
                "Fix the offending row in the source data and rerun"
            }
            DashboardError::SerializationError(_) => "Report this as a bug with the input data attached",
            DashboardError::ConfigError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. } => {
                "Check the command-line flags and the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
