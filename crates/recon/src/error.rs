use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (zero cohort target, blank column name, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { role: String, column: String },
    /// CSV decode error for a role's file.
    Csv { role: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { role, column } => {
                write!(f, "role '{role}': missing column '{column}'")
            }
            Self::Csv { role, message } => write!(f, "role '{role}': {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
