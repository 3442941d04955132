use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] earnwire_core::ValidationError),

    #[error("environment variable {var} is not set")]
    MissingCredential { var: &'static str },

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Pipeline(#[from] earnwire_core::PipelineError),

    #[error(transparent)]
    ExchangeMap(#[from] earnwire_core::ExchangeMapError),

    #[error(transparent)]
    Calendar(#[from] earnwire_core::CalendarError),

    #[error(transparent)]
    Transcript(#[from] earnwire_core::TranscriptError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::MissingCredential { .. } => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Pipeline(_) | Self::ExchangeMap(_) | Self::Calendar(_) | Self::Transcript(_) => {
                6
            }
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
