//! Logging utilities and structured logging support

use crate::core::config::LoggingConfig;
use std::fs::File;
use std::io::{self, Write};

pub use log::{debug, error, info, trace, warn};

/// Errors raised while installing the global logger
#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    /// The log file could not be created
    #[error("failed to create log file {path}: {source}")]
    File {
        /// Path that was attempted
        path: String,
        /// Underlying IO error
        source: io::Error,
    },

    /// Another logger is already installed
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Writes every log line to stdout and to a file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Initialize the logging system
///
/// The level comes from `config.level`; `RUST_LOG` overrides it when set.
/// With `config.file` set, output goes to stdout and that file.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    match &config.file {
        Some(path) => {
            let file = File::create(path).map_err(|source| LoggingError::File {
                path: path.clone(),
                source,
            })?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder.try_init()?;
    trace!("logging initialized at level {}", config.level);
    Ok(())
}
