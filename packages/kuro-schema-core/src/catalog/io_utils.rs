//! I/O utilities for catalog and sample files.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, SchemaError};

/// Classifies I/O errors into specific SchemaError variants.
pub fn classify_io_error(error: std::io::Error, context: &str) -> SchemaError {
    match error.kind() {
        ErrorKind::StorageFull | ErrorKind::OutOfMemory => {
            SchemaError::DiskFull(format!("{}: {}", context, error))
        }
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            SchemaError::TransientIoError(format!("{}: {}", context, error))
        }
        _ => SchemaError::IoError(format!("{}: {}", context, error)),
    }
}

/// Retries an operation that may fail with transient I/O errors.
pub fn retry_io_operation<F, T>(
    operation: F,
    max_retries: u32,
    retry_delay_ms: u64,
    context: &str,
) -> Result<T>
where
    F: Fn() -> Result<T>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempt += 1;
                if attempt > max_retries {
                    return Err(err);
                }

                // Only retry transient I/O errors
                if let SchemaError::TransientIoError(_) = err {
                    tracing::warn!(
                        "Transient I/O error in {} (attempt {}/{}): {}",
                        context,
                        attempt,
                        max_retries,
                        err
                    );

                    if retry_delay_ms > 0 {
                        std::thread::sleep(std::time::Duration::from_millis(retry_delay_ms));
                    }

                    continue;
                }

                return Err(err);
            }
        }
    }
}

/// Reads a whole file, classifying failures.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| classify_io_error(e, &format!("Failed to read '{}'", path.display())))
}

/// Path of the backup copy: the original path with `.backup` appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".backup");
    PathBuf::from(name)
}
