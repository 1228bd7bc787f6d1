//! Windows UNC paths and the `NET USE` connection table.
//!
//! The crate models UNC directories with optional embedded credentials
//! (`user:pass@\\host\share`), sanitizes the pieces that end up on a command
//! line, and reconciles a desired connection against what `NET USE` reports.
//!
//! ```rust,no_run
//! use win_unc::{ShellRunner, UncDirectory, UncDirectoryConnection};
//!
//! let unc: UncDirectory = r"user:secret@\\fileserver\share".parse()?;
//! let conn = UncDirectoryConnection::new(unc, ShellRunner);
//! if !conn.is_connected()? {
//!     conn.connect()?;
//! }
//! # Ok::<(), win_unc::UncError>(())
//! ```
use thiserror::Error;

mod connection;
mod credentials;
mod directory;
mod disk_drive;
mod net_use;
mod platform;
pub mod sanitize;
mod shell;
pub mod validate;

pub use connection::{
    ConnectionState, UncDirectoryConnection, UncDirectoryMount, connection_for_directory,
    current_connections, current_net_use_table,
};
pub use credentials::UncCredentials;
pub use directory::UncDirectory;
pub use disk_drive::DiskDrive;
pub use net_use::{ConnectionTable, ConnectionTableRow, parse_net_use_table};
pub use shell::{CommandOutput, CommandRunner, ShellRunner};

/// Column names printed by `NET USE` in its header row.
pub mod columns {
    pub const STATUS: &str = "Status";
    pub const LOCAL: &str = "Local";
    pub const REMOTE: &str = "Remote";
    pub const NETWORK: &str = "Network";
}

#[derive(Debug, Error)]
pub enum UncError {
    #[error("Invalid UNC path '{0}'")]
    InvalidUncPath(String),
    #[error("Invalid username '{0}'")]
    InvalidUsername(String),
    #[error("Invalid disk drive '{0}'")]
    InvalidDiskDrive(String),
    #[error("The system has no drive letters available")]
    NoDrivesAvailable,
    #[error("The command `{command}` exited with {}", exit_description(.code))]
    ShellCommand { command: String, code: Option<i32> },
}

impl UncError {
    /// Replaces the command text carried by a [`UncError::ShellCommand`].
    ///
    /// Used to swap a command line containing a password for its masked form
    /// before the error leaves the crate. Other variants pass through.
    pub(crate) fn with_command(self, masked: impl Into<String>) -> Self {
        match self {
            UncError::ShellCommand { code, .. } => UncError::ShellCommand {
                command: masked.into(),
                code,
            },
            other => other,
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("error code {code}"),
        None => "an error".to_string(),
    }
}
