use tracing::{debug, info, warn};

use crate::columns;
use crate::net_use::{ConnectionTable, ConnectionTableRow, parse_net_use_table};
use crate::sanitize::{sanitize_for_shell, sanitize_logon, sanitize_path};
use crate::{CommandRunner, DiskDrive, UncDirectory, UncError};

const NET_USE: &str = "NET USE";
const MASKED_PASSWORD: &str = "-----";

/// Where a UNC directory stands in the current Windows session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// `NET USE` has no entry for it.
    Unconnected,
    /// Registered as `OK`, or as `Disconnected`, which Windows keeps until the
    /// entry is deleted and which still holds the drive letter.
    Connected,
    /// Registered in any other status, e.g. `Unavailable`.
    Unavailable,
}

/// A UNC directory as it relates to the current Windows session.
///
/// Nothing is cached: every query re-runs `NET USE` through the configured
/// [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct UncDirectoryConnection<R> {
    unc: UncDirectory,
    disk_drive: Option<DiskDrive>,
    persistent: bool,
    runner: R,
}

impl<R: CommandRunner> UncDirectoryConnection<R> {
    /// A connection that does not map a drive letter and is not persistent.
    pub fn new(unc: UncDirectory, runner: R) -> Self {
        Self {
            unc,
            disk_drive: None,
            persistent: false,
            runner,
        }
    }

    /// Maps the directory to `drive` when connecting.
    pub fn with_disk_drive(mut self, drive: DiskDrive) -> Self {
        self.disk_drive = Some(drive);
        self
    }

    /// Keeps the mapping across logins. Only honored together with a drive.
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn unc(&self) -> &UncDirectory {
        &self.unc
    }

    pub fn disk_drive(&self) -> Option<DiskDrive> {
        self.disk_drive
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn username(&self) -> Option<&str> {
        self.unc.username()
    }

    pub fn password(&self) -> Option<&str> {
        self.unc.password()
    }

    /// Connects the directory.
    ///
    /// Up to three attempts are made, stopping at the first that succeeds:
    /// no credentials, then the username alone, then username and password.
    /// Windows often has credentials cached from an earlier session, in which
    /// case the password never goes on a command line.
    ///
    /// # Errors
    ///
    /// The [`UncError::ShellCommand`] of the last attempt, with any password
    /// in its command text masked.
    pub fn connect(&self) -> Result<(), UncError> {
        debug!(path = %self.unc.path(), drive = ?self.disk_drive, "connecting UNC path");

        let mut result = self.connect_with_creds(None, None);
        if result.is_err() {
            if let Some(username) = self.username() {
                result = self.connect_with_creds(Some(username), None);
                if result.is_err() {
                    if let Some(password) = self.password() {
                        result = self.connect_with_creds(Some(username), Some(password));
                    }
                }
            }
        }

        match &result {
            Ok(()) => info!(path = %self.unc.path(), "UNC path connected"),
            Err(err) => warn!(path = %self.unc.path(), error = %err, "failed to connect UNC path"),
        }
        result
    }

    /// Removes the connection, by drive letter when one is set and by the
    /// normalized path otherwise. Open files do not block the removal.
    pub fn disconnect(&self) -> Result<(), UncError> {
        let identifier = match self.disk_drive {
            Some(drive) => drive.drive(),
            None => sanitize_path(&self.unc.normalized_path()),
        };
        let command = format!(r#"{NET_USE} "{identifier}" /DELETE /YES"#);
        debug!(path = %self.unc.path(), command = %command, "disconnecting UNC path");

        self.runner.run(&command)?;
        info!(path = %self.unc.path(), identifier = %identifier, "UNC path disconnected");
        Ok(())
    }

    /// Looks the directory up in a fresh `NET USE` table, matching on the
    /// normalized path and, when set, the drive letter.
    pub fn state(&self) -> Result<ConnectionState, UncError> {
        let table = current_net_use_table(&self.runner)?;
        let remote = self.unc.normalized_path();
        let local = self.disk_drive.map(|drive| drive.drive());

        let mut criteria = vec![(columns::REMOTE, remote.as_str())];
        if let Some(local) = &local {
            criteria.push((columns::LOCAL, local.as_str()));
        }

        let rows = table.get_matching_rows(&criteria);
        let state = if rows.is_empty() {
            ConnectionState::Unconnected
        } else if rows.iter().any(|row| row.get(columns::STATUS).is_some_and(holds_slot)) {
            ConnectionState::Connected
        } else {
            ConnectionState::Unavailable
        };
        debug!(path = %self.unc.path(), ?state, "queried connection state");
        Ok(state)
    }

    /// `true` when [`state`](Self::state) is [`ConnectionState::Connected`].
    pub fn is_connected(&self) -> Result<bool, UncError> {
        Ok(self.state()? == ConnectionState::Connected)
    }

    /// The `NET USE` command line that connects this directory with the given
    /// credentials. The path and username are sanitized and the password is
    /// escaped for the shell.
    pub fn connection_command(&self, username: Option<&str>, password: Option<&str>) -> String {
        let device = self
            .disk_drive
            .map(|drive| format!(r#" "{drive}""#))
            .unwrap_or_default();
        let password = password
            .map(|password| format!(r#" "{}""#, sanitize_for_shell(password)))
            .unwrap_or_default();
        let user = username
            .map(|username| format!(r#" /USER:"{}""#, sanitize_logon(username)))
            .unwrap_or_default();
        let persistent = if self.disk_drive.is_some() && self.persistent {
            "YES"
        } else {
            "NO"
        };

        format!(
            r#"{NET_USE}{device} "{path}"{password}{user} /PERSISTENT:{persistent}"#,
            path = sanitize_path(self.unc.path()),
        )
    }

    fn connect_with_creds(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), UncError> {
        let command = self.connection_command(username, password);
        let masked = match password {
            Some(_) => self.connection_command(username, Some(MASKED_PASSWORD)),
            None => command.clone(),
        };
        debug!(command = %masked, "attempting connection");

        self.runner
            .run(&command)
            .map(drop)
            .map_err(|err| err.with_command(masked))
    }
}

/// A [`UncDirectoryConnection`] that always maps a drive letter.
#[derive(Debug, Clone)]
pub struct UncDirectoryMount<R> {
    drive: DiskDrive,
    connection: UncDirectoryConnection<R>,
}

impl<R: CommandRunner> UncDirectoryMount<R> {
    /// Mounts `unc` at `disk_drive`, or at the first free letter from `Z:`
    /// down when none is given.
    ///
    /// # Errors
    ///
    /// [`UncError::NoDrivesAvailable`] if a letter had to be picked and none
    /// was free.
    pub fn new(
        unc: UncDirectory,
        disk_drive: Option<DiskDrive>,
        runner: R,
    ) -> Result<Self, UncError> {
        let drive = match disk_drive {
            Some(drive) => drive,
            None => DiskDrive::find_available()?,
        };
        Ok(Self {
            drive,
            connection: UncDirectoryConnection::new(unc, runner).with_disk_drive(drive),
        })
    }

    pub fn persistent(self, persistent: bool) -> Self {
        Self {
            connection: self.connection.persistent(persistent),
            ..self
        }
    }

    pub fn disk_drive(&self) -> DiskDrive {
        self.drive
    }

    pub fn connection(&self) -> &UncDirectoryConnection<R> {
        &self.connection
    }

    /// See [`UncDirectoryConnection::connect`].
    pub fn mount(&self) -> Result<(), UncError> {
        self.connection.connect()
    }

    /// See [`UncDirectoryConnection::disconnect`].
    pub fn unmount(&self) -> Result<(), UncError> {
        self.connection.disconnect()
    }

    /// See [`UncDirectoryConnection::is_connected`].
    pub fn is_mounted(&self) -> Result<bool, UncError> {
        self.connection.is_connected()
    }
}

fn holds_slot(status: &str) -> bool {
    status.eq_ignore_ascii_case("OK") || status.eq_ignore_ascii_case("Disconnected")
}

/// Runs `NET USE` and parses what it prints.
pub fn current_net_use_table<R: CommandRunner>(runner: R) -> Result<ConnectionTable, UncError> {
    debug!(command = NET_USE, "reading current connections");
    let output = runner.run(NET_USE)?;
    Ok(parse_net_use_table(&output.stdout))
}

/// One connection per `NET USE` row whose remote is a valid UNC path, mapped
/// to the row's drive when it has one.
pub fn current_connections<R>(runner: R) -> Result<Vec<UncDirectoryConnection<R>>, UncError>
where
    R: CommandRunner + Clone,
{
    let table = current_net_use_table(&runner)?;
    Ok(table
        .rows()
        .iter()
        .filter_map(|row| connection_from_row(row, runner.clone()))
        .collect())
}

/// The first registered connection for `unc`, if any.
pub fn connection_for_directory<R>(
    runner: R,
    unc: &UncDirectory,
) -> Result<Option<UncDirectoryConnection<R>>, UncError>
where
    R: CommandRunner + Clone,
{
    let table = current_net_use_table(&runner)?;
    let remote = unc.normalized_path();
    Ok(table
        .get_matching_rows(&[(columns::REMOTE, remote.as_str())])
        .into_iter()
        .find_map(|row| connection_from_row(row, runner.clone())))
}

fn connection_from_row<R: CommandRunner>(
    row: &ConnectionTableRow,
    runner: R,
) -> Option<UncDirectoryConnection<R>> {
    let remote = row.get(columns::REMOTE)?;
    let unc = match UncDirectory::new(remote) {
        Ok(unc) => unc,
        Err(err) => {
            debug!(remote, error = %err, "skipping row without a usable remote");
            return None;
        }
    };

    let connection = UncDirectoryConnection::new(unc, runner);
    match row.get(columns::LOCAL).filter(|local| !local.is_empty()) {
        Some(local) => match DiskDrive::new(local) {
            Ok(drive) => Some(connection.with_disk_drive(drive)),
            // Printer ports such as LPT1: show up here too.
            Err(_) => Some(connection),
        },
        None => Some(connection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandOutput;

    struct NeverRun;

    impl CommandRunner for NeverRun {
        fn run(&self, command: &str) -> Result<CommandOutput, UncError> {
            panic!("unexpected command {command}");
        }
    }

    fn connection(unc: &str) -> UncDirectoryConnection<NeverRun> {
        UncDirectoryConnection::new(unc.parse().unwrap(), NeverRun)
    }

    #[test]
    fn command_without_credentials() {
        assert_eq!(
            connection(r"\\server\share").connection_command(None, None),
            r#"NET USE "\\server\share" /PERSISTENT:NO"#
        );
    }

    #[test]
    fn command_with_credentials_and_drive() {
        let conn = connection(r"\\server\share").with_disk_drive("z".parse().unwrap());
        assert_eq!(
            conn.connection_command(Some("DOMAIN\\user"), Some(r#"pa"ss"#)),
            r#"NET USE "Z:" "\\server\share" "pa\"ss" /USER:"DOMAIN\user" /PERSISTENT:NO"#
        );
        assert_eq!(
            conn.persistent(true).connection_command(Some("user"), None),
            r#"NET USE "Z:" "\\server\share" /USER:"user" /PERSISTENT:YES"#
        );
    }

    #[test]
    fn persistence_requires_drive() {
        let conn = connection(r"\\server\share").persistent(true);
        assert!(conn.is_persistent());
        assert!(conn.connection_command(None, None).ends_with("/PERSISTENT:NO"));
    }

    #[test]
    fn credentials_come_from_directory() {
        let conn = connection(r"user:pass@\\server\share");
        assert_eq!(conn.username(), Some("user"));
        assert_eq!(conn.password(), Some("pass"));
        assert_eq!(conn.disk_drive(), None);
    }

    #[test]
    fn occupied_statuses() {
        assert!(holds_slot("OK"));
        assert!(holds_slot("ok"));
        assert!(holds_slot("Disconnected"));
        assert!(!holds_slot("Unavailable"));
        assert!(!holds_slot(""));
    }
}
