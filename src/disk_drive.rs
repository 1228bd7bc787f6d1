use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::UncError;
use crate::platform;
use crate::sanitize::clean_drive_letter;
use crate::validate::is_valid_drive_letter;

/// A local drive letter, `A:` through `Z:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiskDrive {
    letter: char,
}

impl DiskDrive {
    /// Parses a drive token such as `"z"`, `"Z:"` or `" z:\ "`.
    ///
    /// # Errors
    ///
    /// [`UncError::InvalidDiskDrive`] carrying `value` as given when the
    /// cleaned token is not a single letter.
    pub fn new(value: &str) -> Result<Self, UncError> {
        let cleaned = clean_drive_letter(value);
        match cleaned.chars().next() {
            Some(letter) if is_valid_drive_letter(&cleaned) => Ok(Self { letter }),
            _ => Err(UncError::InvalidDiskDrive(value.to_string())),
        }
    }

    /// The upper-case letter alone.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// The drive as Windows names it, e.g. `"Z:"`.
    pub fn drive(&self) -> String {
        format!("{}:", self.letter)
    }

    /// The root directory of the drive, e.g. `"Z:\"`.
    pub fn root(&self) -> String {
        format!(r"{}:\", self.letter)
    }

    /// Returns the highest drive letter with no root directory on this machine.
    ///
    /// The search runs from `Z:` down to `A:` since the later letters are the
    /// ones least likely to be taken by local disks.
    ///
    /// # Errors
    ///
    /// [`UncError::NoDrivesAvailable`] if all 26 letters are in use.
    ///
    /// # Platform
    ///
    /// On Windows a letter counts as taken whenever `GetDriveTypeW` reports
    /// anything other than "no root directory", so remembered network drives
    /// that are currently offline are skipped too.
    pub fn find_available() -> Result<Self, UncError> {
        Self::find_available_with(platform::drive_root_exists)
    }

    /// [`find_available`](Self::find_available) with a caller-supplied check
    /// for whether a root such as `"Z:\"` exists.
    pub fn find_available_with<F>(root_exists: F) -> Result<Self, UncError>
    where
        F: Fn(&str) -> bool,
    {
        let drive = ('A'..='Z')
            .rev()
            .map(|letter| Self { letter })
            .find(|drive| !root_exists(&drive.root()))
            .ok_or(UncError::NoDrivesAvailable)?;
        debug!(drive = %drive, "found available drive letter");
        Ok(drive)
    }
}

impl fmt::Display for DiskDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.letter)
    }
}

impl FromStr for DiskDrive {
    type Err = UncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}
