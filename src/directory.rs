use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::sanitize::clean_unc_path;
use crate::validate::is_valid_unc_path;
use crate::{UncCredentials, UncError};

const IPC_SHARE_SUFFIX: &str = r"\ipc$";
const AUTH_SEPARATOR: &str = r"@\\";

/// A UNC directory such as `\\host\share\sub`, optionally with credentials.
///
/// Two directories are equal when their [normalized paths](Self::normalized_path)
/// match and their credentials match exactly. The textual form is
/// `[user[:pass]@]\\host\share`, produced by `Display` and accepted by `FromStr`.
#[derive(Clone)]
pub struct UncDirectory {
    path: String,
    creds: Option<UncCredentials>,
}

impl UncDirectory {
    /// Creates a directory without credentials.
    ///
    /// Surrounding whitespace and trailing backslashes are removed first.
    ///
    /// # Errors
    ///
    /// [`UncError::InvalidUncPath`] carrying `path` as given when the cleaned
    /// value is not a UNC path: too short, not starting with exactly `\\`, or
    /// containing a character Windows forbids in paths.
    pub fn new(path: &str) -> Result<Self, UncError> {
        Self::with_credentials(path, None)
    }

    /// Creates a directory from a path plus optional username and password.
    pub fn with_login(
        path: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, UncError> {
        Self::with_credentials(path, Some(UncCredentials::new(username, password)?))
    }

    /// Creates a directory from a path and already-built credentials.
    ///
    /// Credentials with neither half set are dropped, so they compare equal to
    /// a directory built without any.
    pub fn with_credentials(
        path: &str,
        creds: Option<UncCredentials>,
    ) -> Result<Self, UncError> {
        let cleaned = clean_unc_path(path);
        if !is_valid_unc_path(cleaned) {
            return Err(UncError::InvalidUncPath(path.to_string()));
        }

        Ok(Self {
            path: cleaned.to_string(),
            creds: creds.filter(|c| !c.is_empty()),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn creds(&self) -> Option<&UncCredentials> {
        self.creds.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.creds.as_ref().and_then(UncCredentials::username)
    }

    pub fn password(&self) -> Option<&str> {
        self.creds.as_ref().and_then(UncCredentials::password)
    }

    /// The path as Windows compares it: lower-cased, without trailing
    /// backslashes, and with a trailing `\IPC$` share dropped.
    ///
    /// `\\abc`, `\\ABC\` and `\\abc\IPC$` all normalize to `\\abc`.
    pub fn normalized_path(&self) -> String {
        normalize_unc_path(&self.path)
    }

    /// The `[user[:pass]@]path` form. Same as `to_string()`.
    pub fn auth_path(&self) -> String {
        self.to_string()
    }

    /// Compares against the textual form of a directory.
    ///
    /// Returns `false` instead of failing when `value` does not parse.
    pub fn equals_string(&self, value: &str) -> bool {
        value
            .parse::<UncDirectory>()
            .map(|other| *self == other)
            .unwrap_or(false)
    }
}

/// Lower-cases a UNC path, trims trailing backslashes and drops a trailing
/// `\ipc$` share.
pub(crate) fn normalize_unc_path(path: &str) -> String {
    let lowered = path.to_lowercase();
    let trimmed = lowered.trim_end_matches('\\');
    let without_ipc = match trimmed.strip_suffix(IPC_SHARE_SUFFIX) {
        Some(host) if host.len() > 2 => host,
        _ => trimmed,
    };
    without_ipc.trim_end_matches('\\').to_string()
}

impl PartialEq for UncDirectory {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_path() == other.normalized_path() && self.creds == other.creds
    }
}

impl Eq for UncDirectory {}

impl Hash for UncDirectory {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_path().hash(state);
        self.creds.hash(state);
    }
}

impl fmt::Display for UncDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = self
            .creds
            .as_ref()
            .map(UncCredentials::auth_string)
            .unwrap_or_default();
        if auth.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{auth}@{}", self.path)
        }
    }
}

impl fmt::Debug for UncDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UncDirectory")
            .field("path", &self.path)
            .field("creds", &self.creds)
            .finish()
    }
}

impl FromStr for UncDirectory {
    type Err = UncError;

    /// Splits on the last `@\\` so a password may itself contain `@\\`.
    ///
    /// When credentials are present, an [`UncError::InvalidUncPath`] carries
    /// only the `\\host\share` part, never the `user:pass@` prefix.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.rsplit_once(AUTH_SEPARATOR) {
            Some((auth, rest)) => {
                let creds = UncCredentials::parse(auth)?;
                Self::with_credentials(&format!(r"\\{rest}"), Some(creds))
            }
            None => Self::new(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unc(path: &str, username: Option<&str>, password: Option<&str>) -> UncDirectory {
        UncDirectory::with_login(path, username, password).unwrap()
    }

    #[test]
    fn rejects_invalid_paths() {
        for path in ["", "abc", r"\\\abc", r"C:\not-unc\path", r"\\", r"\\a|b"] {
            match UncDirectory::new(path) {
                Err(UncError::InvalidUncPath(raw)) => assert_eq!(raw, path),
                other => panic!("{path:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn path_is_cleaned() {
        assert_eq!(UncDirectory::new(r"  \\host\share\\  ").unwrap().path(), r"\\host\share");
    }

    #[test]
    fn clone_keeps_credentials() {
        let original = unc(r"\\path", Some("user"), Some("pass"));
        let copy = original.clone();
        assert_eq!(copy.path(), r"\\path");
        assert_eq!(copy.username(), Some("user"));
        assert_eq!(copy.password(), Some("pass"));

        let copy = UncDirectory::new(r"\\path").unwrap().clone();
        assert_eq!(copy.username(), None);
        assert_eq!(copy.password(), None);
    }

    #[test]
    fn equality() {
        assert_eq!(UncDirectory::new(r"\\path").unwrap(), UncDirectory::new(r"\\PATH").unwrap());
        assert_eq!(unc(r"\\path", Some("user"), None), unc(r"\\PATH", Some("user"), None));
        assert_eq!(
            unc(r"\\path", Some("user"), Some("pass")),
            unc(r"\\PATH", Some("user"), Some("pass"))
        );
        assert_eq!(UncDirectory::new(r"\\path").unwrap(), unc(r"\\path", None, None));

        assert_ne!(unc(r"\\path", Some("user"), None), unc(r"\\path", Some("USER"), None));
        assert_ne!(
            unc(r"\\path", Some("user"), Some("pass")),
            unc(r"\\path", Some("user"), Some("PASS"))
        );
        assert_ne!(UncDirectory::new(r"\\path").unwrap(), unc(r"\\path", Some("user"), None));
    }

    #[test]
    fn normalized_path() {
        let norm = |p| UncDirectory::new(p).unwrap().normalized_path();
        assert_eq!(norm(r"\\abc"), r"\\abc");
        assert_eq!(norm(r"\\ABC"), r"\\abc");
        assert_eq!(norm(r"\\abc\def"), r"\\abc\def");
        assert_eq!(norm(r"\\abc\DEF"), r"\\abc\def");
        assert_eq!(norm(r"\\abc\def\\"), r"\\abc\def");
        assert_eq!(norm(r"\\abc\IPC$"), r"\\abc");
        assert_eq!(norm(r"\\abc\ipc$"), r"\\abc");
        assert_eq!(norm(r"\\ABC\ipc$\"), r"\\abc");
        assert_eq!(normalize_unc_path(&norm(r"\\abc\IPC$")), r"\\abc");
    }

    #[test]
    fn display() {
        assert_eq!(UncDirectory::new(r"\\path").unwrap().to_string(), r"\\path");
        assert_eq!(unc(r"\\path", Some("user"), None).to_string(), r"user@\\path");
        assert_eq!(unc(r"\\path", None, Some("pass")).to_string(), r":pass@\\path");
        assert_eq!(unc(r"\\path", Some("user"), Some("pass")).auth_path(), r"user:pass@\\path");
    }

    #[test]
    fn equals_string() {
        let dir = UncDirectory::new(r"\\path").unwrap();
        assert!(dir.equals_string(r"\\path"));
        assert!(dir.equals_string(r"\\PATH\"));
        assert!(!dir.equals_string("somestring"));
        assert!(!dir.equals_string(r"user@\\path"));
    }

    #[test]
    fn parse() {
        let parse = |s: &str| s.parse::<UncDirectory>().unwrap();
        assert_eq!(parse(r"\\path"), UncDirectory::new(r"\\path").unwrap());
        assert_eq!(parse(r"\\path\sub"), UncDirectory::new(r"\\path\sub").unwrap());
        assert_eq!(parse(r"user@\\path"), unc(r"\\path", Some("user"), None));
        assert_eq!(parse(r":pass@\\path"), unc(r"\\path", None, Some("pass")));
        assert_eq!(parse(r"::@\\@\\path"), unc(r"\\path", None, Some(r":@\\")));
        assert_eq!(parse(r"user:pass@\\path"), unc(r"\\path", Some("user"), Some("pass")));
        assert_eq!(parse(r"user::@\\@\\path"), unc(r"\\path", Some("user"), Some(r":@\\")));
    }

    #[test]
    fn parse_failures() {
        assert!(matches!("abc".parse::<UncDirectory>(), Err(UncError::InvalidUncPath(_))));
        assert!(matches!(
            r"bad:user:pass@\\path".parse::<UncDirectory>(),
            Ok(dir) if dir.username() == Some("bad") && dir.password() == Some("user:pass")
        ));
        assert!(matches!(
            r"a;b@\\path".parse::<UncDirectory>(),
            Err(UncError::InvalidUsername(_))
        ));
    }

    #[test]
    fn invalid_path_error_omits_credentials() {
        match r"user:s3cret@\\host|share".parse::<UncDirectory>() {
            Err(UncError::InvalidUncPath(raw)) => assert_eq!(raw, r"\\host|share"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
