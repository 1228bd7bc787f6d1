use std::fmt;

use crate::UncError;
use crate::sanitize::clean_username;
use crate::validate::is_valid_username;

/// Username and password used to authenticate a UNC connection.
///
/// Either half may be absent. An empty (or all-whitespace) username is stored
/// as absent; an empty password is kept as given since Windows accepts it.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct UncCredentials {
    username: Option<String>,
    password: Option<String>,
}

impl UncCredentials {
    /// Builds credentials, trimming the username.
    ///
    /// # Errors
    ///
    /// [`UncError::InvalidUsername`] carrying the raw username when it holds a
    /// character Windows forbids in logon names.
    pub fn new(username: Option<&str>, password: Option<&str>) -> Result<Self, UncError> {
        let username = match username.map(clean_username) {
            None | Some("") => None,
            Some(cleaned) if is_valid_username(cleaned) => Some(cleaned.to_string()),
            Some(_) => {
                return Err(UncError::InvalidUsername(
                    username.unwrap_or_default().to_string(),
                ));
            }
        };

        Ok(Self {
            username,
            password: password.map(str::to_string),
        })
    }

    /// Parses the `user[:pass]` form found before the `@` of a UNC string.
    ///
    /// The split happens on the first `:`, so passwords may contain colons.
    /// `":pass"` yields a password with no username.
    pub fn parse(value: &str) -> Result<Self, UncError> {
        match value.split_once(':') {
            Some((username, password)) => Self::new(Some(username), Some(password)),
            None => Self::new(Some(value), None),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// `true` when neither a username nor a password is set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Renders `user`, `user:pass`, `:pass`, or the empty string.
    pub fn auth_string(&self) -> String {
        match (&self.username, &self.password) {
            (username, Some(password)) => {
                format!("{}:{password}", username.as_deref().unwrap_or_default())
            }
            (Some(username), None) => username.clone(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Debug for UncCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UncCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "*****"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_cleaned() {
        let creds = UncCredentials::new(Some("  user  "), None).unwrap();
        assert_eq!(creds.username(), Some("user"));
        assert_eq!(creds.password(), None);

        let creds = UncCredentials::new(Some("   "), Some("pass")).unwrap();
        assert_eq!(creds.username(), None);
        assert_eq!(creds.password(), Some("pass"));
    }

    #[test]
    fn invalid_username_carries_raw_value() {
        match UncCredentials::new(Some(" us:er "), None) {
            Err(UncError::InvalidUsername(raw)) => assert_eq!(raw, " us:er "),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn auth_string_forms() {
        let render = |u, p| UncCredentials::new(u, p).unwrap().auth_string();
        assert_eq!(render(None, None), "");
        assert_eq!(render(Some("user"), None), "user");
        assert_eq!(render(None, Some("pass")), ":pass");
        assert_eq!(render(Some("user"), Some("pass")), "user:pass");
        assert_eq!(render(Some("user"), Some("")), "user:");
    }

    #[test]
    fn equality_is_structural() {
        let a = UncCredentials::new(Some("user"), Some("pass")).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, UncCredentials::new(Some("USER"), Some("pass")).unwrap());
        assert_ne!(a, UncCredentials::new(Some("user"), Some("PASS")).unwrap());
        assert_ne!(
            UncCredentials::new(Some("user"), None).unwrap(),
            UncCredentials::new(Some("user"), Some("")).unwrap()
        );
    }

    #[test]
    fn parse_splits_on_first_colon() {
        let creds = UncCredentials::parse("user:pa:ss").unwrap();
        assert_eq!(creds.username(), Some("user"));
        assert_eq!(creds.password(), Some("pa:ss"));

        let creds = UncCredentials::parse(":pass").unwrap();
        assert_eq!(creds.username(), None);
        assert_eq!(creds.password(), Some("pass"));

        let creds = UncCredentials::parse("user").unwrap();
        assert_eq!(creds.username(), Some("user"));
        assert_eq!(creds.password(), None);

        assert!(UncCredentials::parse("").unwrap().is_empty());
    }

    #[test]
    fn debug_hides_password() {
        let creds = UncCredentials::new(Some("user"), Some("hunter2")).unwrap();
        let shown = format!("{creds:?}");
        assert!(shown.contains("user"));
        assert!(!shown.contains("hunter2"));
    }
}
