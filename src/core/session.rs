//! Login state for data commands.
//!
//! This is a single shared-password capability check carried by value through
//! the commands that need it. It is not an authentication mechanism.

use super::error::{AttendanceError, Result};

/// Authorization state for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    authorized: bool,
}

impl Session {
    /// Session that has not logged in
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { authorized: false }
    }

    /// Compare `password` with the configured one
    ///
    /// # Errors
    /// Returns [`AttendanceError::Unauthorized`] on mismatch
    pub fn login(password: &str, expected: &str) -> Result<Self> {
        if !expected.is_empty() && password == expected {
            crate::info!("Login successful");
            Ok(Self { authorized: true })
        } else {
            crate::warn!("Login failed");
            Err(AttendanceError::Unauthorized)
        }
    }

    /// Whether the session passed login
    #[must_use]
    pub const fn is_authorized(self) -> bool {
        self.authorized
    }

    /// Gate for operations that need a login
    ///
    /// # Errors
    /// Returns [`AttendanceError::Unauthorized`] for an anonymous session
    pub fn require(self) -> Result<()> {
        if self.authorized {
            Ok(())
        } else {
            Err(AttendanceError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login() {
        let session = Session::login("admin123", "admin123").unwrap();
        assert!(session.require().is_ok());
        assert!(Session::login("wrong", "admin123").is_err());
        assert!(Session::login("", "").is_err());
    }

    #[test]
    fn test_anonymous_is_gated() {
        assert!(matches!(
            Session::anonymous().require(),
            Err(AttendanceError::Unauthorized)
        ));
    }
}
