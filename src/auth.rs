use crate::error::{DashboardError, Result};

/// The single admin account allowed into the dashboard.
#[derive(Clone)]
pub struct AdminCredentials {
    email: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Check a login attempt. The email is compared after trimming; the password exactly.
    pub fn verify(&self, email: &str, password: &str) -> Result<()> {
        if email.trim() == self.email && password == self.password {
            tracing::info!(email = %self.email, "admin login accepted");
            Ok(())
        } else {
            tracing::warn!(email = %email.trim(), "admin login rejected");
            Err(DashboardError::InvalidCredentials)
        }
    }
}
