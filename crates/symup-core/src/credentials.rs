//! Upload authentication read from the environment.

use crate::error::{AuthError, ConfigError};
use std::collections::HashMap;
use std::fmt;

pub const CLIENT_ID_ENV: &str = "SYMBOL_UPLOAD_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SYMBOL_UPLOAD_CLIENT_SECRET";
pub const USER_ENV: &str = "SYMBOL_UPLOAD_USER";
pub const PASSWORD_ENV: &str = "SYMBOL_UPLOAD_PASSWORD";

/// Source of environment variables.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;

    /// Trimmed value; empty counts as unset.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, name: &str) -> Result<String, ConfigError> {
        self.non_empty(name)
            .ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
    }
}

/// The real process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Credentials accepted by the uploader.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
    UserPassword {
        user: String,
        password: String,
    },
}

impl Credentials {
    /// Client credentials take precedence over user/password.
    pub fn from_env(env: &impl EnvSource) -> Result<Self, AuthError> {
        if let (Some(client_id), Some(client_secret)) =
            (env.non_empty(CLIENT_ID_ENV), env.non_empty(CLIENT_SECRET_ENV))
        {
            return Ok(Credentials::ClientCredentials { client_id, client_secret });
        }
        if let (Some(user), Some(password)) = (env.non_empty(USER_ENV), env.non_empty(PASSWORD_ENV))
        {
            return Ok(Credentials::UserPassword { user, password });
        }
        Err(AuthError::NoCredentials)
    }

    /// Uploader command-line flags.
    pub fn to_flags(&self) -> Vec<String> {
        match self {
            Credentials::ClientCredentials { client_id, client_secret } => vec![
                "--clientId".into(),
                client_id.clone(),
                "--clientSecret".into(),
                client_secret.clone(),
            ],
            Credentials::UserPassword { user, password } => vec![
                "--user".into(),
                user.clone(),
                "--password".into(),
                password.clone(),
            ],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::ClientCredentials { .. } => "client credentials",
            Credentials::UserPassword { .. } => "user/password",
        }
    }
}

// Secrets stay out of Debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("kind", &self.kind()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_client_credentials_take_precedence() {
        let env = env(&[
            (USER_ENV, "me"),
            (PASSWORD_ENV, "pw"),
            (CLIENT_ID_ENV, "cid"),
            (CLIENT_SECRET_ENV, "secret"),
        ]);
        let creds = Credentials::from_env(&env).unwrap();
        assert_eq!(
            creds.to_flags(),
            ["--clientId", "cid", "--clientSecret", "secret"]
        );
    }

    #[test]
    fn test_user_password_fallback() {
        let env = env(&[
            (USER_ENV, " me@example.com "),
            (PASSWORD_ENV, "pw"),
            (CLIENT_ID_ENV, "cid"),
        ]);
        let creds = Credentials::from_env(&env).unwrap();
        assert_eq!(
            creds,
            Credentials::UserPassword { user: "me@example.com".into(), password: "pw".into() }
        );
    }

    #[test]
    fn test_incomplete_pairs_fail() {
        let env = env(&[(USER_ENV, "me"), (PASSWORD_ENV, "   "), (CLIENT_SECRET_ENV, "s")]);
        assert!(matches!(Credentials::from_env(&env), Err(AuthError::NoCredentials)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::UserPassword { user: "me".into(), password: "hunter2".into() };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("user/password"));
    }

    #[test]
    fn test_require_env() {
        let env = env(&[("BUGSPLAT_DATABASE", "valentina"), ("EMPTY", "")]);
        assert_eq!(env.require("BUGSPLAT_DATABASE").unwrap(), "valentina");
        assert!(matches!(env.require("EMPTY"), Err(ConfigError::MissingEnv(n)) if n == "EMPTY"));
        assert!(env.require("ABSENT").is_err());
    }
}
