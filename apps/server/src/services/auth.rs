// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login checks.

use std::collections::HashMap;
use thiserror::Error;

/// Verifies a username/password pair and yields the user's role.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<String>;
}

/// Malformed credential list.
#[derive(Debug, Error, PartialEq)]
pub enum CredentialsError {
    #[error("credential entry {0:?} is not user:password:role")]
    Malformed(String),

    #[error("duplicate user {0:?}")]
    Duplicate(String),
}

struct Account {
    password: String,
    role: String,
}

/// Fixed user table read from configuration.
pub struct StaticCredentials {
    accounts: HashMap<String, Account>,
}

impl StaticCredentials {
    /// Parse a comma-separated `user:password:role` list.
    pub fn parse(entries: &str) -> Result<Self, CredentialsError> {
        let mut accounts = HashMap::new();

        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let (Some(user), Some(password), Some(role)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(CredentialsError::Malformed(entry.to_string()));
            };
            if user.is_empty() || role.is_empty() {
                return Err(CredentialsError::Malformed(entry.to_string()));
            }

            let account = Account {
                password: password.to_string(),
                role: role.to_string(),
            };
            if accounts.insert(user.to_string(), account).is_some() {
                return Err(CredentialsError::Duplicate(user.to_string()));
            }
        }

        Ok(Self { accounts })
    }

    pub fn user_count(&self) -> usize {
        self.accounts.len()
    }
}

impl Authenticator for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<String> {
        self.accounts
            .get(username)
            .filter(|account| account.password == password)
            .map(|account| account.role.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts() {
        let creds = StaticCredentials::parse("admin:admin123:admin,coreuser:core123:core").unwrap();
        assert_eq!(creds.user_count(), 2);
        assert_eq!(creds.authenticate("admin", "admin123").as_deref(), Some("admin"));
        assert_eq!(creds.authenticate("coreuser", "core123").as_deref(), Some("core"));
        assert_eq!(creds.authenticate("admin", "core123"), None);
        assert_eq!(creds.authenticate("nobody", ""), None);
    }

    #[test]
    fn test_malformed_entries() {
        assert!(matches!(
            StaticCredentials::parse("admin:admin123"),
            Err(CredentialsError::Malformed(_))
        ));
        assert!(matches!(
            StaticCredentials::parse("a:x:r, a:y:r"),
            Err(CredentialsError::Duplicate(_))
        ));
    }
}
