/*************************************************************************************************
 *
 * Credential store
 * ----------------
 *
 * Toy username/password store backed by a Replace-policy chained table. Passwords are never
 * kept in plaintext: the stored value is fingerprint(PEPPER + password + SALT). The store is
 * an explicit instance owned by the caller; nothing here is process-wide.
 *
 *************************************************************************************************/

use std::fmt;

use crate::hashing::{self, Digest, HashError};
use crate::table::{ChainedTable, DuplicatePolicy, TableError};

// The salt and pepper to add to passwords (would need to be secrets in a real deployment)
pub const SALT: &str = "%^&(!%#@@#$&$@&#!^%)";
pub const PEPPER: &str = "!@^%@#&#@#(@*&@%&)";

// ***********************************************************************************************

#[derive(Debug)]
pub enum CredentialError {
    Hash(HashError),
    DuplicateUsername(String),
    InvalidCredentials(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CredentialError::Hash(error) => write!(f, "{}", error),
            CredentialError::DuplicateUsername(username) => {
                write!(f, "User with username: {} already exists", username)
            }
            CredentialError::InvalidCredentials(username) => {
                write!(f, "Incorrect credentials for user {}", username)
            }
        }
    }
}

impl From<HashError> for CredentialError {
    fn from(error: HashError) -> Self {
        CredentialError::Hash(error)
    }
}

// A lookup miss during login means the username is unknown, which reads the same as a wrong
// password to the caller.
impl From<TableError> for CredentialError {
    fn from(error: TableError) -> Self {
        match error {
            TableError::Hash(error) => CredentialError::Hash(error),
            TableError::KeyNotFound(username) => CredentialError::InvalidCredentials(username),
        }
    }
}

// ***********************************************************************************************

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub username: String,
    pub email: String,
    pub age: u32,
    pub password: Digest,
}

pub struct CredentialStore {
    users: ChainedTable<User>,
}

impl CredentialStore {
    pub fn new() -> CredentialStore {
        CredentialStore {
            users: ChainedTable::new(DuplicatePolicy::Replace),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Creates a new user. The username must be unique; the password arrives in plaintext
    /// and only its seasoned fingerprint is stored.
    pub fn signup(
        &mut self,
        name: &str,
        username: &str,
        email: &str,
        age: u32,
        password: &str,
    ) -> Result<(), CredentialError> {
        trace!("credentials::signup for {}", username);
        match self.users.get(username) {
            Ok(_) => Err(CredentialError::DuplicateUsername(username.to_string())),
            Err(TableError::Hash(error)) => Err(CredentialError::Hash(error)),
            Err(TableError::KeyNotFound(_)) => {
                let password = digest_password(password)?;
                let user = User {
                    name: name.to_string(),
                    username: username.to_string(),
                    email: email.to_string(),
                    age,
                    password,
                };
                self.users.set(username, user)?;
                Ok(())
            }
        }
    }

    /// Recomputes the seasoned fingerprint of `password` and compares it with the stored
    /// digest. Unknown usernames and wrong passwords fail identically.
    pub fn login(&self, username: &str, password: &str) -> Result<&User, CredentialError> {
        trace!("credentials::login for {}", username);
        let user = self.users.get(username)?;
        let offered = digest_password(password)?;
        if offered == user.password {
            Ok(user)
        } else {
            Err(CredentialError::InvalidCredentials(username.to_string()))
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        CredentialStore::new()
    }
}

fn digest_password(password: &str) -> Result<Digest, HashError> {
    let seasoned = format!("{}{}{}", PEPPER, password, SALT);
    hashing::fingerprint(seasoned.as_str())
}

/* *****************************************************************************************************************
 *
 * Tests
 *
 * *****************************************************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_jamie() -> CredentialStore {
        let mut store = CredentialStore::new();
        store
            .signup("Jamie", "j-amy23", "jamie@canada.gov", 23, "ilovekittens23")
            .unwrap();
        store
    }

    #[test]
    fn signup_then_login_round_trip() {
        let store = store_with_jamie();
        let user = store.login("j-amy23", "ilovekittens23").unwrap();

        assert_eq!(user.name, "Jamie");
        assert_eq!(user.username, "j-amy23");
        assert_eq!(user.email, "jamie@canada.gov");
        assert_eq!(user.age, 23);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let store = store_with_jamie();
        assert!(matches!(
            store.login("j-amy23", "wrongpass").unwrap_err(),
            CredentialError::InvalidCredentials(_)
        ));
    }

    #[test]
    fn unknown_username_fails_like_wrong_password() {
        let store = store_with_jamie();
        assert!(matches!(
            store.login("nobody", "ilovekittens23").unwrap_err(),
            CredentialError::InvalidCredentials(_)
        ));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let mut store = store_with_jamie();
        assert!(matches!(
            store
                .signup("Jamie Again", "j-amy23", "other@canada.gov", 24, "different")
                .unwrap_err(),
            CredentialError::DuplicateUsername(_)
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn stored_digest_is_deterministic() {
        let first = store_with_jamie();
        let second = store_with_jamie();
        assert_eq!(
            first.login("j-amy23", "ilovekittens23").unwrap().password,
            second.login("j-amy23", "ilovekittens23").unwrap().password
        );
    }

    #[test]
    fn password_outside_alphabet_is_rejected() {
        let mut store = CredentialStore::new();
        assert!(matches!(
            store
                .signup("Ada", "ada", "ada@example.com", 36, "пароль")
                .unwrap_err(),
            CredentialError::Hash(_)
        ));
        assert!(store.is_empty());
    }
}
