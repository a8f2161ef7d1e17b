use crate::db::TodoStorage;
use crate::db::models::User;
use crate::error::AppError;
use tracing::{debug, info};

/// Minimum accepted password length. Policy lives here, not in the flows.
const MIN_PASSWORD_LEN: usize = 8;

/// Identity gateway: owns credential hashing, the password policy and
/// account lookup. Flows never see a password hash.
#[derive(Clone)]
pub struct IdentityGateway {
    storage: TodoStorage,
}

/// Result of a registration attempt. A rejection carries no field-level
/// detail; the reason is only logged.
#[derive(Debug)]
pub enum RegisterOutcome {
    Created(User),
    Rejected,
}

fn bcrypt_cost() -> u32 {
    // Lower cost in debug builds; hashing at DEFAULT_COST dominates
    // test runtime otherwise.
    if cfg!(debug_assertions) { 4 } else { bcrypt::DEFAULT_COST }
}

fn is_valid_email(email: &str) -> bool {
    let Some(at) = email.find('@') else {
        return false;
    };
    at > 0 && at < email.len() - 1 && email.len() <= 254
}

impl IdentityGateway {
    pub fn new(storage: TodoStorage) -> Self {
        Self { storage }
    }

    /// Create an account from the supplied credentials. The password is
    /// hashed off the async runtime.
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisterOutcome, AppError> {
        if !is_valid_email(email) {
            debug!("registration rejected: invalid email");
            return Ok(RegisterOutcome::Rejected);
        }
        if password.len() < MIN_PASSWORD_LEN {
            debug!("registration rejected: password too short");
            return Ok(RegisterOutcome::Rejected);
        }
        if self.storage.get_user_by_email(email).await?.is_some() {
            debug!("registration rejected: email already taken");
            return Ok(RegisterOutcome::Rejected);
        }

        let password = password.to_owned();
        let hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt_cost())).await??;

        match self.storage.create_user(email, &hash).await {
            Ok(user) => {
                info!(user_id = user.id, "user registered");
                Ok(RegisterOutcome::Created(user))
            }
            // Lost a race with a concurrent registration for the same email.
            Err(AppError::Database(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                debug!("registration rejected: email already taken (insert race)");
                Ok(RegisterOutcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    /// Verify credentials against the stored hash. Returns the matching
    /// user on success, `None` on unknown email or wrong password.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Option<User>, AppError> {
        let Some(user) = self.storage.get_user_by_email(email).await? else {
            return Ok(None);
        };
        let hash = user.password_hash.clone();
        let password = password.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash)).await??;
        Ok(ok.then_some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_checks() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("ax.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@"));
    }
}
