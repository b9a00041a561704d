//! Authentication service for the panel's basic-auth credentials.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;
use sha2::Sha256;
use tokio::sync::RwLock;

use crate::domain::repositories::ConfigStore;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// PBKDF2 rounds used for newly created hashes.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

const HASH_PREFIX: &str = "pbkdf2:sha256";
const MIN_PASSWORD_LEN: usize = 6;

/// Service authenticating requests against the stored password hash.
///
/// Passwords are hashed with PBKDF2-HMAC-SHA256. Because the round count
/// makes each verification deliberately slow, the last successfully
/// verified credential pair is remembered in memory so per-request basic
/// auth does not redo the full derivation.
pub struct AuthService<C: ConfigStore> {
    store: Arc<C>,
    /// (stored hash, password) pair proven valid since the last save.
    verified: RwLock<Option<(String, String)>>,
}

impl<C: ConfigStore> AuthService<C> {
    pub fn new(store: Arc<C>) -> Self {
        Self {
            store,
            verified: RwLock::new(None),
        }
    }

    /// Returns true once first-time setup has stored a password hash.
    ///
    /// # Errors
    ///
    /// Propagates store failures as [`AppError::ServiceUnavailable`].
    pub async fn is_configured(&self) -> Result<bool, AppError> {
        Ok(self.store.load().await?.is_configured())
    }

    /// Authenticates a basic-auth credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if no password is configured yet,
    /// the username does not match, or the password is wrong.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), AppError> {
        let config = self.store.load().await?;

        let Some(stored_hash) = config.web_ui_password_hash else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "No password configured; run first-time setup"}),
            ));
        };

        if username != config.web_ui_user {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Unknown user"}),
            ));
        }

        {
            let verified = self.verified.read().await;
            if let Some((hash, pass)) = verified.as_ref()
                && *hash == stored_hash
                && *pass == password
            {
                return Ok(());
            }
        }

        if !verify_password(password, &stored_hash) {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid credentials"}),
            ));
        }

        *self.verified.write().await = Some((stored_hash, password.to_string()));
        Ok(())
    }

    /// Stores the initial password during first-time setup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when a field is missing, the
    /// confirmation does not match, the password is too short, or a
    /// password already exists.
    pub async fn set_initial_password(
        &self,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AppError> {
        let mut config = self.store.load().await?;

        if config.is_configured() {
            return Err(AppError::bad_request(
                "Setup is not allowed when password is already configured",
                json!({}),
            ));
        }

        if password.is_empty() || confirm_password.is_empty() {
            return Err(AppError::bad_request(
                "Both password fields are required",
                json!({}),
            ));
        }

        if password != confirm_password {
            return Err(AppError::bad_request("Passwords do not match", json!({})));
        }

        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::bad_request(
                "Password must be at least 6 characters long",
                json!({"min_length": MIN_PASSWORD_LEN}),
            ));
        }

        config.web_ui_password_hash = Some(generate_password_hash(password));
        config.web_ui_user = "admin".to_string();
        self.store.save(&config).await?;

        *self.verified.write().await = None;
        Ok(())
    }
}

/// Derives a PBKDF2-HMAC-SHA256 key.
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut mac =
        HmacSha256::new_from_slice(password).expect("HMAC accepts any key length");
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut u = mac.finalize().into_bytes();

    let mut derived = u;
    for _ in 1..iterations {
        let mut mac =
            HmacSha256::new_from_slice(password).expect("HMAC accepts any key length");
        mac.update(&u);
        u = mac.finalize().into_bytes();
        for (d, b) in derived.iter_mut().zip(u.iter()) {
            *d ^= b;
        }
    }

    derived.into()
}

/// Produces a hash string of the form `pbkdf2:sha256:600000$salt$hex`.
pub fn generate_password_hash(password: &str) -> String {
    generate_password_hash_with_iterations(password, PBKDF2_ITERATIONS)
}

fn generate_password_hash_with_iterations(password: &str, iterations: u32) -> String {
    let salt: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    let derived = pbkdf2_sha256(password.as_bytes(), salt.as_bytes(), iterations);
    format!(
        "{HASH_PREFIX}:{iterations}${salt}${}",
        hex::encode(derived)
    )
}

/// Verifies a password against a stored hash string.
///
/// Unknown formats verify as false rather than erroring; a corrupt hash
/// must lock the account, not open it.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(method), Some(salt), Some(expected_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Some(iterations) = method
        .strip_prefix(HASH_PREFIX)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0)
    else {
        return false;
    };

    let derived = pbkdf2_sha256(password.as_bytes(), salt.as_bytes(), iterations);
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };

    // Fixed-length comparison; both sides are 32-byte MAC outputs.
    expected.len() == derived.len()
        && expected
            .iter()
            .zip(derived.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
