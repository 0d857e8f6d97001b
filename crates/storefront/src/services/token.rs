//! Stateless session tokens.
//!
//! A session token binds a user id with an HMAC-SHA256 signature keyed by
//! the process-wide `APP_SECRET`: `base64url(user_id) + "." + hex(mac)`.
//! Verification is purely computational - there is no server-side session
//! store and no revocation list; signout only clears the client's cookie.
//! Tokens carry no expiry; the cookie's one-year `Max-Age` is the only
//! lifetime bound.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use velvet_mango_core::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session cookie lifetime: one year.
pub const SESSION_COOKIE_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Signs and verifies session tokens with the process-wide app secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl TokenSigner {
    /// Create a signer from the app secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size")
    }

    /// Issue a signed token for a user.
    #[must_use]
    pub fn issue(&self, user_id: UserId) -> String {
        let payload = URL_SAFE_NO_PAD.encode(user_id.as_i32().to_string());
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    /// Verify a token and extract the bound user id.
    ///
    /// Fails closed: any malformed payload, undecodable signature, or
    /// signature mismatch yields `None`.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let id_bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let id = std::str::from_utf8(&id_bytes).ok()?.parse::<i32>().ok()?;
        Some(UserId::new(id))
    }
}

/// Build the `Set-Cookie` value handing a session token to the client.
///
/// `HttpOnly` keeps the token out of script reach; the one-year `Max-Age`
/// matches the token's unbounded server-side validity.
#[must_use]
pub fn session_cookie_header(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_COOKIE_MAX_AGE_SECONDS}"
    )
}

/// Build the `Set-Cookie` value clearing the session cookie (signout).
#[must_use]
pub fn clear_session_cookie_header() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
