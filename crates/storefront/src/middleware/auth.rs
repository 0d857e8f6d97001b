//! Authentication extractors.
//!
//! The session token travels in an `httpOnly` cookie. These extractors
//! verify its signature and load the caller's user record, producing the
//! [`CurrentUser`] context that every authenticated mutation takes - there
//! is no process-wide session state.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::COOKIE, request::Parts},
};

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::user::CurrentUser;
use crate::services::token::SESSION_COOKIE;
use crate::state::AppState;

/// Extractor that requires an authenticated caller.
///
/// Rejects with `AppError::Unauthenticated` when the cookie is missing,
/// the signature is invalid, or the bound user no longer exists - before
/// the handler body runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(caller): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", caller.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = resolve_caller(&parts.headers, state)
            .await?
            .ok_or(AppError::Unauthenticated)?;
        Ok(Self(caller))
    }
}

/// Resolve the caller context from the request's session cookie.
///
/// Returns `Ok(None)` for missing/invalid tokens and unknown users;
/// database failures still surface as errors.
async fn resolve_caller(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let Some(user_id) = state.tokens().verify(&token) else {
        return Ok(None);
    };

    let user = UserRepository::new(state.pool()).get_by_id(user_id).await?;

    Ok(user.map(CurrentUser::from))
}

/// Extract the session token from the `Cookie` header, if present.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_owned())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_token_extracted() {
        let headers = headers_with_cookie("token=abc.def");
        assert_eq!(session_token(&headers), Some("abc.def".to_owned()));
    }

    #[test]
    fn test_session_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; token=abc.def; lang=en");
        assert_eq!(session_token(&headers), Some("abc.def".to_owned()));
    }

    #[test]
    fn test_missing_cookie_header() {
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_other_cookies_only() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_name_must_match_exactly() {
        let headers = headers_with_cookie("token2=abc; xtoken=def");
        assert_eq!(session_token(&headers), None);
    }
}
