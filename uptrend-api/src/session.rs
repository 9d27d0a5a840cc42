/// Session cookie plumbing
///
/// Both halves of a session travel as cookies: `accessToken` (15 minutes)
/// and `refreshToken` (7 days). Flags are identical: HttpOnly always,
/// SameSite=Strict always, Secure in production. The tokens never reach
/// page scripts and never ride along on cross-site requests.
///
/// Clearing uses removal cookies with matching name and path, which is what
/// makes logout effective client-side regardless of token validity.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uptrend_shared::auth::jwt::TokenPair;

/// Access token cookie name
pub const ACCESS_COOKIE: &str = "accessToken";

/// Refresh token cookie name
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Access cookie lifetime, matches the access token's signed lifetime
const ACCESS_MAX_AGE: time::Duration = time::Duration::minutes(15);

/// Refresh cookie lifetime, matches the refresh token's signed lifetime
const REFRESH_MAX_AGE: time::Duration = time::Duration::days(7);

fn session_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

/// Sets both session cookies from a freshly issued token pair
pub fn set_session_cookies(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        pair.access_token.clone(),
        ACCESS_MAX_AGE,
        secure,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        pair.refresh_token.clone(),
        REFRESH_MAX_AGE,
        secure,
    ))
}

/// Sets a new access cookie only (plain refresh does not rotate the refresh token)
pub fn set_access_cookie(jar: CookieJar, access_token: String, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        access_token,
        ACCESS_MAX_AGE,
        secure,
    ))
}

/// Clears both session cookies
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").build())
        .remove(Cookie::build((REFRESH_COOKIE, "")).path("/").build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "access.jwt".to_string(),
            refresh_token: "refresh.jwt".to_string(),
        }
    }

    #[test]
    fn test_set_session_cookies_attributes() {
        let jar = set_session_cookies(CookieJar::new(), &pair(), true);

        let access = jar.get(ACCESS_COOKIE).expect("access cookie set");
        assert_eq!(access.value(), "access.jwt");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Strict));
        assert_eq!(access.max_age(), Some(ACCESS_MAX_AGE));
        assert_eq!(access.path(), Some("/"));

        let refresh = jar.get(REFRESH_COOKIE).expect("refresh cookie set");
        assert_eq!(refresh.value(), "refresh.jwt");
        assert_eq!(refresh.max_age(), Some(REFRESH_MAX_AGE));
    }

    #[test]
    fn test_secure_flag_follows_environment() {
        let jar = set_session_cookies(CookieJar::new(), &pair(), false);
        let access = jar.get(ACCESS_COOKIE).unwrap();
        // Development over plain HTTP: cookie must still be HttpOnly
        assert_ne!(access.secure(), Some(true));
        assert_eq!(access.http_only(), Some(true));
    }

    #[test]
    fn test_set_access_cookie_only() {
        let jar = set_access_cookie(CookieJar::new(), "new.access.jwt".to_string(), false);
        assert!(jar.get(ACCESS_COOKIE).is_some());
        assert!(jar.get(REFRESH_COOKIE).is_none());
    }

    #[test]
    fn test_clear_session_cookies_removes_both() {
        let jar = set_session_cookies(CookieJar::new(), &pair(), false);
        let cleared = clear_session_cookies(jar);

        assert!(cleared.get(ACCESS_COOKIE).is_none());
        assert!(cleared.get(REFRESH_COOKIE).is_none());
    }

    #[test]
    fn test_clearing_an_empty_jar_is_harmless() {
        let cleared = clear_session_cookies(CookieJar::new());
        assert!(cleared.get(ACCESS_COOKIE).is_none());
    }
}
