//! Session token storage.
//!
//! The identity provider's session secret is the only local state this
//! service manages. [`SessionStore`] is the seam the identity operations talk
//! to; [`SessionCookies`] carries the secret in the `appwrite-session` cookie.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponseParts, ResponseParts},
};

/// Name of the cookie holding the session secret.
pub const SESSION_COOKIE: &str = "appwrite-session";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Strict; Secure";

/// The secret cannot be carried in a cookie header.
#[derive(Debug, thiserror::Error)]
#[error("session secret contains characters not allowed in a cookie")]
pub struct InvalidSessionSecret;

/// Get/set/clear access to the current session secret.
pub trait SessionStore {
    fn get(&self) -> Option<&str>;

    fn set(&mut self, secret: &str) -> Result<(), InvalidSessionSecret>;

    fn clear(&mut self);
}

/// Session secret read from the request's cookies, with pending `Set-Cookie` updates.
///
/// Used as a handler argument to read the cookie, and returned as part of the
/// response to emit whatever `set`/`clear` recorded.
#[derive(Debug, Default)]
pub struct SessionCookies {
    secret: Option<String>,
    updates: Vec<HeaderValue>,
}

impl SessionCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let secret = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty());

        Self {
            secret,
            updates: Vec::new(),
        }
    }

    /// `Set-Cookie` values recorded so far, oldest first.
    #[cfg(test)]
    pub fn updates(&self) -> &[HeaderValue] {
        &self.updates
    }
}

fn is_cookie_octet(c: char) -> bool {
    // RFC 6265 cookie-octet
    matches!(c, '\x21' | '\x23'..='\x2b' | '\x2d'..='\x3a' | '\x3c'..='\x5b' | '\x5d'..='\x7e')
}

impl SessionStore for SessionCookies {
    fn get(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    fn set(&mut self, secret: &str) -> Result<(), InvalidSessionSecret> {
        if secret.is_empty() || !secret.chars().all(is_cookie_octet) {
            return Err(InvalidSessionSecret);
        }
        let header = HeaderValue::from_str(&format!("{SESSION_COOKIE}={secret}; {COOKIE_ATTRIBUTES}"))
            .map_err(|_| InvalidSessionSecret)?;

        self.secret = Some(secret.to_string());
        self.updates.push(header);
        Ok(())
    }

    fn clear(&mut self) {
        self.secret = None;
        self.updates.push(HeaderValue::from_static(
            "appwrite-session=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/; HttpOnly; SameSite=Strict; Secure",
        ));
    }
}

impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl IntoResponseParts for SessionCookies {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for value in self.updates {
            res.headers_mut().append(SET_COOKIE, value);
        }
        Ok(res)
    }
}
