// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie lookup.
//!
//! The auth service names its session cookie differently depending on the
//! transport: `backend.session_token` over plain HTTP and
//! `__Secure-backend.session_token` when cookies are marked `Secure`. The
//! locator walks an ordered list of candidate names and returns the first
//! cookie present. The cookie is only ever read and forwarded.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::Cookie;

use crate::config::default_cookie_names;

/// A session cookie found in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    /// `name=value`, ready for an outbound `Cookie` header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Outcome of a lookup: zero or one session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredential(Option<SessionCookie>);

impl SessionCredential {
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn present(cookie: SessionCookie) -> Self {
        Self(Some(cookie))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn cookie(&self) -> Option<&SessionCookie> {
        self.0.as_ref()
    }

    /// Outbound `Cookie` header value. Empty string means "no credential".
    pub fn header_value(&self) -> String {
        self.0
            .as_ref()
            .map(SessionCookie::header_value)
            .unwrap_or_default()
    }
}

/// Ordered candidate names; first match wins.
#[derive(Debug, Clone)]
pub struct SessionLocator {
    candidates: Vec<String>,
}

impl SessionLocator {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Search the request's `Cookie` headers.
    ///
    /// Values are taken verbatim from the header, percent-escapes and all,
    /// so the forwarded credential is byte-for-byte what the browser sent.
    pub fn locate_in_headers(&self, headers: &HeaderMap) -> SessionCredential {
        let mut found: Option<(usize, Cookie<'_>)> = None;
        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok);

        for cookie in pairs {
            let Some(rank) = self.rank(cookie.name()) else {
                continue;
            };
            // Strict: the first of two same-named cookies wins.
            if found.as_ref().is_none_or(|(best, _)| rank < *best) {
                found = Some((rank, cookie));
            }
        }

        found
            .map(|(_, cookie)| {
                SessionCredential::present(SessionCookie {
                    name: cookie.name().to_string(),
                    value: cookie.value().to_string(),
                })
            })
            .unwrap_or_default()
    }

    fn rank(&self, name: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c == name)
    }

    /// Session credential set by an upstream response, if it touched one.
    ///
    /// Returns `None` when no candidate cookie appears in the `Set-Cookie`
    /// headers, and an absent credential when the cookie is being cleared.
    pub fn locate_in_set_cookies<'a>(
        &self,
        set_cookies: impl IntoIterator<Item = &'a HeaderValue>,
    ) -> Option<SessionCredential> {
        let mut found = None;
        for raw in set_cookies {
            let Ok(raw) = raw.to_str() else {
                continue;
            };
            let Ok(cookie) = Cookie::parse(raw) else {
                continue;
            };
            let Some(rank) = self.rank(cookie.name()) else {
                continue;
            };

            let cleared =
                cookie.value().is_empty() || cookie.max_age().is_some_and(|age| age.is_zero());
            let credential = if cleared {
                SessionCredential::absent()
            } else {
                SessionCredential::present(SessionCookie {
                    name: cookie.name().to_string(),
                    value: cookie.value().to_string(),
                })
            };

            let replace = match &found {
                Some((best, _)) => rank <= *best,
                None => true,
            };
            if replace {
                found = Some((rank, credential));
            }
        }
        found.map(|(_, credential)| credential)
    }
}

impl Default for SessionLocator {
    fn default() -> Self {
        Self::new(default_cookie_names())
    }
}
