// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session as reported by the auth service, and the per-request context that
//! carries it through a handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::{AuthClient, Role, SessionCredential};

/// Body of the auth service's `get-session` route.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub session: SessionDetails,
    pub user: SessionUser,
}

impl Session {
    /// Recognized role, if the stored role string is one.
    pub fn role(&self) -> Option<Role> {
        self.user.role.as_deref().and_then(Role::parse)
    }
}

/// Session record. The opaque token is deliberately not deserialized.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-form role string; see [`Session::role`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
}

/// Auth state for one request.
///
/// Built when the request arrives, refreshed after a call that changes the
/// session (sign-in, sign-out), dropped with the request. Nothing outlives
/// the request.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    credential: SessionCredential,
    session: Option<Session>,
}

impl SessionContext {
    /// Resolve the session for `credential`.
    ///
    /// No credential means no lookup. Lookup failures are logged and treated
    /// as "signed out".
    pub async fn load(client: &AuthClient, credential: SessionCredential) -> Self {
        let session = if credential.is_present() {
            match client.get_session(&credential).await {
                Ok(session) => session,
                Err(e) => {
                    warn!(error = %e, "session lookup failed");
                    None
                }
            }
        } else {
            None
        };

        Self {
            credential,
            session,
        }
    }

    /// Re-resolve after the credential changed.
    pub async fn refresh(&mut self, client: &AuthClient, credential: SessionCredential) {
        *self = Self::load(client, credential).await;
    }

    #[cfg(test)]
    pub(crate) fn from_parts(credential: SessionCredential, session: Option<Session>) -> Self {
        Self {
            credential,
            session,
        }
    }

    pub fn credential(&self) -> &SessionCredential {
        &self.credential
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn into_session(self) -> Option<Session> {
        self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().and_then(Session::role)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn session_with_role(role: Option<&str>) -> Session {
        serde_json::from_value(json!({
            "session": {
                "id": "sess_1",
                "userId": "user_1",
                "token": "opaque",
                "expiresAt": "2030-01-01T00:00:00.000Z"
            },
            "user": {
                "id": "user_1",
                "name": "Alice",
                "email": "alice@example.com",
                "emailVerified": true,
                "role": role
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_auth_service_payload() {
        let session = session_with_role(Some("admin"));
        assert_eq!(session.session.id, "sess_1");
        assert_eq!(session.user.name, "Alice");
        assert!(session.user.email_verified);
        assert!(session.session.expires_at.is_some());
        assert_eq!(session.role(), Some(Role::Admin));
    }

    #[test]
    fn token_is_not_serialized_back() {
        let session = session_with_role(Some("user"));
        let json = serde_json::to_value(&session).unwrap();
        assert!(json["session"].get("token").is_none());
        assert_eq!(json["session"]["userId"], "user_1");
    }

    #[test]
    fn unknown_or_missing_role_is_none() {
        assert_eq!(session_with_role(Some("super_admin")).role(), None);
        assert_eq!(session_with_role(None).role(), None);
    }

    #[test]
    fn context_reports_role_and_authentication() {
        let ctx = SessionContext::from_parts(
            SessionCredential::absent(),
            Some(session_with_role(Some("user"))),
        );
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.role(), Some(Role::User));

        let empty = SessionContext::default();
        assert!(!empty.is_authenticated());
        assert_eq!(empty.role(), None);
    }
}
