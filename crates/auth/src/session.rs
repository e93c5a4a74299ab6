use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockpad_core::{Entity, EntityId, Individual};

/// Opaque bearer credential issued at sign-in.
///
/// Sent verbatim as the `Authorization` header value (no scheme prefix).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Returns `None` for an empty credential so it never counts as signed in.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Authenticated identity as held in memory.
///
/// `token.is_none()` is the one and only definition of "signed out".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub individual: Option<Individual>,
    pub entity: Option<Entity>,
    pub token: Option<Token>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity.as_ref().and_then(|e| e.id)
    }
}

/// Outcome of a successful sign-in, ready to be committed to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub token: Token,
    pub entity: Option<Entity>,
    pub individual: Option<Individual>,
}

impl From<SignedIn> for Session {
    fn from(value: SignedIn) -> Self {
        Self {
            individual: value.individual,
            entity: value.entity,
            token: Some(value.token),
        }
    }
}

/// Missing-credential precondition failures, raised before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No auth token found")]
    MissingToken,

    #[error("No entity ID found")]
    MissingEntity,
}

/// Credentials captured for a single outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub token: Token,
    pub entity_id: Option<EntityId>,
}

impl Authorization {
    /// The tenant scope, required by every entity-scoped endpoint.
    pub fn entity_id(&self) -> Result<EntityId, SessionError> {
        self.entity_id.ok_or(SessionError::MissingEntity)
    }

    pub fn header_value(&self) -> &str {
        self.token.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        assert!(Token::new("").is_none());
        assert_eq!(Token::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("super-secret").unwrap();
        assert!(!format!("{token:?}").contains("super-secret"));
    }

    #[test]
    fn entity_id_is_derived_from_entity() {
        let mut session = Session::default();
        assert_eq!(session.entity_id(), None);

        session.entity = Some(Entity::with_id(EntityId::new(4)));
        assert_eq!(session.entity_id(), Some(EntityId::new(4)));
    }

    #[test]
    fn authorization_requires_entity_for_scoped_calls() {
        let auth = Authorization {
            token: Token::new("t").unwrap(),
            entity_id: None,
        };
        assert_eq!(auth.entity_id(), Err(SessionError::MissingEntity));
        assert_eq!(auth.header_value(), "t");
    }
}
