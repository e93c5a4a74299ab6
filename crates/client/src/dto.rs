//! Typed request/response bodies, one per endpoint.
//!
//! Response fields the backend may omit are `Option`/`#[serde(default)]`, so a
//! missing list decodes as empty rather than failing the call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stockpad_auth::{SignedIn, Token};
use stockpad_core::{Category, Customer, Entity, EntityId, Individual};

use crate::error::ApiError;

/// Sign-in request body.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration request body.
///
/// `extra` carries any additional fields the backend asks for, flattened into
/// the top-level object.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignUpForm {
    pub entity_name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl core::fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("entity_name", &self.entity_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("extra", &self.extra)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityMembership {
    #[serde(default)]
    pub entity: Option<Entity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub entities: Vec<EntityMembership>,
    #[serde(default)]
    pub individual: Option<Individual>,
}

impl SignInResponse {
    /// The acting entity is the first membership's entity.
    ///
    /// A response without a usable token is rejected outright, so a "signed
    /// in" session always has one.
    pub fn into_signed_in(self) -> Result<SignedIn, ApiError> {
        let token = self
            .token
            .and_then(|raw| Token::new(raw))
            .ok_or_else(|| ApiError::Parse("sign-in response has no token".to_string()))?;

        Ok(SignedIn {
            token,
            entity: self.entities.into_iter().next().and_then(|m| m.entity),
            individual: self.individual,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory<'a> {
    pub category_name: &'a str,
    pub entity_id: EntityId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRename<'a> {
    pub category_name: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

/// The backend uses the singular `customer` key for the list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerListResponse {
    #[serde(default)]
    pub customer: Option<Vec<Customer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Extract a non-empty `message` from an error body, if it is JSON at all.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// The created category, when the add response carries it in full (either at
/// the root or under `category`).
pub fn created_category(body: &Value) -> Option<Category> {
    body.get("category")
        .and_then(|c| serde_json::from_value(c.clone()).ok())
        .or_else(|| serde_json::from_value(body.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockpad_core::CategoryId;

    #[test]
    fn sign_in_takes_first_entity() {
        let resp: SignInResponse = serde_json::from_value(json!({
            "token": "abc",
            "entities": [{ "entity": { "id": 1 } }, { "entity": { "id": 2 } }],
            "individual": { "id": 9, "name": "Jane" }
        }))
        .unwrap();

        let signed_in = resp.into_signed_in().unwrap();
        assert_eq!(signed_in.token.as_str(), "abc");
        assert_eq!(signed_in.entity.unwrap().id, Some(EntityId::new(1)));
        assert_eq!(signed_in.individual.unwrap().attributes["name"], "Jane");
    }

    #[test]
    fn sign_in_without_entities_has_no_entity() {
        let resp: SignInResponse = serde_json::from_value(json!({ "token": "abc" })).unwrap();
        let signed_in = resp.into_signed_in().unwrap();
        assert!(signed_in.entity.is_none());
        assert!(signed_in.individual.is_none());
    }

    #[test]
    fn sign_in_without_token_is_rejected() {
        let resp: SignInResponse =
            serde_json::from_value(json!({ "token": "", "entities": [] })).unwrap();
        assert!(matches!(resp.into_signed_in(), Err(ApiError::Parse(_))));
    }

    #[test]
    fn error_message_requires_json_message() {
        assert_eq!(
            error_message(r#"{"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(r#"{"error":"x"}"#), None);
    }

    #[test]
    fn created_category_at_root_or_nested() {
        let nested = json!({ "message": "ok", "category": { "id": 3, "category_name": "Tools" } });
        assert_eq!(
            created_category(&nested),
            Some(Category::new(CategoryId::new(3), "Tools"))
        );

        let root = json!({ "id": 4, "category_name": "Paint" });
        assert_eq!(created_category(&root).unwrap().id, CategoryId::new(4));

        assert_eq!(created_category(&json!({ "message": "ok" })), None);
    }

    #[test]
    fn list_responses_tolerate_missing_or_null() {
        let resp: CategoryListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.categories.is_none());
        let resp: CustomerListResponse = serde_json::from_value(json!({ "customer": null })).unwrap();
        assert!(resp.customer.is_none());
    }

    #[test]
    fn sign_up_form_flattens_extra_fields() {
        let mut extra = Map::new();
        extra.insert("phone_number".to_string(), json!("+1"));
        let form = SignUpForm {
            entity_name: "Acme".to_string(),
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
            extra,
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["phone_number"], "+1");
        assert!(!format!("{form:?}").contains("\"pw\""));
    }
}
