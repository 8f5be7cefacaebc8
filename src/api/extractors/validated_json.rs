//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body that has passed its `validator` rules. Malformed JSON and
/// rule violations both surface as `AppError::Validation`.
///
/// ```rust,ignore
/// async fn add_address(ValidatedJson(payload): ValidatedJson<AddressRequest>) {
///     // payload.city is non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Join field messages, falling back to "<field> is invalid". Nested structs
/// and lists contribute their own messages.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.join(", ")
}

fn collect_messages(errors: &validator::ValidationErrors, messages: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => messages.extend(errs.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })),
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, messages);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct QuantityRequest {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: u32,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_rule_violation_is_validation_error() {
        let result =
            ValidatedJson::<QuantityRequest>::from_request(json_request(r#"{"quantity":0}"#), &())
                .await;
        match result {
            Err(AppError::Validation(message)) => assert_eq!(message, "Quantity must be at least 1"),
            _ => panic!("expected validation error"),
        }
    }

    #[derive(Debug, Deserialize, Validate)]
    struct BasketRequest {
        #[validate(nested)]
        lines: Vec<QuantityRequest>,
    }

    #[tokio::test]
    async fn test_nested_list_messages_are_reported() {
        let result = ValidatedJson::<BasketRequest>::from_request(
            json_request(r#"{"lines":[{"quantity":2},{"quantity":0}]}"#),
            &(),
        )
        .await;
        match result {
            Err(AppError::Validation(message)) => assert_eq!(message, "Quantity must be at least 1"),
            _ => panic!("expected validation error"),
        }
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let ValidatedJson(payload) =
            ValidatedJson::<QuantityRequest>::from_request(json_request(r#"{"quantity":3}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.quantity, 3);
    }
}
