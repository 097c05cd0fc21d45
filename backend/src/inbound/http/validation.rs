//! Translation of payload validation failures into `400` responses.
//!
//! Each error carries `{field, code}` details so clients can point at the
//! offending input without parsing messages.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{
    AuthValidationError, Error, OrderValidationError, ProductValidationError,
    ReviewValidationError, UserValidationError,
};

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::bad_request(message).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn user_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::InvalidId => ("id", "invalid_id"),
        UserValidationError::EmptyName => ("name", "empty_name"),
        UserValidationError::NameLength { .. } => ("name", "name_length"),
        UserValidationError::EmptyEmail => ("email", "empty_email"),
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
        UserValidationError::UnknownRole => ("role", "unknown_role"),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn auth_error(err: AuthValidationError) -> Error {
    let (field, code) = match &err {
        AuthValidationError::MissingCredentials => ("credentials", "missing_credentials"),
        AuthValidationError::MissingPasswords => ("password", "missing_passwords"),
        AuthValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
        AuthValidationError::User(inner) => return user_error(inner.clone()),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn product_error(err: ProductValidationError) -> Error {
    let code = match &err {
        ProductValidationError::EmptyName => "empty_name",
        ProductValidationError::NameLength { .. } => "name_length",
        ProductValidationError::NegativePrice => "negative_price",
        ProductValidationError::EmptyDescription => "empty_description",
        ProductValidationError::DescriptionLength { .. } => "description_length",
        ProductValidationError::EmptyCategory => "empty_category",
        ProductValidationError::UnknownCategory { .. } => "unknown_category",
        ProductValidationError::EmptyCompany => "empty_company",
        ProductValidationError::UnknownCompany { .. } => "unknown_company",
        ProductValidationError::NoColors => "no_colors",
        ProductValidationError::InventoryTooLow { .. } => "inventory_too_low",
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn review_error(err: ReviewValidationError) -> Error {
    let code = match &err {
        ReviewValidationError::RatingOutOfRange { .. } => "rating_out_of_range",
        ReviewValidationError::EmptyTitle => "empty_title",
        ReviewValidationError::TitleTooLong { .. } => "title_too_long",
        ReviewValidationError::EmptyComment => "empty_comment",
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn order_error(err: OrderValidationError) -> Error {
    let (field, code) = match &err {
        OrderValidationError::EmptyCart => ("items", "empty_cart"),
        OrderValidationError::MissingCharges => ("charges", "missing_charges"),
        OrderValidationError::InvalidAmount => ("amount", "invalid_amount"),
        OrderValidationError::TotalOverflow => ("total", "total_overflow"),
        OrderValidationError::MissingPaymentIntent => ("paymentIntentId", "missing_payment_intent"),
        OrderValidationError::UnknownStatus { .. } => ("status", "unknown_status"),
    };
    field_error(field, code, err.to_string())
}

/// Parse an identifier taken from a path or payload.
///
/// Malformed ids cannot name an existing entity, so they read as `404`.
pub(crate) fn entity_id<T: FromStr>(raw: &str, entity: &str) -> Result<T, Error> {
    raw.parse::<T>()
        .map_err(|_| Error::not_found(format!("No {entity} with id {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, ProductId};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn product_errors_name_their_field() {
        let err = product_error(ProductValidationError::UnknownCompany {
            value: "acme".into(),
        });
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.message(), "acme is not supported");
        assert_eq!(detail(&err, "field"), Some("company"));
        assert_eq!(detail(&err, "code"), Some("unknown_company"));
    }

    #[rstest]
    fn nested_user_errors_keep_their_own_field() {
        let err = auth_error(AuthValidationError::User(UserValidationError::InvalidEmail));
        assert_eq!(detail(&err, "field"), Some("email"));
        assert_eq!(detail(&err, "code"), Some("invalid_email"));
    }

    #[rstest]
    #[case(OrderValidationError::EmptyCart, "No items in cart")]
    #[case(OrderValidationError::MissingCharges, "Please provide tax and shipping fee")]
    fn order_errors_keep_client_messages(
        #[case] err: OrderValidationError,
        #[case] message: &str,
    ) {
        assert_eq!(order_error(err).message(), message);
    }

    #[rstest]
    fn malformed_ids_are_not_found() {
        let err = entity_id::<ProductId>("nope", "product").expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "No product with id nope");
    }
}
