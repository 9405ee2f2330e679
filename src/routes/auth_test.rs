use super::*;

#[test]
fn validation_errors_are_bad_request() {
    for (err, message) in [
        (AuthError::PasswordTooShort, "Password must be at least 8 characters"),
        (AuthError::UsernameTaken, "Username already taken"),
        (AuthError::EmailTaken, "email already exists"),
        (AuthError::InvalidCredentials, "Invalid credentials"),
    ] {
        let api = ApiError::from(err);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, message);
    }
}

#[test]
fn bad_token_is_unauthorized() {
    let keys = auth_svc::JwtKeys::new("a", 60);
    let err = keys.verify("garbage").unwrap_err();
    assert_eq!(ApiError::from(err), ApiError::unauthorized());
}

#[test]
fn database_errors_are_hidden() {
    let api = ApiError::from(AuthError::Db(sqlx::Error::PoolTimedOut));
    assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(api.message, "Internal server error");
}
