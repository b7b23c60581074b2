use domain::{Role, SessionContext};
use olt_auth::{AuthError, JwtManager};

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let ctx = SessionContext::new("user-1", "admin@smartolt.com", Role::Admin);

    let tokens = jwt.issue_tokens(&ctx).expect("tokens");
    let access_ctx = jwt.decode_access(&tokens.access_token).expect("access");
    let grant = jwt.decode_refresh(&tokens.refresh_token).expect("refresh");

    assert_eq!(access_ctx.email, "admin@smartolt.com");
    assert_eq!(access_ctx.role, Role::Admin);
    assert_eq!(grant.session.user_id, "user-1");
    assert_eq!(grant.jti, tokens.refresh_jti);
    assert!(tokens.expires_at_ms > 0);
}

#[test]
fn token_types_are_not_interchangeable() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let ctx = SessionContext::new("user-1", "a@example.com", Role::Viewer);
    let tokens = jwt.issue_tokens(&ctx).expect("tokens");

    assert!(matches!(
        jwt.decode_access(&tokens.refresh_token),
        Err(AuthError::TokenInvalid)
    ));
    assert!(matches!(
        jwt.decode_refresh(&tokens.access_token),
        Err(AuthError::TokenInvalid)
    ));
}

#[test]
fn foreign_secret_is_rejected() {
    let issuer = JwtManager::new("secret-a".to_string(), 3600, 7200);
    let verifier = JwtManager::new("secret-b".to_string(), 3600, 7200);
    let ctx = SessionContext::new("user-1", "a@example.com", Role::Viewer);
    let tokens = issuer.issue_tokens(&ctx).expect("tokens");
    assert!(matches!(
        verifier.decode_access(&tokens.access_token),
        Err(AuthError::TokenInvalid)
    ));
}
