use domain::{Role, SessionContext, geo};

#[test]
fn session_context_builds() {
    let ctx = SessionContext::new("user-1", "admin@smartolt.com", Role::Admin);

    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.email, "admin@smartolt.com");
    assert_eq!(ctx.role, Role::Admin);
}

#[test]
fn latitude_bounds() {
    assert!(geo::latitude_in_range(-6.2088));
    assert!(geo::latitude_in_range(90.0));
    assert!(!geo::latitude_in_range(95.0));
    assert!(!geo::latitude_in_range(f64::NAN));
}

#[test]
fn longitude_bounds() {
    assert!(geo::longitude_in_range(106.8456));
    assert!(!geo::longitude_in_range(-180.5));
}
