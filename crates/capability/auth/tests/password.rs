use olt_auth::{hash_password, verify_password};

#[test]
fn argon2_hash_verifies() {
    let hash = hash_password("Admin123!").expect("hash");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "Admin123!").expect("check"));
}

#[test]
fn wrong_password_rejected() {
    let hash = hash_password("Admin123!").expect("hash");
    assert!(!verify_password(&hash, "bad").expect("check"));
}

#[test]
fn same_password_hashes_differ() {
    let first = hash_password("Admin123!").expect("hash");
    let second = hash_password("Admin123!").expect("hash");
    assert_ne!(first, second);
}

#[test]
fn plaintext_stored_value_is_an_error() {
    assert!(verify_password("Admin123!", "Admin123!").is_err());
}
