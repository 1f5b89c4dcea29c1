//! 密码哈希功能单元测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use storefront_api::auth::password::PasswordHasher;

mod common;

/// 测试配置中的低成本参数
fn hasher() -> PasswordHasher {
    let config = common::create_test_config();
    PasswordHasher::from_config(&config.security).expect("Test params should be valid")
}

#[test]
fn test_password_hash_and_verify() {
    let hasher = hasher();
    let password = "TestPassword123!";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 哈希值应该包含 argon2id 标识
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains(password));

    assert!(hasher.verify(password, &hash));
}

#[test]
fn test_password_verify_with_wrong_password() {
    let hasher = hasher();
    let hash = hasher.hash("TestPassword123!").expect("Hashing should succeed");

    assert!(!hasher.verify("WrongPassword123!", &hash));
}

#[test]
fn test_password_hash_different_each_time() {
    let hasher = hasher();
    let password = "TestPassword123!";

    let hash1 = hasher.hash(password).expect("First hash should succeed");
    let hash2 = hasher.hash(password).expect("Second hash should succeed");

    // 由于随机盐，每次生成的哈希应该不同
    assert_ne!(hash1, hash2, "Hashes should be different due to salt");

    assert!(hasher.verify(password, &hash1));
    assert!(hasher.verify(password, &hash2));
}

#[test]
fn test_password_hash_unicode() {
    let hasher = hasher();
    let password = "contraseña-ñandú-🔒";

    let hash = hasher.hash(password).expect("Unicode password should hash");

    assert!(hasher.verify(password, &hash));
    assert!(!hasher.verify("contrasena-nandu-🔒", &hash));
}

#[test]
fn test_password_hash_long_password() {
    let hasher = hasher();
    let password = "a".repeat(500) + "B1!";

    let hash = hasher.hash(&password).expect("Long password should hash");

    assert!(hasher.verify(&password, &hash));
}

#[test]
fn test_verify_is_parameter_independent() {
    // 参数记录在摘要中，调整工作因子后旧摘要仍可验证
    let old = PasswordHasher::with_params(2048, 2, 1).unwrap();
    let hash = old.hash("pw").unwrap();

    assert!(hasher().verify("pw", &hash));
}

#[test]
fn test_malformed_digest_is_mismatch() {
    let hasher = hasher();

    assert!(!hasher.verify("pw", ""));
    assert!(!hasher.verify("pw", "not-a-hash"));
    assert!(!hasher.verify(
        "pw",
        "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"
    ));
}

#[test]
fn test_invalid_params_rejected() {
    assert!(PasswordHasher::with_params(1, 1, 1).is_err());
    assert!(PasswordHasher::with_params(1024, 0, 1).is_err());
}
