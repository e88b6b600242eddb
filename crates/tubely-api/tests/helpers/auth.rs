use chrono::Duration;
use tubely_api::auth::JwtPrincipalResolver;
use uuid::Uuid;

/// Test signing secret (must match setup_test_app).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Mint a bearer token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    JwtPrincipalResolver::new(TEST_JWT_SECRET)
        .issue_token(user_id, Duration::hours(1))
        .expect("Failed to issue token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}
