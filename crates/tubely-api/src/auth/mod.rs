pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{JwtPrincipalResolver, PrincipalResolver};
pub use middleware::auth_middleware;
pub use models::{AuthUser, JwtClaims};
