mod jwt;
mod password;
mod traits;
mod user_service;

pub use jwt::{JwtAuthTokenProvider, JwtClaims, JwtConfig};
pub use password::Argon2PasswordService;
pub use traits::{AuthTokenProvider, PasswordService};
#[cfg(any(test, feature = "testing"))]
pub use traits::{MockAuthTokenProvider, MockPasswordService};
pub use user_service::UserService;
