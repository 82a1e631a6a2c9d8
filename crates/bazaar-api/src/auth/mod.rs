//! Authentication and authorization
//!
//! Author: hephaex@gmail.com

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod registry;
pub mod service;

pub use jwt::{Claims, JwtConfig, TokenUse};
pub use middleware::{auth_middleware, AuthenticatedUser};
pub use registry::{InMemoryTokenRegistry, TokenRegistry};
pub use service::AuthService;
