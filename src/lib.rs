//! # medportal
//!
//! Client-side session and authorization core for the MedPortal
//! patient/doctor/admin portals.
//!
//! ARCHITECTURE
//! ============
//! Leaf first: `storage` persists two string entries, `gateway` talks to the
//! REST backend, `role` derives flags and redirect targets, `session` owns
//! the auth state, `guard` decides every navigation and `signup` drives the
//! OTP sign-up steps. The `cli/` and `client/` crates are thin shells over
//! these modules.

pub mod config;
pub mod gateway;
pub mod guard;
pub mod role;
pub mod session;
pub mod signup;
pub mod storage;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ConfigError, PortalConfig};
pub use gateway::{AuthGateway, GatewayError};
pub use guard::GuardDecision;
pub use role::{Role, RoleFlags};
pub use session::{Revalidation, Session, SessionError, SessionStore};
pub use signup::{SignupFlow, SignupStep};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use types::{AuthGrant, Credentials, SignupRequest, UserProfile};
