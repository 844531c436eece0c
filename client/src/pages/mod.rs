//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates session changes
//! to `AuthContext`. Access control is applied in `app`, not in the pages.

pub mod dashboard;
pub mod home;
pub mod sign_in;
pub mod sign_up;
pub mod unauthorized;
