//! External service module
//!
//! The host shutdown primitive and the coordinator that runs it when a
//! countdown completes.

pub mod shutdown;
pub mod system;

// Re-export main types
pub use shutdown::ShutdownCoordinator;
pub use system::{check_shutdown_available, DryRunShutdown, HostShutdown, ShutdownPrimitive};
