//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_repository;
mod in_memory_role_permissions_repository;
mod logging_role_permissions_repository;

pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_role_permissions_repository::InMemoryRolePermissionsRepository;
pub use logging_role_permissions_repository::LoggingRolePermissionsRepository;
