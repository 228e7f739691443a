//! Roles: login and superuser flags, with memberships reported on read

mod models;
mod repository;
mod service;
pub mod statements;

pub use models::Role;
pub use repository::{RoleRepository, ScyllaRoleRepository};
pub use service::RoleService;

#[cfg(test)]
pub use repository::MockRoleRepository;
