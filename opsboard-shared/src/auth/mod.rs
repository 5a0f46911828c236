/// Authentication and authorization primitives shared across the workspace.
pub mod authorization;
pub mod jwt;
pub mod password;
