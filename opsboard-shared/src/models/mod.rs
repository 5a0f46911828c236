/// Database models for Opsboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication state
/// - `team`: Teams, the unit of multi-tenant isolation
/// - `membership`: The user-team many-to-many relation
/// - `item`: Items, always owned by a user and scoped to a team

pub mod item;
pub mod membership;
pub mod team;
pub mod user;
