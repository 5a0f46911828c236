/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `items`: Team-scoped item CRUD
/// - `onboarding`: First-team onboarding flow
/// - `teams`: Team and membership management
/// - `users`: Current user profile endpoints

pub mod health;
pub mod auth;
pub mod items;
pub mod onboarding;
pub mod teams;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes "absent" from "null".
///
/// `Option<Option<T>>` alone cannot make that distinction with serde:
/// a JSON null would collapse to the outer `None`. Wrapping the value
/// keeps absent as `None` (via `#[serde(default)]`) and null as
/// `Some(None)`, which the update queries use to clear a column.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
