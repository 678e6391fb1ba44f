//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Author of a message sent to the model.
///
/// # Examples
///
/// ```
/// use dramaturg_core::Role;
///
/// assert_ne!(Role::System, Role::User);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages carry the task
    User,
    /// Assistant messages are prior model turns
    Assistant,
}
