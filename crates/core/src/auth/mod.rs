//! Auth module - identity models and the auth service trait.

mod auth_model;
mod auth_traits;

pub use auth_model::{AuthResponse, Credentials, NewUser, ProfileUpdate, User};
pub use auth_traits::{AuthServiceTrait, UserServiceTrait};
