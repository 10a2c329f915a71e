pub mod auth;
pub mod chat;
pub mod client;
pub mod error;

pub use auth::{LoginOutcome, LoginPayload, SignupPayload, UserProfile};
pub use chat::{ChatRequest, ChatResponse};
pub use client::ApiClient;
pub use error::ApiError;
