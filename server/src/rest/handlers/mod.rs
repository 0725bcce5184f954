//! REST-Handler

pub mod benutzer_service;
pub mod index;
pub mod session_auth;
pub mod users;
