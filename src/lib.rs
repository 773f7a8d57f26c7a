//! Authenticated profile and notes server.
//!
//! Requests pass through session resolution and, for pages, the route guard.
//! RPC procedures reach storage only through repositories bound to the
//! verified session's user.

pub mod app;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
