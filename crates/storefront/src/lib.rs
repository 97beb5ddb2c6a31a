//! Tastebud storefront client library.
//!
//! The pieces a storefront front end needs: a typed gateway to the REST
//! backend, a session manager that keeps the bearer token and user record
//! consistent across restarts, and a reducer-driven cart store.
//!
//! Consumers build an [`AppState`](state::AppState) once and share it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
