//! # Cadre API Server Library
//!
//! This library provides the core functionality for the Cadre API server.
//!
//! ## Modules
//!
//! - `admin`: Save interceptor stamping the requesting user into audit columns
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod admin;
pub mod app;
pub mod config;
pub mod error;
pub mod routes;
