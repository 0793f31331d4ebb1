//! supacheck: verify that a Supabase project is reachable and healthy.
//!
//! A single `GET <project-url>/auth/v1/health` per check, exposed as a JSON
//! endpoint (`/api/supabase-check`) and a web form (`/supabase-check`).

pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod middleware;
pub mod probe;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::*;
