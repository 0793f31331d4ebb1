//! Liveness endpoint for container orchestration.
//!
//! Reports only that the process answers HTTP. It does not probe Supabase;
//! that is what `/api/supabase-check` is for.

pub async fn health() -> &'static str {
    "ok"
}
