//! Build script for the embedded `pull_requests` schema.
//!
//! `embed_migrations!` reads `migrations/` at compile time, which Cargo does
//! not track on its own; without this directive an edited `up.sql` would not
//! trigger a rebuild.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
