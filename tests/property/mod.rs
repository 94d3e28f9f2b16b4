//! Property-based tests

mod render_laws;
