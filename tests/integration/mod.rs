//! Integration tests for the ctxlog structured logging layer

mod adapter_stack;
mod compact_output;
mod config_integration;
mod registry_broadcast;
mod stream_redirect;
mod tree_output;
