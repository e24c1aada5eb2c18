//! Integration test suite modules

mod reveal_flow;
mod timeline;
