//! Integration test modules

mod commands_tests;
mod propagation_tests;
mod support;
mod workspace_tests;
