//! Property test modules

mod layout_tests;
mod propagation_tests;
mod workspace_tests;
