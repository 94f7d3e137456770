//! Unit tests for `sift_core`.

mod support;

mod compare_tests;
mod node_tests;
mod query_tests;
mod results_tests;
mod search_tests;
