//! Unit tests for the `exlint` facade.

mod engine_tests;
