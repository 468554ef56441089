//! Unit tests for `exlint_core` types.
