//! Unit tests for the capability domain.

mod matching_tests;
