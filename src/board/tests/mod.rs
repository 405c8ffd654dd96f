//! Unit tests for the board module.

mod board_tests;
mod recommendation_tests;
mod support;
