//! Integration tests for gradewatch-push
//!
//! Uses wiremock to simulate the PushPlus endpoint and verifies the
//! request shape and the interpretation of its answers.

mod common;

mod test_push;
mod test_notify;
