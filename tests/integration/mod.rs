//! Integration tests for the HRMS Portal client
//!
//! These tests drive the client, the department screen and the sign-in flows
//! against a mock HRMS backend over real HTTP.

mod client_tests;
