// Test modules for the graphql-safe crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on business logic verification.

// Test helper utilities shared across test modules
pub mod helpers;

pub mod response;
