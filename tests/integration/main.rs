//! Integration tests for the hook registry.


mod bootstrap_test;
mod dispatch_test;
mod identity_test;
