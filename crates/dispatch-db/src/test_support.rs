//! Shared test utilities for dispatch-db unit tests.
