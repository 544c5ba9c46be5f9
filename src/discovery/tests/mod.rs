//! Unit tests for discovery queries, ranking and subscriptions.
