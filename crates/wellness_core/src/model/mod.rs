//! Domain model for daily wellness check-ins.
//!
//! # Responsibility
//! - Define the canonical record shape persisted by the check-in store.
//! - Keep caller input separate from store-assigned fields.
//!
//! # Invariants
//! - The record shape is fixed; there is no schema version field.
//! - `timestamp` is assigned by the store, never by callers.

pub mod checkin;
