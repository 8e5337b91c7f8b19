//! Reminder and laundry notification scheduling.
//!
//! # Responsibility
//! - Poll reminder/laundry snapshots and decide which due or overdue
//!   items deserve a one-time alert.
//! - Keep clock and emission behind seams so scheduling stays
//!   deterministic under test.
//!
//! # Invariants
//! - The scheduler is explicitly constructed and explicitly started;
//!   there are no module-level singletons.
//! - Emission only happens while the notifier reports granted
//!   permission.

pub mod clock;
pub mod notifier;
pub mod scheduler;
pub mod worker;
