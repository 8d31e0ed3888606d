//! # marshal-domain
//!
//! Pure domain model for the marshal game automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Describe the game as the core sees it (**zones**, **grids**, **specialists**, **rosters**)
//! - Define **Game commands** and the **Actions** the scheduler dispatches
//! - Aggregate owned units into the **Unit ledger**
//! - Build **Battle snapshots** and decide battle phases (move → load → attack → attacking)
//! - Define **Templates**, **Steps** and **Plans**
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod battle;
pub mod command;
pub mod event;
pub mod ledger;
pub mod plan;
pub mod roster;
pub mod specialist;
pub mod zone;
