//! Application services: the use-cases behind the scheduler.
//!
//! Services take port implementations through generic parameters
//! (constructor injection), keeping this layer decoupled from concrete
//! adapters.

pub mod automation;
pub mod evaluator;
pub mod ledger;
pub mod planners;
pub mod snapshot;

#[cfg(test)]
mod fakes;
