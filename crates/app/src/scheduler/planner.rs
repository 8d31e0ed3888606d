use marshal_domain::action::ScheduledAction;

/// Decides what a new cycle should contain.
///
/// Every `run()` asks the planners in their fixed order; each returns the
/// actions it wants appended behind the status marker.
pub trait Planner: Send + Sync {
    fn name(&self) -> &'static str;

    fn plan(&self) -> Vec<ScheduledAction>;
}
