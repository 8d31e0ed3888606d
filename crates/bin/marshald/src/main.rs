//! # marshald: marshal daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (`marshal.toml`, env vars)
//! - Initialise logging (`tracing-subscriber` with an `EnvFilter`)
//! - Construct the virtual world (game state + command sink adapter)
//! - Construct the orchestration context, planners and action handler
//! - Spawn the action scheduler and the world ticker
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use marshal_adapter_http_axum::state::AppState;
use marshal_adapter_virtual::VirtualWorld;
use marshal_app::context::OrchestrationContext;
use marshal_app::event_bus::InProcessEventBus;
use marshal_app::scheduler::{Planner, Scheduler};
use marshal_app::services::automation::AutomationHandler;
use marshal_app::services::planners::{AdventurePlanner, RecruitmentPlanner};
use marshal_domain::plan::Plan;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Game
    let world = Arc::new(VirtualWorld::demo());
    let ticker = tokio::spawn(tick_world(
        Arc::clone(&world),
        Duration::from_millis(config.world.tick_ms),
    ));

    // Orchestration
    let context = Arc::new(OrchestrationContext::new());
    if let Some(template) = config.startup_template()? {
        context.select_plan(Plan::from_template(template, config.automation.repeats)?);
    }
    let event_bus = Arc::new(InProcessEventBus::new(256));
    let scheduler_config = config.scheduler_config();
    let handler = AutomationHandler::new(
        Arc::clone(&world),
        Arc::clone(&world),
        Arc::clone(&context),
        scheduler_config.evaluation_interval,
    );
    // recruitment first, so a cycle's evaluation sees the fresh ledger
    let planners: Vec<Box<dyn Planner>> = vec![
        Box::new(RecruitmentPlanner::new(
            Arc::clone(&world),
            Arc::clone(&context),
            config.recruit_target(),
        )),
        Box::new(AdventurePlanner::new(Arc::clone(&context))),
    ];
    let (scheduler, scheduler_task) = Scheduler::spawn(
        scheduler_config,
        handler,
        planners,
        Arc::clone(&event_bus),
    );
    scheduler.run().await?;

    // HTTP
    let state = AppState::new(scheduler.clone(), context, event_bus);
    let app = marshal_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "marshald listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    if let Err(err) = scheduler.shutdown().await {
        tracing::warn!(%err, "scheduler already stopped");
    }
    if let Err(err) = scheduler_task.await {
        tracing::warn!(%err, "scheduler task failed");
    }
    ticker.abort();

    Ok(())
}

/// Let game time pass in the virtual world at wall-clock pace.
async fn tick_world(world: Arc<VirtualWorld>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // the first tick completes immediately
    interval.tick().await;
    loop {
        interval.tick().await;
        world.advance(every);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
