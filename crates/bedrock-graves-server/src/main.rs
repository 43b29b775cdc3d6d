//! bedrock-graves headless host entry point.
//!
//! Wires the in-memory host, the capability cache, the intercepting
//! connection sink, and the overlay engine together, then drives the engine
//! from a fixed-rate tick loop until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()             -- bedrock-graves.toml or defaults
//!  └─ Capability::resolve()     -- static oracle from general.restricted_viewers
//!  └─ place demo graves         -- retried through the TaskQueue
//!  └─ tick loop (50 ms)
//!       ├─ TaskQueue::drain()
//!       ├─ OverlayEngine::on_host_tick()
//!       └─ OverlayEngine::evaluate() for every grave
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bedrock_graves_core::{BlockPos, ObjectKey, Vec3, WorldId};
use tracing::{info, trace};
use tracing_subscriber::EnvFilter;

use bedrock_graves_server::application::capability::{Capability, CapabilityCache};
use bedrock_graves_server::application::deferred::TaskQueue;
use bedrock_graves_server::application::gui_intercept::{InterceptingSink, OutboundInterceptor};
use bedrock_graves_server::application::overlay_engine::{OverlayEngine, OverlayPorts};
use bedrock_graves_server::application::ports::CapabilityOracle;
use bedrock_graves_server::application::retry::RetryPolicy;
use bedrock_graves_server::infrastructure::host::{
    place_grave_with_retry, InMemoryWorld, StaticOracle, SystemClock,
};
use bedrock_graves_server::infrastructure::network::outbound::ConnectionSink;
use bedrock_graves_server::infrastructure::storage::config::{
    config_file_path, load_config, AppConfig,
};

/// Length of one host tick.
const TICK: Duration = Duration::from_millis(50);

/// World that restricted viewers join in the headless host.
const SPAWN_WORLD: &str = "minecraft:overworld";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_file_path();
    let config = load_config(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    config.overlay.validate()?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    info!("bedrock-graves starting (config: {})", path.display());

    let world = Arc::new(InMemoryWorld::new());
    let connections = Arc::new(ConnectionSink::new());
    let tasks = TaskQueue::new();

    let restricted = config.general.restricted_viewers.clone();
    let oracle_source = move || -> Option<Arc<dyn CapabilityOracle>> {
        if restricted.is_empty() {
            None
        } else {
            Some(Arc::new(StaticOracle::new(restricted.iter().copied())))
        }
    };
    let capability = Arc::new(CapabilityCache::new(Capability::resolve(&oracle_source)));

    let sink = Arc::new(InterceptingSink::new(
        Arc::clone(&connections) as _,
        OutboundInterceptor::new(Arc::clone(&capability)),
    ));
    let ports = OverlayPorts {
        graves: Arc::clone(&world) as _,
        world: Arc::clone(&world) as _,
        sink,
        ui: Arc::clone(&world) as _,
        clock: Arc::new(SystemClock),
    };
    let mut engine = OverlayEngine::new(config.overlay_settings(), ports, Arc::clone(&capability));

    world.load_world(WorldId::new(SPAWN_WORLD));
    join_restricted_viewers(&config, &world, &connections);
    place_demo_graves(&config, &world, &tasks);

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("bedrock-graves ready.  Press Ctrl-C to exit.");

    let mut interval = tokio::time::interval(TICK);
    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                tasks.drain();
                engine.on_host_tick(tick);
                for key in world.grave_keys() {
                    engine.evaluate(&key, tick);
                }
                tick = tick.wrapping_add(1);
            }
        }
    }

    info!(
        "bedrock-graves stopped after {tick} tick(s); {} overlay(s) were active",
        engine.tracked_pairs()
    );
    Ok(())
}

/// Connects every configured restricted viewer at the world origin and
/// drains its outbound frames.
fn join_restricted_viewers(config: &AppConfig, world: &InMemoryWorld, connections: &ConnectionSink) {
    for viewer in &config.general.restricted_viewers {
        let viewer = *viewer;
        world.join(viewer, WorldId::new(SPAWN_WORLD), Vec3::new(0.5, 64.0, 0.5));
        let mut rx = connections.register(viewer);
        tokio::spawn(async move {
            let mut frames: u64 = 0;
            while let Some(frame) = rx.recv().await {
                frames += 1;
                trace!("viewer {viewer}: frame #{frames} ({} bytes)", frame.len());
            }
        });
        info!("restricted viewer {viewer} joined {SPAWN_WORLD}");
    }
}

fn place_demo_graves(config: &AppConfig, world: &Arc<InMemoryWorld>, tasks: &TaskQueue) {
    for grave in &config.demo_graves {
        let world_id = WorldId::new(grave.world.as_str());
        if !world.is_loaded(&world_id) {
            world.load_world(world_id.clone());
        }
        let key = ObjectKey::new(world_id, BlockPos::new(grave.x, grave.y, grave.z));
        place_grave_with_retry(
            tasks,
            Arc::clone(world),
            key,
            grave.snapshot(),
            RetryPolicy::default(),
        );
    }
}
