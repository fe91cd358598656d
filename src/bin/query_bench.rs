//! Runs the fixed query workload under each eviction policy.
//!
//! Run with: `cargo run --bin query_bench [--no-delay] [policy ...]`
//!
//! Policy names are matched leniently; unknown names run as `lirs`. With no
//! names every policy is run. Set `RUST_LOG=debug` to see evictions.

use querycache::builder::PolicyKind;
use querycache::service::{QueryService, ServiceConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut no_delay = false;
    let mut kinds = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--no-delay" {
            no_delay = true;
        } else {
            kinds.push(PolicyKind::parse_lenient(&arg));
        }
    }
    if kinds.is_empty() {
        kinds.extend(PolicyKind::ALL);
    }

    let base = if no_delay {
        ServiceConfig::instant()
    } else {
        ServiceConfig::default()
    };

    let mut service = QueryService::try_new(base.clone())?;
    for kind in kinds {
        service.set_policy(kind.as_str(), base.capacity)?;
        let bench = service.run_benchmark();
        println!("{bench}");
        println!("  {}", service.report());
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}
