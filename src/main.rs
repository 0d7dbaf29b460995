use std::sync::Arc;
use anyhow::Context;
use lend_oracle::config::loader::AppConfig;
use lend_oracle::deployment::Deployment;
use lend_oracle::events::oracle::InMemoryEventLog;
use lend_oracle::interfaces::clock::SystemClock;
use lend_oracle::interfaces::event_sink::EventSink;
use lend_oracle::observability::metrics::register_metrics;
use lend_oracle::observability::tracing::init_tracing;
use lend_oracle::PriceOracle;

fn main() -> anyhow::Result<()> {
    let env = std::env::args().nth(1).unwrap_or_else(|| "development".to_string());
    let config = AppConfig::load(&env).with_context(|| format!("loading config for {}", env))?;

    init_tracing(&config.logging.filter, config.logging.json);
    register_metrics().context("registering metrics")?;

    let events = Arc::new(InMemoryEventLog::new());
    let deployment = Deployment::from_config(
        &config,
        Arc::new(SystemClock),
        Some(events.clone() as Arc<dyn EventSink>),
    )
    .context("deploying oracle")?;
    let proxy = &deployment.proxy;

    println!("_____INITIAL IMPLEMENTATION_____");
    println!("Oracle proxy at address {}", proxy.address());
    println!("Proxy implementation at address {}", proxy.implementation()?);
    println!("Oracle price is {}", proxy.price()?);

    let admin = config.factory.admin;
    for candidate in deployment.composites.iter().skip(1) {
        println!("_____ROTATING TO {}_____", candidate.address());
        match proxy.set_price_oracle(admin, Arc::clone(candidate)) {
            Ok(()) => println!("Implementation set"),
            Err(e) => println!("Rotation rejected: {}", e),
        }
        println!("Proxy implementation at address {}", proxy.implementation()?);
        println!("Oracle price is {}", proxy.price()?);
    }

    println!("_____PRICE_W_____");
    println!("Write-path price is {}", proxy.price_w()?);

    for event in events.events() {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
