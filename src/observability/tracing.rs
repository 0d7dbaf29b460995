use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::types::address::Address;

pub fn trace_price_query(proxy: &Address, write: bool) -> Span {
    tracing::debug_span!(
        "price_query",
        proxy = %proxy,
        write,
    )
}

pub fn trace_oracle_swap(proxy: &Address, candidate: &Address) -> Span {
    tracing::info_span!(
        "oracle_swap",
        proxy = %proxy,
        candidate = %candidate,
    )
}

/// Installs the global subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}
