pub mod admin_resolver;
pub mod clock;
pub mod event_sink;
pub mod price_oracle;
pub mod upstream;
