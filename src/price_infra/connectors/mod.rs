pub mod static_feed;
