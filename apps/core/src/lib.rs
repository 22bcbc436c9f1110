pub mod collector;
pub mod config;
pub mod contract;
pub mod logging;
pub mod model;
pub mod osascript;
pub mod pipeline;
pub mod ranker;
pub mod result_builder;
pub mod runtime;
pub mod search;
pub mod source;
pub mod static_cache;
pub mod text;
