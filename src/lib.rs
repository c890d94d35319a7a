pub mod classifier;
pub mod config;
pub mod db;
pub mod dedup;
pub mod drafts;
pub mod entities;
pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod repositories;
