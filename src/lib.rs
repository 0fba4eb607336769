pub mod auth;
pub mod chunker;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod extract;
pub mod http;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod rag;
