pub mod chrome;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod framing;
pub mod host;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod replay;
pub mod service;
pub mod tab;
