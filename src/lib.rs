// Library for tests to access modules

pub mod bridge;
pub mod config;
pub mod context;
pub mod error;
pub mod ipc;
pub mod local_backend;
pub mod models;
pub mod normalize;
pub mod site_ops;
pub mod status;
pub mod stores;
pub mod version;
