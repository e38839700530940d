pub mod archive;
pub mod auth;
pub mod gatekeeper;
pub mod registry;
pub mod storage;
