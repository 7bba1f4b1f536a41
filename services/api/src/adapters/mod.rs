pub mod bunny;
pub mod db;
pub mod demo;

pub use bunny::BunnyVideoAdapter;
pub use db::DbAdapter;
pub use demo::{DemoAdapter, DemoVideoService};
