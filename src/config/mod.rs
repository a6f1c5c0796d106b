pub mod engine;
pub mod schema;

pub use engine::{EngineConfig, PositionalConfig};
pub use schema::{BrowserConfig, Override, ProbeConfig, TargetUrl, Viewport};
