//! Test harness utilities shared by the bootstrap suites.

mod environment;
mod reporter;
mod resource_provider;
mod service_root;
mod world;

pub use environment::{FAKE_TOOL, FakeEnvironment};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use resource_provider::{RecordedHandle, RecordingResourceProvider, ResourceCall};
pub use service_root::{APP_CONFIG, ServiceRoot};
pub use world::{TestWorld, world};
