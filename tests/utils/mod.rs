pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::ClientAssertions;
#[allow(unused_imports)]
pub use mocks::{MockSocket, RecordingRegistry, RegistryCall};
#[allow(unused_imports)]
pub use setup::{TestClient, TestSetup, TestSetupBuilder};
