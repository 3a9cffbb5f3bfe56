pub mod budget;
pub mod classify;
pub mod engagement;
pub mod filters;
pub mod invitations;
pub mod pacing;
pub mod prospector;
pub mod report;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
