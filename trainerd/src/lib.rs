//! Orchestration service for adversarial image training.
//!
//! Accepts images over a single-method RPC surface, hands them to an
//! external augmentation routine and an external training script, and
//! keeps the resulting network weights and augmented images in a
//! persisted key/value state blob.

pub mod codec;
pub mod config;
pub mod error;
pub mod external;
pub mod layout;
pub mod orchestrator;
pub mod server;
pub mod state;

pub use codec::JpegCodec;
pub use error::ServiceErr;
pub use layout::Layout;
pub use orchestrator::Orchestrator;
pub use server::Server;
pub use state::StateStore;
