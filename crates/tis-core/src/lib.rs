#![deny(missing_docs)]
#![doc = "Core contracts for transition interface sampling: the shared error surface, deterministic randomness, order-parameter traits and tracing setup."]

pub mod errors;
pub mod logging;
pub mod order;
pub mod rng;

pub use errors::{ErrorInfo, TisError};
pub use logging::{init_tracing, TracingConfig};
pub use order::{DistanceParameter, FnDistanceParameter, FnOrderParameter, OrderParameter};
pub use rng::{derive_substream_seed, RngHandle};
