/// Module for handling the meta-transaction relay API
mod relay;
pub use relay::*;

/// Module for handling relayer nonce and status API
mod info;
pub use info::*;

/// Module for handling the service health API
mod health;
pub use health::*;
