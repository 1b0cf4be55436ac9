//! Domain types for the rebalancing engine.

pub mod order;
pub mod score;
pub mod weights;
pub mod window;

pub use order::{Order, OrderDirection};
pub use score::ScoreSnapshot;
pub use weights::TargetWeights;
pub use window::TradeWindow;

/// Instrument identifier type alias
pub type InstrumentId = String;
