//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  detectors · scanner    ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Market  │            │   Signal    │              │ Notifier  │
//! │  Data   │            │   Journal   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;

pub use outbound::exchange::MarketDataClient;
pub use outbound::journal::SignalJournal;
pub use outbound::notifier::{LogNotifier, Notifier, NotifierRegistry, NullNotifier};
