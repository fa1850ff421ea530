//! Order book buy pressure.

use crate::domain::{InstrumentSnapshot, Signal, SignalDetails, SignalType};

use super::{scaled_strength, Detector, DetectorConfig};

/// Detects bid-heavy books and unusually large resting bids.
pub struct OrderBookDetector {
    config: DetectorConfig,
}

impl OrderBookDetector {
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    fn pressure(&self, snapshot: &InstrumentSnapshot) -> Option<Signal> {
        let depth = self.config.book_depth;
        let bid_notional = snapshot.order_book.bid_notional(depth);
        let ask_notional = snapshot.order_book.ask_notional(depth);
        if !bid_notional.is_finite() || !ask_notional.is_finite() || ask_notional <= 0.0 {
            return None;
        }

        let ratio = bid_notional / ask_notional;
        let signal_type = if ratio >= self.config.book_extreme_ratio {
            SignalType::ExtremeBuyPressure
        } else if ratio >= self.config.book_strong_ratio {
            SignalType::StrongBuyPressure
        } else {
            return None;
        };

        Some(Signal::new(
            &snapshot.symbol,
            signal_type,
            signal_type.base_strength(),
            snapshot.captured_at,
            SignalDetails::BookPressure {
                ratio,
                bid_notional,
                ask_notional,
            },
        ))
    }

    fn large_order(&self, snapshot: &InstrumentSnapshot) -> Option<Signal> {
        let level = snapshot.order_book.largest_bid(self.config.book_depth)?;
        let notional = level.notional();
        if !notional.is_finite() || notional < self.config.large_order_notional {
            return None;
        }

        Some(Signal::new(
            &snapshot.symbol,
            SignalType::LargeBuyOrders,
            scaled_strength(
                SignalType::LargeBuyOrders,
                notional,
                self.config.large_order_notional,
            ),
            snapshot.captured_at,
            SignalDetails::LargeOrder {
                price: level.price,
                notional,
            },
        ))
    }
}

impl Detector for OrderBookDetector {
    fn name(&self) -> &'static str {
        "order_book"
    }

    fn detect(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal> {
        self.pressure(snapshot)
            .into_iter()
            .chain(self.large_order(snapshot))
            .collect()
    }
}
