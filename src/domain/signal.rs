//! Detector output: typed signals with a strength and structured details.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::market::Timeframe;

/// Every signal the detectors can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    ExtremeVolumeSpike,
    VolumeSpike,
    ElevatedVolume,
    MomentumAcceleration,
    #[serde(rename = "STRONG_5M_MOMENTUM")]
    Strong5mMomentum,
    #[serde(rename = "STRONG_15M_MOMENTUM")]
    Strong15mMomentum,
    #[serde(rename = "STRONG_1H_MOMENTUM")]
    Strong1hMomentum,
    ExtremeBuyPressure,
    StrongBuyPressure,
    LargeBuyOrders,
    BreakoutPattern,
    OpenInterestSurge,
    FundingRateSpike,
}

impl SignalType {
    pub const ALL: [Self; 13] = [
        Self::ExtremeVolumeSpike,
        Self::VolumeSpike,
        Self::ElevatedVolume,
        Self::MomentumAcceleration,
        Self::Strong5mMomentum,
        Self::Strong15mMomentum,
        Self::Strong1hMomentum,
        Self::ExtremeBuyPressure,
        Self::StrongBuyPressure,
        Self::LargeBuyOrders,
        Self::BreakoutPattern,
        Self::OpenInterestSurge,
        Self::FundingRateSpike,
    ];

    /// Strength assigned when the trigger threshold is just met.
    #[must_use]
    pub const fn base_strength(self) -> f64 {
        match self {
            Self::ExtremeVolumeSpike => 95.0,
            Self::ExtremeBuyPressure => 90.0,
            Self::MomentumAcceleration => 85.0,
            Self::BreakoutPattern => 80.0,
            Self::VolumeSpike => 75.0,
            Self::Strong5mMomentum | Self::StrongBuyPressure => 70.0,
            Self::Strong15mMomentum | Self::LargeBuyOrders | Self::OpenInterestSurge => 60.0,
            Self::ElevatedVolume | Self::Strong1hMomentum | Self::FundingRateSpike => 50.0,
        }
    }

    /// Upper bound for magnitude-scaled strengths: one below the next higher
    /// base strength, so a scaled signal never outranks a more severe type.
    #[must_use]
    pub fn strength_ceiling(self) -> f64 {
        let base = self.base_strength();
        Self::ALL
            .iter()
            .map(|t| t.base_strength())
            .filter(|b| *b > base)
            .min_by(f64::total_cmp)
            .map_or(100.0, |next| next - 1.0)
    }

    /// Wire name, e.g. `VOLUME_SPIKE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeVolumeSpike => "EXTREME_VOLUME_SPIKE",
            Self::VolumeSpike => "VOLUME_SPIKE",
            Self::ElevatedVolume => "ELEVATED_VOLUME",
            Self::MomentumAcceleration => "MOMENTUM_ACCELERATION",
            Self::Strong5mMomentum => "STRONG_5M_MOMENTUM",
            Self::Strong15mMomentum => "STRONG_15M_MOMENTUM",
            Self::Strong1hMomentum => "STRONG_1H_MOMENTUM",
            Self::ExtremeBuyPressure => "EXTREME_BUY_PRESSURE",
            Self::StrongBuyPressure => "STRONG_BUY_PRESSURE",
            Self::LargeBuyOrders => "LARGE_BUY_ORDERS",
            Self::BreakoutPattern => "BREAKOUT_PATTERN",
            Self::OpenInterestSurge => "OPEN_INTEREST_SURGE",
            Self::FundingRateSpike => "FUNDING_RATE_SPIKE",
        }
    }

    /// Human-readable label for alerts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtremeVolumeSpike => "Extreme volume spike",
            Self::VolumeSpike => "Volume spike",
            Self::ElevatedVolume => "Elevated volume",
            Self::MomentumAcceleration => "Momentum acceleration",
            Self::Strong5mMomentum => "Strong 5m momentum",
            Self::Strong15mMomentum => "Strong 15m momentum",
            Self::Strong1hMomentum => "Strong 1h momentum",
            Self::ExtremeBuyPressure => "Extreme buy pressure",
            Self::StrongBuyPressure => "Strong buy pressure",
            Self::LargeBuyOrders => "Large buy orders",
            Self::BreakoutPattern => "Breakout pattern",
            Self::OpenInterestSurge => "Open interest surge",
            Self::FundingRateSpike => "Funding rate spike",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::ExtremeVolumeSpike | Self::VolumeSpike | Self::ElevatedVolume => "📊",
            Self::MomentumAcceleration => "🚀",
            Self::Strong5mMomentum | Self::Strong15mMomentum | Self::Strong1hMomentum => "📈",
            Self::ExtremeBuyPressure | Self::StrongBuyPressure => "💪",
            Self::LargeBuyOrders => "🐋",
            Self::BreakoutPattern => "💥",
            Self::OpenInterestSurge => "📂",
            Self::FundingRateSpike => "💸",
        }
    }

    /// Parse a wire name such as `VOLUME_SPIKE`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed, per-signal display payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalDetails {
    Volume {
        ratio: f64,
        current: f64,
        average: f64,
    },
    Momentum {
        timeframe: Timeframe,
        change_pct: f64,
    },
    Acceleration {
        change_5m: f64,
        change_15m: f64,
        change_1h: f64,
    },
    BookPressure {
        ratio: f64,
        bid_notional: f64,
        ask_notional: f64,
    },
    LargeOrder {
        price: f64,
        notional: f64,
    },
    Breakout {
        range_pct: f64,
        volume_ratio: f64,
    },
    OpenInterest {
        change_pct: f64,
        current: f64,
    },
    Funding {
        delta: f64,
        current: f64,
    },
}

impl fmt::Display for SignalDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume { ratio, .. } => write!(f, "{ratio:.1}x avg volume"),
            Self::Momentum {
                timeframe,
                change_pct,
            } => write!(f, "{change_pct:+.2}% in {timeframe}"),
            Self::Acceleration {
                change_5m,
                change_15m,
                change_1h,
            } => write!(
                f,
                "5m {change_5m:+.2}% / 15m {change_15m:+.2}% / 1h {change_1h:+.2}%"
            ),
            Self::BookPressure { ratio, .. } => write!(f, "bid/ask {ratio:.2}"),
            Self::LargeOrder { price, notional } => {
                write!(f, "${:.0}k bid at {price}", notional / 1_000.0)
            }
            Self::Breakout {
                range_pct,
                volume_ratio,
            } => write!(f, "range {range_pct:.2}%, volume {volume_ratio:.1}x"),
            Self::OpenInterest { change_pct, .. } => write!(f, "OI {change_pct:+.2}%"),
            Self::Funding { delta, current } => write!(
                f,
                "funding {:.4}% (Δ {:+.4}%)",
                current * 100.0,
                delta * 100.0
            ),
        }
    }
}

/// One detector firing for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub signal_type: SignalType,
    /// 0 to 100.
    pub strength: f64,
    pub timestamp: DateTime<Utc>,
    pub details: SignalDetails,
}

impl Signal {
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        signal_type: SignalType,
        strength: f64,
        timestamp: DateTime<Utc>,
        details: SignalDetails,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            signal_type,
            strength,
            timestamp,
            details,
        }
    }
}
