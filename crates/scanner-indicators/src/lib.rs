//! Causal technical indicators computed per symbol partition.
//!
//! This crate provides the indicator kernels used by the scan pipeline:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (ATR, Bollinger Bands)
//! - Volume indicators (RVOL, session VWAP, intraday RVOL)
//!
//! Every indicator output is aligned 1:1 with its input bars; `None` marks
//! warm-up or otherwise undefined values. Recursive smoothers (EMA, Wilder)
//! are explicit stateful folds seeded with their first input.

pub mod momentum;
pub mod moving_average;
pub mod panel;
pub mod volatility;
pub mod volume;

mod smooth;

pub use momentum::{Macd, MacdPoint, Rsi};
pub use moving_average::{Ema, Sma};
pub use panel::{apply, apply_multi, SeriesMap};
pub use volatility::{Atr, BollingerBands, BollingerPoint};
pub use volume::{IntradayRvol, Rvol, SessionVwap};
