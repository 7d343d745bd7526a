//! Request handlers and the service functions behind them.
//!
//! Each module exposes a `*_impl` function holding the logic and a thin axum
//! handler that adapts extractors and maps errors.

pub mod liked;
pub mod search;
pub mod swipe;
