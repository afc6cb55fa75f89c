//! TUI module: Terminal User Interface using Ratatui.
//!
//! Hosts the assessment engine:
//! - Intro screen with instructions
//! - Timed assessment with stimulus lights and answer palette
//! - Result screen with diagnosis and recommendations

mod app;
mod styles;
mod ticker;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
pub use ticker::{Tick, Ticker, TickerHandle, TICK_INTERVAL};
