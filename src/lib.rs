//! Driver library for the Sitronix ST7735 TFT LCD controller, as fitted to the common 80x160 and
//! 128x128/128x160 SPI breakout modules.

#![cfg_attr(not(feature = "std"), no_std)]


pub mod codec;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod interface;

// Re-exports for primary API.
pub use codec::{rgb565, PixelSource};
pub use command::{consts, ColorMode};
pub use config::{Config, InvalidRotation, Rotation};
pub use display::{PixelCoord, St7735};
pub use error::Error;
pub use interface::spi::{SpiInterface, SpiInterfaceError, DEFAULT_SPI_SPEED_HZ, SPI_MODE};
pub use interface::DisplayInterface;
