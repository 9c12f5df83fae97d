//! Errors surfaced by the driver. Nothing here is recovered from or retried; bus and pin failures
//! are handed back exactly as the HAL reported them.

use core::fmt;

/// An error raised while driving the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<IfaceE, PinE> {
    /// The display interface (SPI bus or D/C line) failed.
    Interface(IfaceE),
    /// The reset or backlight line failed.
    Pin(PinE),
    /// An address window whose start lies past its end.
    InvalidWindow,
}

impl<IfaceE, PinE> fmt::Display for Error<IfaceE, PinE>
where
    IfaceE: fmt::Debug,
    PinE: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "display interface error: {:?}", e),
            Error::Pin(e) => write!(f, "control pin error: {:?}", e),
            Error::InvalidWindow => f.write_str("address window start lies past its end"),
        }
    }
}

#[cfg(feature = "std")]
impl<IfaceE, PinE> std::error::Error for Error<IfaceE, PinE>
where
    IfaceE: fmt::Debug,
    PinE: fmt::Debug,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn display_messages() {
        let e: Error<u8, ()> = Error::Interface(3);
        assert_eq!(e.to_string(), "display interface error: 3");
        let e: Error<u8, ()> = Error::Pin(());
        assert_eq!(e.to_string(), "control pin error: ()");
        let e: Error<u8, ()> = Error::InvalidWindow;
        assert_eq!(e.to_string(), "address window start lies past its end");
    }
}
