//! The command set for the ST7735.
//!
//! Note 1: The display RAM of the ST7735 is 132 columns by 162 rows of 18-bit pixels regardless
//! of the glass actually fitted. Smaller panels are wired to a sub-rectangle of it, which is why
//! column and row addresses carry an offset (see `Config::offset`).
//!
//! Note 2: The controller has no way to acknowledge or read back register writes over the
//! write-only 4-wire bus. A wrong parameter byte shows up as a blank or garbled panel, never as
//! an error, so the literal register values below must match the datasheet exactly.

use crate::interface::DisplayInterface;

pub mod consts {
    //! Opcodes and memory dimensions.

    pub const NUM_MEMORY_COLS: u16 = 132;
    pub const NUM_MEMORY_ROWS: u16 = 162;

    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;

    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const FRMCTR3: u8 = 0xB3;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const PWCTR4: u8 = 0xC3;
    pub const PWCTR5: u8 = 0xC4;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

use self::consts::*;

/// Row address order (mirror Y).
pub const MADCTL_MY: u8 = 0x80;
/// Column address order (mirror X).
pub const MADCTL_MX: u8 = 0x40;
/// Row/column exchange.
pub const MADCTL_MV: u8 = 0x20;
/// Color order bit. Set for the panels this driver targets, whose subpixels are wired BGR.
pub const MADCTL_RGB_ORDER: u8 = 0x08;

/// Mandatory pause after `SWRESET`, in milliseconds.
pub const SWRESET_DELAY_MS: u16 = 150;
/// Mandatory pause after `SLPOUT`, in milliseconds.
pub const SLPOUT_DELAY_MS: u16 = 500;
/// Pause after `NORON`, in milliseconds.
pub const NORON_DELAY_MS: u16 = 10;
/// Pause after `DISPON`, in milliseconds.
pub const DISPON_DELAY_MS: u16 = 100;

/// Frame rate, inversion, power and VCOM registers, written in order during initialization.
/// None of these depend on the panel configuration.
pub static POWER_SEQUENCE: [(u8, &[u8]); 9] = [
    // Frame rate = fosc/(1x2+40) * (LINE+2C+2D), normal mode.
    (FRMCTR1, &[0x01, 0x2C, 0x2D]),
    // Idle mode.
    (FRMCTR2, &[0x01, 0x2C, 0x2D]),
    // Partial mode: dot inversion then line inversion.
    (FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]),
    // No inversion.
    (INVCTR, &[0x07]),
    // -4.6V, auto mode.
    (PWCTR1, &[0xA2, 0x02, 0x84]),
    // Opamp current small, boost frequency.
    (PWCTR2, &[0x0A, 0x00]),
    // BCLK/2, opamp current small and medium low.
    (PWCTR4, &[0x8A, 0x2A]),
    (PWCTR5, &[0x8A, 0xEE]),
    (VMCTR1, &[0x0E]),
];

/// Positive polarity gamma correction.
pub static GAMMA_POSITIVE: [u8; 16] = [
    0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10,
];

/// Negative polarity gamma correction.
pub static GAMMA_NEGATIVE: [u8; 16] = [
    0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10,
];

/// Interface pixel formats accepted by `COLMOD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// 16 bits per pixel, sent as two bytes.
    Rgb565,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reset all registers to their defaults. Wait `SWRESET_DELAY_MS` before the next command.
    SoftwareReset,
    /// Enter (`true`) or leave (`false`) sleep mode. Wait `SLPOUT_DELAY_MS` after leaving.
    SetSleepMode(bool),
    /// Leave partial mode and show the whole memory.
    NormalDisplayOn,
    /// Invert every pixel's color.
    SetInversion(bool),
    /// Turn the panel output on or off without touching memory.
    SetDisplayOn(bool),
    /// Set the start and end column of the address window, inclusive. Range is 0-131. (Note 1)
    SetColumnAddress(u16, u16),
    /// Set the start and end row of the address window, inclusive. Range is 0-161.
    SetRowAddress(u16, u16),
    /// Begin writing pixel data at the start of the address window. Pixel bytes follow as data.
    MemoryWrite,
    /// Set the memory access control register (scan direction, axis exchange, color order).
    SetMemoryAccessControl(u8),
    /// Set the interface pixel format.
    SetColorMode(ColorMode),
}

/// Commands whose parameters are borrowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufCommand<'buf> {
    /// Load the positive polarity gamma table.
    SetGammaPositive(&'buf [u8; 16]),
    /// Load the negative polarity gamma table.
    SetGammaNegative(&'buf [u8; 16]),
    /// Any register with literal parameter bytes.
    Register(u8, &'buf [u8]),
}

macro_rules! command {
    ($buf:ident, $cmd:expr,[]) => {
        ($cmd, &$buf[..0])
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        ($cmd, &$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        ($cmd, &$buf[..4])
    }};
}

/// Split an address into the high and low bytes the controller expects.
fn hi(addr: u16) -> u8 {
    (addr >> 8) as u8
}

fn lo(addr: u16) -> u8 {
    (addr & 0xFF) as u8
}

fn send_with_data<DI>(iface: &mut DI, cmd: u8, data: &[u8]) -> Result<(), DI::Error>
where
    DI: DisplayInterface,
{
    iface.send_command(cmd)?;
    if data.is_empty() {
        Ok(())
    } else {
        iface.send_data(data)
    }
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 4];
        let (cmd, data) = match self {
            Command::SoftwareReset => command!(arg_buf, SWRESET, []),
            Command::SetSleepMode(ena) => command!(arg_buf, if ena { SLPIN } else { SLPOUT }, []),
            Command::NormalDisplayOn => command!(arg_buf, NORON, []),
            Command::SetInversion(ena) => command!(arg_buf, if ena { INVON } else { INVOFF }, []),
            Command::SetDisplayOn(ena) => {
                command!(arg_buf, if ena { DISPON } else { DISPOFF }, [])
            }
            Command::SetColumnAddress(start, end) => {
                command!(arg_buf, CASET, [hi(start), lo(start), hi(end), lo(end)])
            }
            Command::SetRowAddress(start, end) => {
                command!(arg_buf, RASET, [hi(start), lo(start), hi(end), lo(end)])
            }
            Command::MemoryWrite => command!(arg_buf, RAMWR, []),
            Command::SetMemoryAccessControl(madctl) => command!(arg_buf, MADCTL, [madctl]),
            Command::SetColorMode(mode) => {
                let format = match mode {
                    ColorMode::Rgb565 => 0x05,
                };
                command!(arg_buf, COLMOD, [format])
            }
        };
        send_with_data(iface, cmd, data)
    }
}

impl<'a> BufCommand<'a> {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let (cmd, data): (u8, &[u8]) = match self {
            BufCommand::SetGammaPositive(table) => (GMCTRP1, &table[..]),
            BufCommand::SetGammaNegative(table) => (GMCTRN1, &table[..]),
            BufCommand::Register(cmd, data) => (cmd, data),
        };
        send_with_data(iface, cmd, data)
    }
}

/// Write a table of registers in order.
pub fn send_sequence<DI>(iface: &mut DI, sequence: &[(u8, &[u8])]) -> Result<(), DI::Error>
where
    DI: DisplayInterface,
{
    for &(cmd, data) in sequence {
        BufCommand::Register(cmd, data).send(iface)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    #[test]
    fn set_column_address() {
        let di = TestSpyInterface::new();
        Command::SetColumnAddress(2, 129).send(&mut di.split()).unwrap();
        di.check_multi(sends!(0x2A, [0, 2, 0, 129]));
    }

    #[test]
    fn set_row_address_splits_high_byte() {
        let di = TestSpyInterface::new();
        Command::SetRowAddress(1, 300).send(&mut di.split()).unwrap();
        di.check_multi(sends!(0x2B, [0, 1, 0x01, 0x2C]));
    }

    #[test]
    fn memory_write_has_no_data() {
        let di = TestSpyInterface::new();
        Command::MemoryWrite.send(&mut di.split()).unwrap();
        di.check_multi(sends!(0x2C));
    }

    #[test]
    fn toggles() {
        let di = TestSpyInterface::new();
        let mut iface = di.split();
        Command::SetSleepMode(true).send(&mut iface).unwrap();
        Command::SetSleepMode(false).send(&mut iface).unwrap();
        Command::SetInversion(true).send(&mut iface).unwrap();
        Command::SetInversion(false).send(&mut iface).unwrap();
        Command::SetDisplayOn(true).send(&mut iface).unwrap();
        Command::SetDisplayOn(false).send(&mut iface).unwrap();
        Command::SoftwareReset.send(&mut iface).unwrap();
        Command::NormalDisplayOn.send(&mut iface).unwrap();
        di.check_multi(sends!(0x10, 0x11, 0x21, 0x20, 0x29, 0x28, 0x01, 0x13));
    }

    #[test]
    fn set_color_mode() {
        let di = TestSpyInterface::new();
        let mut iface = di.split();
        Command::SetColorMode(ColorMode::Rgb565).send(&mut iface).unwrap();
        di.check_multi(sends!(0x3A, [0x05]));
    }

    #[test]
    fn memory_access_control() {
        let di = TestSpyInterface::new();
        Command::SetMemoryAccessControl(0x68)
            .send(&mut di.split())
            .unwrap();
        di.check_multi(sends!(0x36, [0x68]));
    }

    #[test]
    fn gamma_tables() {
        let di = TestSpyInterface::new();
        let mut iface = di.split();
        BufCommand::SetGammaPositive(&GAMMA_POSITIVE)
            .send(&mut iface)
            .unwrap();
        BufCommand::SetGammaNegative(&GAMMA_NEGATIVE)
            .send(&mut iface)
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xE0, [0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D,
                   0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10],
            0xE1, [0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D,
                   0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10]
        ));
    }

    #[test]
    fn power_sequence() {
        let di = TestSpyInterface::new();
        send_sequence(&mut di.split(), &POWER_SEQUENCE).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xB1, [0x01, 0x2C, 0x2D],
            0xB2, [0x01, 0x2C, 0x2D],
            0xB3, [0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D],
            0xB4, [0x07],
            0xC0, [0xA2, 0x02, 0x84],
            0xC1, [0x0A, 0x00],
            0xC3, [0x8A, 0x2A],
            0xC4, [0x8A, 0xEE],
            0xC5, [0x0E]
        ));
    }
}
