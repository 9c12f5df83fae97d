//! The main API to the display driver. Construction resets and initializes the controller; after
//! that, frames are pushed with `display` and partial updates with `draw_window`.

pub mod window;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use log::{debug, warn};

use crate::codec::PixelSource;
use crate::command::*;
use crate::config::{Config, Geometry, Rotation};
use crate::display::window::AddressWindow;
use crate::error::Error;
use crate::interface;

/// How long each reset line level is held, in milliseconds.
pub const RESET_HOLD_MS: u16 = 500;
/// How long the backlight is held off when the driver takes it over, in milliseconds.
pub const BACKLIGHT_OFF_MS: u16 = 100;

/// A pixel coordinate pair of `column` and `row`, relative to the upper left of the glass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCoord(pub u16, pub u16);

/// A driver for an ST7735 display.
///
/// The reset and backlight lines are optional; pass `None` for either when it is not wired to
/// the MCU. Both must share an error type.
pub struct St7735<DI, RST, BL>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    rst: Option<RST>,
    backlight: Option<BL>,
    geometry: Geometry,
}

impl<DI, RST, BL, PinE> St7735<DI, RST, BL>
where
    DI: interface::DisplayInterface,
    RST: OutputPin<Error = PinE>,
    BL: OutputPin<Error = PinE>,
{
    /// Take over a display connected to `iface`, reset it and program its registers according to
    /// `config`. `delay` is only borrowed for the power-on timing.
    pub fn new<D>(
        iface: DI,
        rst: Option<RST>,
        backlight: Option<BL>,
        config: Config,
        delay: &mut D,
    ) -> Result<Self, Error<DI::Error, PinE>>
    where
        D: DelayMs<u16>,
    {
        let mut disp = St7735 {
            iface,
            rst,
            backlight,
            geometry: config.geometry(),
        };
        if let Some(backlight) = disp.backlight.as_mut() {
            backlight.set_low().map_err(Error::Pin)?;
            delay.delay_ms(BACKLIGHT_OFF_MS);
            backlight.set_high().map_err(Error::Pin)?;
        }
        disp.reset(delay)?;
        disp.init(delay)?;
        Ok(disp)
    }

    /// Pulse the reset line high, low, high, holding each level for `RESET_HOLD_MS`. Does
    /// nothing if no reset line is connected.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error, PinE>>
    where
        D: DelayMs<u16>,
    {
        if let Some(rst) = self.rst.as_mut() {
            debug!("hardware reset");
            rst.set_high().map_err(Error::Pin)?;
            delay.delay_ms(RESET_HOLD_MS);
            rst.set_low().map_err(Error::Pin)?;
            delay.delay_ms(RESET_HOLD_MS);
            rst.set_high().map_err(Error::Pin)?;
            delay.delay_ms(RESET_HOLD_MS);
        }
        Ok(())
    }

    /// Run the register initialization sequence. Called by `new`.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error, PinE>>
    where
        D: DelayMs<u16>,
    {
        let g = self.geometry;
        debug!(
            "init {}x{} rotation {} mirror {} offset ({}, {}) invert {}",
            g.width,
            g.height,
            g.rotation.degrees(),
            g.mirror,
            g.offset_left,
            g.offset_top,
            g.invert
        );
        self.command(Command::SoftwareReset)?;
        delay.delay_ms(SWRESET_DELAY_MS);
        self.command(Command::SetSleepMode(false))?;
        delay.delay_ms(SLPOUT_DELAY_MS);

        send_sequence(&mut self.iface, &POWER_SEQUENCE).map_err(Error::Interface)?;
        self.command(Command::SetInversion(g.invert))?;
        self.command(Command::SetMemoryAccessControl(g.madctl()))?;
        self.command(Command::SetColorMode(ColorMode::Rgb565))?;
        // The initial window is the unrotated glass.
        self.command(Command::SetColumnAddress(
            g.offset_left,
            g.offset_left.saturating_add(g.width).saturating_sub(1),
        ))?;
        self.command(Command::SetRowAddress(
            g.offset_top,
            g.offset_top.saturating_add(g.height).saturating_sub(1),
        ))?;
        BufCommand::SetGammaPositive(&GAMMA_POSITIVE)
            .send(&mut self.iface)
            .map_err(Error::Interface)?;
        BufCommand::SetGammaNegative(&GAMMA_NEGATIVE)
            .send(&mut self.iface)
            .map_err(Error::Interface)?;

        self.command(Command::NormalDisplayOn)?;
        delay.delay_ms(NORON_DELAY_MS);
        self.command(Command::SetDisplayOn(true))?;
        delay.delay_ms(DISPON_DELAY_MS);
        debug!("init done");
        Ok(())
    }

    /// Width of the image, accounting for rotation.
    pub fn width(&self) -> u16 {
        self.geometry.width()
    }

    /// Height of the image, accounting for rotation.
    pub fn height(&self) -> u16 {
        self.geometry.height()
    }

    pub fn rotation(&self) -> Rotation {
        self.geometry.rotation
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The memory access control byte written during initialization.
    pub fn madctl(&self) -> u8 {
        self.geometry.madctl()
    }

    /// Switch the backlight, if one is connected.
    pub fn set_backlight(&mut self, on: bool) -> Result<(), Error<DI::Error, PinE>> {
        match self.backlight.as_mut() {
            Some(bl) if on => bl.set_high().map_err(Error::Pin),
            Some(bl) => bl.set_low().map_err(Error::Pin),
            None => Ok(()),
        }
    }

    /// Control sleep mode. Leaving sleep waits the controller's mandatory settling time.
    pub fn sleep<D>(&mut self, enabled: bool, delay: &mut D) -> Result<(), Error<DI::Error, PinE>>
    where
        D: DelayMs<u16>,
    {
        self.command(Command::SetSleepMode(enabled))?;
        if !enabled {
            delay.delay_ms(SLPOUT_DELAY_MS);
        }
        Ok(())
    }

    /// Turn the panel output on or off. Memory contents are kept.
    pub fn display_on(&mut self, on: bool) -> Result<(), Error<DI::Error, PinE>> {
        self.command(Command::SetDisplayOn(on))
    }

    /// Override the color inversion chosen at initialization.
    pub fn invert(&mut self, on: bool) -> Result<(), Error<DI::Error, PinE>> {
        self.command(Command::SetInversion(on))
    }

    /// Set the address window to the inclusive rectangle from `upper_left` to `lower_right` and
    /// open a memory write. Pixel data sent next fills the window row by row.
    pub fn set_window(
        &mut self,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Result<(), Error<DI::Error, PinE>> {
        AddressWindow::new(&self.geometry, upper_left, lower_right)
            .ok_or(Error::InvalidWindow)?
            .send(&mut self.iface)
            .map_err(Error::Interface)
    }

    /// Set the address window to the whole glass and open a memory write.
    pub fn set_full_window(&mut self) -> Result<(), Error<DI::Error, PinE>> {
        AddressWindow::full(&self.geometry)
            .send(&mut self.iface)
            .map_err(Error::Interface)
    }

    /// Write a full frame. The source should hold exactly `width * height` pixels; a source of
    /// any other size is still written as-is, and the controller wraps or leaves stale pixels.
    pub fn display(&mut self, src: PixelSource) -> Result<(), Error<DI::Error, PinE>> {
        self.set_full_window()?;
        let expect = self.geometry.frame_bytes();
        if src.byte_len() != expect {
            warn!(
                "frame is {} bytes, panel expects {}",
                src.byte_len(),
                expect
            );
        }
        self.write_pixels(src)
    }

    /// Write pixels into the inclusive rectangle from `upper_left` to `lower_right`.
    pub fn draw_window(
        &mut self,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
        src: PixelSource,
    ) -> Result<(), Error<DI::Error, PinE>> {
        let window = AddressWindow::new(&self.geometry, upper_left, lower_right)
            .ok_or(Error::InvalidWindow)?;
        window.send(&mut self.iface).map_err(Error::Interface)?;
        if src.byte_len() != window.area() * 2 {
            warn!(
                "window data is {} bytes, window holds {}",
                src.byte_len(),
                window.area() * 2
            );
        }
        self.write_pixels(src)
    }

    /// Paint the whole glass with one RGB565 color.
    pub fn fill(&mut self, color: u16) -> Result<(), Error<DI::Error, PinE>> {
        self.set_full_window()?;
        let pixels = self.geometry.width as usize * self.geometry.height as usize;
        self.iface
            .send_data_iter(
                core::iter::repeat(color.to_be_bytes())
                    .take(pixels)
                    .flatten(),
            )
            .map_err(Error::Interface)
    }

    /// Give back the interface and control pins.
    pub fn release(self) -> (DI, Option<RST>, Option<BL>) {
        (self.iface, self.rst, self.backlight)
    }

    fn write_pixels(&mut self, src: PixelSource) -> Result<(), Error<DI::Error, PinE>> {
        let sent = match src.encoded() {
            Some(buf) => self.iface.send_data(buf),
            None => self.iface.send_data_iter(src.bytes()),
        };
        sent.map_err(Error::Interface)
    }

    fn command(&mut self, cmd: Command) -> Result<(), Error<DI::Error, PinE>> {
        cmd.send(&mut self.iface).map_err(Error::Interface)
    }
}
