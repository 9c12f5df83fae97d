//! Panel geometry and orientation. These settings are fixed for the lifetime of a `St7735`; they
//! are consumed once by the initialization sequence and afterwards by the address window math.

use core::convert::TryFrom;
use core::fmt;

use crate::command::consts::{NUM_MEMORY_COLS, NUM_MEMORY_ROWS};
use crate::command::{MADCTL_MV, MADCTL_MX, MADCTL_MY, MADCTL_RGB_ORDER};

/// Width of the common 0.96" 80x160 glass.
pub const DEFAULT_WIDTH: u16 = 80;
/// Height of the common 0.96" 80x160 glass.
pub const DEFAULT_HEIGHT: u16 = 160;

/// Orientation of the image on the glass, in clockwise degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// An angle that is not a multiple of a quarter turn in [0, 270].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidRotation(pub u16);

impl fmt::Display for InvalidRotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unsupported rotation {} (expected 0, 90, 180 or 270)",
            self.0
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidRotation {}

impl Rotation {
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// True when the controller's row and column axes are exchanged relative to the glass.
    pub fn is_transposed(self) -> bool {
        self.degrees() % 180 != 0
    }

    /// Scan direction bits of the memory access control register for this rotation.
    pub fn madctl_bits(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => MADCTL_MX | MADCTL_MV,
            Rotation::Deg180 => MADCTL_MY | MADCTL_MX,
            Rotation::Deg270 => MADCTL_MY | MADCTL_MV,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, InvalidRotation> {
        Rotation::from_degrees(degrees).ok_or(InvalidRotation(degrees))
    }
}

/// A configuration for the display. Builder methods override the defaults, which suit the
/// 80x160 0.96" module mounted in landscape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    width: u16,
    height: u16,
    rotation: Rotation,
    mirror: bool,
    offset_left: Option<u16>,
    offset_top: Option<u16>,
    invert: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rotation: Rotation::Deg90,
            mirror: false,
            offset_left: None,
            offset_top: None,
            invert: true,
        }
    }

    /// Physical pixel dimensions of the attached glass, before rotation.
    pub fn size(self, width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Flip the image horizontally on top of the rotation.
    pub fn mirror(self, mirror: bool) -> Self {
        Self { mirror, ..self }
    }

    /// Position of the glass inside the controller's 132x162 memory. Without this the glass is
    /// assumed to be centered. The driver does not check that the glass fits at this offset.
    pub fn offset(self, left: u16, top: u16) -> Self {
        Self {
            offset_left: Some(left),
            offset_top: Some(top),
            ..self
        }
    }

    /// Invert colors in the controller. Most IPS modules need this on.
    pub fn invert(self, invert: bool) -> Self {
        Self { invert, ..self }
    }

    /// Resolve defaults into the geometry the driver works from.
    pub(crate) fn geometry(&self) -> Geometry {
        Geometry {
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            mirror: self.mirror,
            offset_left: self
                .offset_left
                .unwrap_or_else(|| NUM_MEMORY_COLS.saturating_sub(self.width) / 2),
            offset_top: self
                .offset_top
                .unwrap_or_else(|| NUM_MEMORY_ROWS.saturating_sub(self.height) / 2),
            invert: self.invert,
        }
    }
}

/// Resolved panel geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
    pub rotation: Rotation,
    pub mirror: bool,
    pub offset_left: u16,
    pub offset_top: u16,
    pub invert: bool,
}

impl Geometry {
    /// Width as seen by the caller, after rotation.
    pub fn width(&self) -> u16 {
        if self.rotation.is_transposed() {
            self.height
        } else {
            self.width
        }
    }

    /// Height as seen by the caller, after rotation.
    pub fn height(&self) -> u16 {
        if self.rotation.is_transposed() {
            self.width
        } else {
            self.height
        }
    }

    /// The memory access control register value.
    pub fn madctl(&self) -> u8 {
        let madctl = self.rotation.madctl_bits() | MADCTL_RGB_ORDER;
        if self.mirror {
            madctl ^ MADCTL_MX
        } else {
            madctl
        }
    }

    /// Number of RGB565 bytes in a full frame.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::try_from(0u16), Ok(Rotation::Deg0));
        assert_eq!(Rotation::try_from(90u16), Ok(Rotation::Deg90));
        assert_eq!(Rotation::try_from(180u16), Ok(Rotation::Deg180));
        assert_eq!(Rotation::try_from(270u16), Ok(Rotation::Deg270));
        assert_eq!(Rotation::try_from(45u16), Err(InvalidRotation(45)));
        assert_eq!(Rotation::try_from(360u16), Err(InvalidRotation(360)));
    }

    #[test]
    fn defaults_center_the_glass() {
        let g = Config::new().geometry();
        assert_eq!((g.width, g.height), (80, 160));
        assert_eq!(g.rotation, Rotation::Deg90);
        assert_eq!((g.offset_left, g.offset_top), (26, 1));
        assert!(g.invert);
        assert!(!g.mirror);

        let g = Config::new().size(128, 64).geometry();
        assert_eq!((g.offset_left, g.offset_top), (2, 49));
    }

    #[test]
    fn explicit_offset() {
        let g = Config::new().size(128, 128).offset(2, 3).geometry();
        assert_eq!((g.offset_left, g.offset_top), (2, 3));
    }

    #[test]
    fn effective_dimensions() {
        let cfg = Config::new().size(128, 64);
        for &(rot, w, h) in &[
            (Rotation::Deg0, 128, 64),
            (Rotation::Deg90, 64, 128),
            (Rotation::Deg180, 128, 64),
            (Rotation::Deg270, 64, 128),
        ] {
            let g = cfg.rotation(rot).geometry();
            assert_eq!((g.width(), g.height()), (w, h), "{:?}", rot);
        }
    }

    #[test]
    fn madctl() {
        let cfg = Config::new();
        assert_eq!(cfg.rotation(Rotation::Deg0).geometry().madctl(), 0x08);
        assert_eq!(cfg.rotation(Rotation::Deg90).geometry().madctl(), 0x68);
        assert_eq!(cfg.rotation(Rotation::Deg180).geometry().madctl(), 0xC8);
        assert_eq!(cfg.rotation(Rotation::Deg270).geometry().madctl(), 0xA8);
    }

    #[test]
    fn mirror_toggles_mx() {
        let cfg = Config::new().mirror(true);
        assert_eq!(cfg.rotation(Rotation::Deg0).geometry().madctl(), 0x48);
        assert_eq!(cfg.rotation(Rotation::Deg90).geometry().madctl(), 0x28);
        assert_eq!(cfg.rotation(Rotation::Deg180).geometry().madctl(), 0x88);
        assert_eq!(cfg.rotation(Rotation::Deg270).geometry().madctl(), 0xE8);
    }
}
