//! Address window math: mapping caller pixel coordinates onto controller memory addresses.

use log::trace;

use crate::command::Command;
use crate::config::Geometry;
use crate::display::PixelCoord;
use crate::interface::DisplayInterface;

/// A rectangle of controller memory which the next `RAMWR` fills, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressWindow {
    pub column_start: u16,
    pub column_end: u16,
    pub row_start: u16,
    pub row_end: u16,
}

impl AddressWindow {
    /// Map the inclusive corners `upper_left` and `lower_right` into memory addresses, adding the
    /// panel offsets and exchanging axes for 90 and 270 degree rotations. Returns `None` if a
    /// corner lies past the other.
    pub fn new(geometry: &Geometry, upper_left: PixelCoord, lower_right: PixelCoord) -> Option<Self> {
        if upper_left.0 > lower_right.0 || upper_left.1 > lower_right.1 {
            return None;
        }
        let x0 = upper_left.0.saturating_add(geometry.offset_left);
        let x1 = lower_right.0.saturating_add(geometry.offset_left);
        let y0 = upper_left.1.saturating_add(geometry.offset_top);
        let y1 = lower_right.1.saturating_add(geometry.offset_top);

        // Axis exchange happens after the offsets are applied: at 90/270 degrees the column
        // registers take the offset y range and the row registers the offset x range.
        let window = if geometry.rotation.is_transposed() {
            AddressWindow {
                column_start: y0,
                column_end: y1,
                row_start: x0,
                row_end: x1,
            }
        } else {
            AddressWindow {
                column_start: x0,
                column_end: x1,
                row_start: y0,
                row_end: y1,
            }
        };
        Some(window)
    }

    /// The window covering the whole glass, spanning the configured panel width and height.
    pub fn full(geometry: &Geometry) -> Self {
        let lower_right = PixelCoord(
            geometry.width.saturating_sub(1),
            geometry.height.saturating_sub(1),
        );
        // Corners are ordered by construction.
        AddressWindow::new(geometry, PixelCoord(0, 0), lower_right).unwrap_or(AddressWindow {
            column_start: 0,
            column_end: 0,
            row_start: 0,
            row_end: 0,
        })
    }

    /// Number of pixels inside the window.
    pub fn area(&self) -> usize {
        (usize::from(self.column_end) - usize::from(self.column_start) + 1)
            * (usize::from(self.row_end) - usize::from(self.row_start) + 1)
    }

    /// Program the window and open a memory write. Columns must go before rows.
    pub fn send<DI>(&self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        trace!(
            "address window cols {}..={} rows {}..={}",
            self.column_start,
            self.column_end,
            self.row_start,
            self.row_end
        );
        Command::SetColumnAddress(self.column_start, self.column_end).send(iface)?;
        Command::SetRowAddress(self.row_start, self.row_end).send(iface)?;
        Command::MemoryWrite.send(iface)
    }
}
