//! The byte-level transport to the ST7735. Every byte on the bus is tagged as either a command
//! opcode or a parameter/pixel data byte by the level of the D/C line.

/// Default largest number of bytes put on the bus in a single transaction.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

pub trait DisplayInterface {
    type Error;

    /// Send a single command opcode.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    /// Send parameter or pixel data following a command.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Send data produced by an iterator, staged through a small buffer.
    fn send_data_iter<I>(&mut self, iter: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut iter = iter.into_iter();
        let mut buf = [0u8; 32];
        loop {
            let mut chunk_len = 0;
            for slot in buf.iter_mut() {
                match iter.next() {
                    Some(byte) => {
                        *slot = byte;
                        chunk_len += 1;
                    }
                    None => break,
                }
            }
            if chunk_len > 0 {
                self.send_data(&buf[..chunk_len])?;
            }
            if chunk_len != buf.len() {
                return Ok(());
            }
        }
    }
}

pub mod spi {
    //! The "4-wire" SPI interface of the controller: 8-bit words on MOSI, with a separate D/C
    //! GPIO selecting command (low) or data (high). The 3-wire mode, which prefixes every word
    //! with a D/C bit, is not supported by `embedded_hal` SPI.

    use core::fmt;

    use embedded_hal::blocking::spi::Write;
    use embedded_hal::digital::v2::OutputPin;
    use embedded_hal::spi::{Mode, Phase, Polarity};

    use super::{DisplayInterface, DEFAULT_CHUNK_SIZE};

    /// SPI mode expected by the ST7735: mode 0, MSB first.
    pub const SPI_MODE: Mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };

    /// Bus clock the controller is known to work at on typical breakout wiring.
    pub const DEFAULT_SPI_SPEED_HZ: u32 = 4_000_000;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum SpiInterfaceError<SpiE, DcE> {
        /// The SPI write failed.
        Spi(SpiE),
        /// Driving the D/C line failed.
        DataCommand(DcE),
    }

    impl<SpiE: fmt::Debug, DcE: fmt::Debug> fmt::Display for SpiInterfaceError<SpiE, DcE> {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                SpiInterfaceError::Spi(e) => write!(f, "SPI write failed: {:?}", e),
                SpiInterfaceError::DataCommand(e) => write!(f, "D/C pin failed: {:?}", e),
            }
        }
    }

    /// SPI transport. Data payloads longer than `CHUNK` bytes are split into consecutive
    /// `CHUNK`-byte writes with the D/C line held high throughout, so the controller sees one
    /// uninterrupted RAM write.
    pub struct SpiInterface<SPI, DC, const CHUNK: usize = DEFAULT_CHUNK_SIZE> {
        /// The SPI master device connected to the ST7735.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the ST7735.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: Write<u8>,
        DC: OutputPin,
    {
        /// Create a new SPI interface which writes at most `DEFAULT_CHUNK_SIZE` bytes per
        /// transaction. `spi` is the SPI master device, and `dc` is the GPIO output pin connected
        /// to the D/C pin of the ST7735.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }
    }

    impl<SPI, DC, const CHUNK: usize> SpiInterface<SPI, DC, CHUNK>
    where
        SPI: Write<u8>,
        DC: OutputPin,
    {
        /// Create a new SPI interface with a custom transaction size limit, for SPI drivers that
        /// cap the length of a single transfer. `CHUNK` must be nonzero.
        ///
        /// Converted pixel data (`fill` and anything but `PixelSource::Encoded`) is staged through
        /// a `CHUNK`-byte buffer on the stack, 4 KiB with the default. On MCUs with a small stack
        /// pick a smaller `CHUNK`, e.g. 256.
        pub fn new_chunked(spi: SPI, dc: DC) -> Self {
            assert!(CHUNK > 0, "SPI chunk size must be nonzero");
            Self { spi, dc }
        }

        /// Give back the SPI device and D/C pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC, const CHUNK: usize> DisplayInterface for SpiInterface<SPI, DC, CHUNK>
    where
        SPI: Write<u8>,
        DC: OutputPin,
    {
        type Error = SpiInterfaceError<SPI::Error, DC::Error>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(SpiInterfaceError::DataCommand)?;
            self.spi.write(&[cmd]).map_err(SpiInterfaceError::Spi)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.dc.set_high().map_err(SpiInterfaceError::DataCommand)?;
            for chunk in buf.chunks(CHUNK) {
                self.spi.write(chunk).map_err(SpiInterfaceError::Spi)?;
            }
            Ok(())
        }

        fn send_data_iter<I>(&mut self, iter: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = u8>,
        {
            self.dc.set_high().map_err(SpiInterfaceError::DataCommand)?;
            let mut iter = iter.into_iter();
            let mut buf = [0u8; CHUNK];
            loop {
                let mut chunk_len = 0;
                for slot in buf.iter_mut() {
                    match iter.next() {
                        Some(byte) => {
                            *slot = byte;
                            chunk_len += 1;
                        }
                        None => break,
                    }
                }
                if chunk_len > 0 {
                    self.spi
                        .write(&buf[..chunk_len])
                        .map_err(SpiInterfaceError::Spi)?;
                }
                if chunk_len != CHUNK {
                    return Ok(());
                }
            }
        }
    }

}

#[cfg(test)]
pub mod test_spy {
    //! An interface for use in unit tests to spy on whatever was sent to it.

    use super::DisplayInterface;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Sent {
        Cmd(u8),
        Data(Vec<u8>),
    }

    #[derive(Clone)]
    pub struct TestSpyInterface {
        sent: Rc<RefCell<Vec<Sent>>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            TestSpyInterface {
                sent: Rc::new(RefCell::new(Vec::new())),
            }
        }

        /// Another handle onto the same record, to hand to a driver while keeping this one for
        /// assertions.
        pub fn split(&self) -> Self {
            self.clone()
        }

        pub fn check_multi(&self, expect: &[Sent]) {
            assert_eq!(*self.sent.borrow(), expect);
        }

        /// Everything sent after the last command `cmd`, including `cmd` itself.
        pub fn since_last(&self, cmd: u8) -> Vec<Sent> {
            let sent = self.sent.borrow();
            let start = sent
                .iter()
                .rposition(|s| *s == Sent::Cmd(cmd))
                .expect("command never sent");
            sent[start..].to_vec()
        }

        pub fn clear(&mut self) {
            self.sent.borrow_mut().clear()
        }
    }

    impl DisplayInterface for TestSpyInterface {
        type Error = ();

        fn send_command(&mut self, cmd: u8) -> Result<(), ()> {
            self.sent.borrow_mut().push(Sent::Cmd(cmd));
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), ()> {
            self.sent.borrow_mut().push(Sent::Data(data.to_vec()));
            Ok(())
        }

        fn send_data_iter<I>(&mut self, iter: I) -> Result<(), ()>
        where
            I: IntoIterator<Item = u8>,
        {
            self.sent
                .borrow_mut()
                .push(Sent::Data(iter.into_iter().collect()));
            Ok(())
        }
    }
}
