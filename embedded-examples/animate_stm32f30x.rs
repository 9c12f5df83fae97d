//! Board bring-up for an 80x160 ST7735 module on an STM32F303RE: SPI1 on PA5/PA7, PA8 for D/C,
//! PA9 for RESET and PA10 for the backlight. Cycles an animated color gradient forever.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate st7735;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use st7735 as tft;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

const WIDTH: usize = 160;
const HEIGHT: usize = 80;

fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // SPI1 is Alternate Function 5 for PA5,6,7. MISO is unused by the write-only controller.
    let sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let spi = spi::Spi::spi1(
        dp.SPI1,
        (sck, miso, mosi),
        tft::SPI_MODE,
        tft::DEFAULT_SPI_SPEED_HZ.hz(),
        clocks,
        &mut rcc.apb2,
    );

    let dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper)
        .downgrade();
    let backlight = gpioa
        .pa10
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper)
        .downgrade();

    // Landscape, centered in controller memory, colors inverted for the IPS glass.
    let mut disp = tft::St7735::new(
        tft::SpiInterface::new(spi, dc),
        Some(rst),
        Some(backlight),
        tft::Config::new(),
        &mut delay,
    )
    .unwrap();

    // Encode each frame once into RGB565 and push it pre-encoded.
    let mut frame = [0u8; WIDTH * HEIGHT * 2];
    let mut tick: u8 = 0;
    loop {
        for (i, px) in frame.chunks_exact_mut(2).enumerate() {
            let (x, y) = ((i % WIDTH) as u8, (i / WIDTH) as u8);
            let color = tft::rgb565(x.wrapping_add(tick), y.wrapping_mul(3), tick);
            px.copy_from_slice(&color.to_be_bytes());
        }
        disp.display(tft::PixelSource::Encoded(&frame)).unwrap();
        tick = tick.wrapping_add(4);
        delay.delay_ms(50_u16);
    }
}
