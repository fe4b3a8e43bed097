//! UART TX sink for ESP-IDF targets.
//!
//! TX-only driver: the logger never reads from the port, and leaving RX
//! unclaimed lets a console own it. Pair with an external USB-UART
//! adapter or the board's built-in bridge.

use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartTxDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use crate::sink::SerialSink;

/// UART parameters for the log output.
pub struct UartConfig {
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

/// Open a TX-only UART driver at the configured baud rate.
pub fn init_uart_tx<'d>(
    uart: impl Peripheral<P = impl uart::Uart> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartConfig,
) -> Result<UartTxDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Serial sink backed by a UART TX driver.
///
/// The driver is closed when the sink drops, i.e. when the drain task
/// exits at logger teardown.
pub struct UartSink<'d> {
    uart: UartTxDriver<'d>,
}

impl<'d> UartSink<'d> {
    pub fn new(uart: UartTxDriver<'d>) -> Self {
        Self { uart }
    }
}

impl SerialSink for UartSink<'static> {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.uart.write(bytes);
    }
}
