//! Elite Tuner Demo Application
//!
//! Entry point for the STM32G474 demo board: boots the tuner, loads the
//! beamformer coefficients, tunes an FM station and prints signal quality
//! once a second.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::peripherals;
use embassy_stm32::time::Hertz;
use {defmt_rtt as _, panic_probe as _};

use elite_tuner::prelude::*;

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Station tuned after startup (93.1 MHz)
const DEMO_FREQUENCY_KHZ: u32 = 93_100;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Elite tuner demo v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // PB8 = SCL, PB9 = SDA for I2C1 on STM32G474
    let i2c = embassy_stm32::i2c::I2c::new(
        p.I2C1,
        p.PB8, // SCL
        p.PB9, // SDA
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        Hertz(400_000), // 400kHz Fast Mode
        Default::default(),
    );

    // Tuner reset (active low), held in reset until init
    let reset = Output::new(p.PB0, Level::Low, Speed::Low);

    let mut tuner = Elite::new(i2c, reset, Delay, EmbassyClock, EliteConfig::default());

    if let Err(e) = bring_up(&mut tuner).await {
        error!("tuner bring-up failed: {}", e);
        return;
    }

    loop {
        match tuner.read_tuner_status(Band::Fm).await {
            Ok(status) => info!("{}", status),
            Err(e) => warn!("status read failed: {}", e),
        }
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Boot, align, load coefficients and tune the demo station
async fn bring_up<I2C, RST, D, C>(tuner: &mut Elite<'_, I2C, RST, D, C>) -> Result<()>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    tuner.init().await?;
    tuner.startup(AlignMode::EuUsa).await?;
    tuner
        .write_beamformer_coefficients(elite_tuner::tables::BEAMFORMER_COEFFICIENTS)
        .await?;

    let (min, max) = Band::Fm.default_range_khz();
    let freq = Frequency::try_from_khz(DEMO_FREQUENCY_KHZ)?;
    tuner
        .change_band(
            Band::Fm,
            Frequency::try_from_khz(min)?,
            Frequency::try_from_khz(max)?,
            freq,
        )
        .await?;
    tuner.change_frequency(freq).await?;

    info!("tuned to {}", freq);
    Ok(())
}
