mod tests;

use anyhow::Result;

use ad9959::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = DeviceConfig::new("dds0", "nop")
        .with_channel("MOT", Channel::CH1)
        .with_channel("Repump", Channel::CH2)
        .with_trigger("MOT", "mot_trigger", TriggerModality::Digital)
        .with_default("MOT", 80. * MHz)
        .with_boot_delay(std::time::Duration::ZERO);

    let dds = Controller::open(config, Nop::new())?;

    tests::run(dds)
}
