mod tests;

use anyhow::{Context, Result};

use ad9959::prelude::*;
use ad9959_link_serial::{SerialLink, SerialOption};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: serial <config.json>")?;
    let config = DeviceConfig::from_json(&std::fs::read_to_string(&path)?)?;

    let link = SerialLink::new(
        &config.port,
        SerialOption::default().with_baud_rate(config.baud_rate),
    );
    let dds = Controller::open(config, link)?;

    tests::run(dds)
}
