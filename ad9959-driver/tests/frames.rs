use ad9959_driver::{
    config::DeviceConfig,
    firmware::{Amplitude, Command, Divider, FrequencyList, Phase},
    ramp::{RampOption, RampSpec},
    sequence::SequenceBuilder,
    Channel, MHz,
};

#[test]
fn set_frequency_frame() -> anyhow::Result<()> {
    let cmd = Command::SetFrequency {
        channel: Channel::CH2,
        values: FrequencyList::from_hz(&[35.5 * MHz, 36. * MHz], Divider::None)?,
    };
    assert_eq!(
        vec![0x02, 0x01, 0x02, 0x02, 0x1D, 0xAF, 0xE0, 0x02, 0x25, 0x51, 0x00],
        cmd.encode()
    );
    assert_eq!(cmd.encode(), cmd.encode());
    Ok(())
}

#[test]
fn coerced_values_reach_the_frame() -> anyhow::Result<()> {
    let config = DeviceConfig::new("dds0", "/dev/null");
    let policy = config.limit_policy();

    let phase = policy.coerce_phase(400.);
    assert!(phase.is_clipped());
    assert_eq!(360., phase.value);
    assert_eq!(
        vec![0x00, 0x02, 0x01, 0x00, 0x00],
        Command::SetPhase {
            channel: Channel::CH0,
            phase: Phase::from_degrees(phase.value)?,
        }
        .encode()
    );

    let amplitude = policy.coerce_amplitude(-0.5);
    assert_eq!(0., amplitude.value);
    assert_eq!(
        vec![0x03, 0x04, 0x01, 0x00, 0x00],
        Command::SetAmplitude {
            channel: Channel::CH3,
            amplitude: Amplitude::new(amplitude.value)?,
        }
        .encode()
    );
    Ok(())
}

#[test]
fn slow_ramp_frame() -> anyhow::Result<()> {
    let registers =
        RampSpec::new(100 * MHz, 200 * MHz, 1., 1.).registers(&RampOption::default())?;
    assert_eq!(
        vec![
            0x01, 0x03, 0x00, //
            0x05, 0xF5, 0xE1, 0x00, //
            0x0B, 0xEB, 0xC2, 0x00, //
            0x00, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x01,
        ],
        Command::SetRamp {
            channel: Channel::CH1,
            registers,
        }
        .encode()
    );
    Ok(())
}

#[test]
fn table_to_frames() -> anyhow::Result<()> {
    let config = DeviceConfig::new("dds0", "/dev/null")
        .with_channel("Probe", Channel::CH0)
        .with_divider(Divider::By32);
    let mut builder = SequenceBuilder::new(&config);
    builder.program_frequency("Probe", [1250. * MHz, 20000. * MHz])?;
    let table = builder.build()?;

    let program = table.get(Channel::CH0).unwrap();
    let frequencies = program.frequencies.as_ref().unwrap();
    assert_eq!(&vec![1250. * MHz, 12800. * MHz], frequencies);
    assert_eq!(Some(0.), program.phase);
    assert_eq!(Some(0.5), program.amplitude);

    let list = FrequencyList::from_hz(frequencies, config.divider)?;
    assert_eq!(&[39_062_500, 400_000_000], list.words());
    Ok(())
}
