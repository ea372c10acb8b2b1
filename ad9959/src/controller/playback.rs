use ad9959_core::link::Link;
use ad9959_driver::sequence::ChannelSequenceTable;

use super::{AbortOutcome, Controller, FinalValues, Mode, RealizedValues};
use crate::error::Ad9959Error;

impl<L: Link> Controller<L> {
    /// Enters buffered mode and programs every channel of `table`.
    ///
    /// Channels are programmed in ascending order, each with its frequency list, then its phase,
    /// then its amplitude. The settle delay follows every frame.
    ///
    /// On error the controller stays in buffered mode. Call
    /// [`abort_transition_to_buffered`](Self::abort_transition_to_buffered) to return to manual
    /// mode.
    #[tracing::instrument(level = "debug", skip_all, fields(device = %self.config.name, channels = table.len()))]
    pub fn transition_to_buffered(
        &mut self,
        table: &ChannelSequenceTable,
    ) -> Result<FinalValues, Ad9959Error> {
        self.ensure_manual()?;
        if table.device() != self.config.name {
            tracing::warn!(
                "Sequence table for {} is played on {}",
                table.device(),
                self.config.name
            );
        }

        self.mode = Mode::Buffered;
        self.shot_frames = 0;

        let mut values = FinalValues::default();
        table.iter().try_for_each(|(ch, program)| {
            let mut realized = RealizedValues::default();
            if let Some(frequencies) = &program.frequencies {
                realized.frequencies = Some(self.write_frequency(ch, frequencies)?);
            }
            if let Some(phase) = program.phase {
                realized.phase = Some(self.write_phase(ch, phase)?);
            }
            if let Some(amplitude) = program.amplitude {
                realized.amplitude = Some(self.write_amplitude(ch, amplitude)?);
            }
            values.0.insert(ch, realized);
            Ok::<_, Ad9959Error>(())
        })?;

        tracing::debug!("{} frames written", self.shot_frames);
        Ok(values)
    }

    /// Leaves buffered mode after a completed shot.
    pub fn transition_to_manual(&mut self) -> Result<(), Ad9959Error> {
        if self.mode != Mode::Buffered {
            return Err(Ad9959Error::NotInBufferedMode);
        }
        self.mode = Mode::Manual;
        self.shot_frames = 0;
        Ok(())
    }

    /// Aborts [`transition_to_buffered`](Self::transition_to_buffered) and returns to manual mode.
    ///
    /// Frames already written are not rolled back.
    pub fn abort_transition_to_buffered(&mut self) -> AbortOutcome {
        self.abort("transition to buffered")
    }

    /// Aborts a running shot and returns to manual mode.
    ///
    /// Frames already written are not rolled back.
    pub fn abort_buffered(&mut self) -> AbortOutcome {
        self.abort("buffered run")
    }

    fn abort(&mut self, what: &str) -> AbortOutcome {
        let outcome = if self.shot_frames == 0 {
            AbortOutcome::Clean
        } else {
            tracing::warn!(
                device = %self.config.name,
                "Aborted {} after {} frames, channel state may be incomplete",
                what,
                self.shot_frames
            );
            AbortOutcome::MayBeIncomplete
        };
        self.mode = Mode::Manual;
        self.shot_frames = 0;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use ad9959_core::{
        channel::Channel,
        common::{MHz, SETTLE_DELAY},
        link::{Link, LinkError},
    };
    use ad9959_driver::{
        firmware::Opcode,
        sequence::{ChannelSequenceTable, SequenceBuilder},
    };

    use super::*;
    use crate::controller::tests::{create_config, create_controller};

    fn create_table() -> anyhow::Result<ChannelSequenceTable> {
        let config = create_config();
        let mut builder = SequenceBuilder::new(&config);
        builder
            .program_frequency("Repump", [1. * MHz, 2. * MHz])?
            .program_amplitude("Repump", 0.25)?;
        builder.jump_frequency(0.0, "MOT", 80. * MHz, true)?;
        builder.jump_frequency(1e-3, "MOT", 90. * MHz, true)?;
        builder.program_phase("MOT", 90.)?;
        Ok(builder.build()?)
    }

    #[test]
    fn playback_order() -> anyhow::Result<()> {
        let (mut cnt, sleeper) = create_controller(create_config())?;
        sleeper.take();

        let values = cnt.transition_to_buffered(&create_table()?)?;
        assert_eq!(Mode::Buffered, cnt.mode());

        let frames = cnt.link().frames();
        assert_eq!(
            vec![
                (Channel::CH1.idx(), Opcode::SetFrequency as u8),
                (Channel::CH1.idx(), Opcode::SetPhase as u8),
                (Channel::CH1.idx(), Opcode::SetAmplitude as u8),
                (Channel::CH2.idx(), Opcode::SetFrequency as u8),
                (Channel::CH2.idx(), Opcode::SetPhase as u8),
                (Channel::CH2.idx(), Opcode::SetAmplitude as u8),
            ],
            frames.iter().map(|f| (f[0], f[1])).collect::<Vec<_>>()
        );
        assert_eq!(vec![SETTLE_DELAY; 6], sleeper.take());

        let mot = values.get(Channel::CH1).unwrap();
        assert_eq!(Some(vec![80. * MHz, 90. * MHz]), mot.frequencies);
        assert_eq!(Some(90.), mot.phase);
        approx::assert_abs_diff_eq!(512. / 1023., mot.amplitude.unwrap());
        let repump = values.get(Channel::CH2).unwrap();
        assert_eq!(Some(0.), repump.phase);
        approx::assert_abs_diff_eq!(256. / 1023., repump.amplitude.unwrap());
        assert_eq!(&mot.clone(), cnt.realized(Channel::CH1));
        assert!(values.get(Channel::CH0).is_none());

        assert_eq!(vec![80_000_000, 90_000_000], cnt.link().channel(Channel::CH1).freq_list());
        Ok(())
    }

    #[test]
    fn manual_rejected_while_buffered() -> anyhow::Result<()> {
        let (mut cnt, _) = create_controller(create_config())?;
        cnt.transition_to_buffered(&create_table()?)?;
        let frames = cnt.link().frames().len();

        assert_eq!(
            Err(Ad9959Error::NotInManualMode),
            cnt.set_phase(Channel::CH0, 0.)
        );
        assert_eq!(
            Err(Ad9959Error::NotInManualMode),
            cnt.set_frequency(Channel::CH0, &[1. * MHz])
        );
        assert_eq!(
            Some(Ad9959Error::NotInManualMode),
            cnt.transition_to_buffered(&create_table()?).err()
        );
        assert_eq!(frames, cnt.link().frames().len());

        cnt.transition_to_manual()?;
        assert_eq!(Mode::Manual, cnt.mode());
        cnt.set_phase(Channel::CH0, 0.)?;
        Ok(())
    }

    #[test]
    fn transition_to_manual_requires_buffered() -> anyhow::Result<()> {
        let (mut cnt, _) = create_controller(create_config())?;
        assert_eq!(Err(Ad9959Error::NotInBufferedMode), cnt.transition_to_manual());
        Ok(())
    }

    #[test]
    fn abort_before_start() -> anyhow::Result<()> {
        let (mut cnt, _) = create_controller(create_config())?;
        assert_eq!(AbortOutcome::Clean, cnt.abort_transition_to_buffered());
        assert_eq!(AbortOutcome::Clean, cnt.abort_buffered());
        assert_eq!(Mode::Manual, cnt.mode());
        Ok(())
    }

    #[test]
    fn abort_after_start() -> anyhow::Result<()> {
        let (mut cnt, _) = create_controller(create_config())?;
        cnt.transition_to_buffered(&create_table()?)?;
        assert_eq!(AbortOutcome::MayBeIncomplete, cnt.abort_buffered());
        assert_eq!(Mode::Manual, cnt.mode());
        assert_eq!(AbortOutcome::Clean, cnt.abort_buffered());
        Ok(())
    }

    #[test]
    fn link_fault_during_playback() -> anyhow::Result<()> {
        let (mut cnt, _) = create_controller(create_config())?;
        cnt.link_mut().break_down();
        assert_eq!(
            Some(Ad9959Error::Link(LinkError::new("broken"))),
            cnt.transition_to_buffered(&create_table()?).err()
        );
        assert_eq!(Mode::Buffered, cnt.mode());
        assert!(!cnt.link().is_open());
        assert_eq!(AbortOutcome::Clean, cnt.abort_transition_to_buffered());

        cnt.link_mut().repair();
        assert_eq!(
            Some(Ad9959Error::LinkClosed),
            cnt.transition_to_buffered(&create_table()?).err()
        );
        assert_eq!(AbortOutcome::Clean, cnt.abort_transition_to_buffered());

        cnt.link_mut().open()?;
        let table = create_table()?;
        cnt.transition_to_buffered(&table)?;
        assert_eq!(AbortOutcome::MayBeIncomplete, cnt.abort_transition_to_buffered());
        Ok(())
    }

    #[test]
    fn empty_table() -> anyhow::Result<()> {
        let config = create_config();
        let table = SequenceBuilder::new(&config).build()?;
        let (mut cnt, _) = create_controller(config)?;
        assert!(cnt.transition_to_buffered(&table)?.is_empty());
        assert_eq!(AbortOutcome::Clean, cnt.abort_buffered());
        Ok(())
    }
}
