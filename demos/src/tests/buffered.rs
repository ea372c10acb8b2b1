use ad9959::prelude::*;

pub fn buffered(dds: &mut Controller<impl Link>) -> anyhow::Result<()> {
    let description = SequenceDescription::from_json(
        r#"{
            "MOT": {
                "steps": [
                    { "time": 0.0, "frequency": 80e6, "trigger": false },
                    { "time": 1e-3, "frequency": 85e6 },
                    { "time": 2e-3, "frequency": 90e6 }
                ],
                "amplitude": 0.7
            }
        }"#,
    )?;
    let table = SequenceBuilder::from_description(dds.config(), &description)?.build()?;
    println!("{}", serde_json::to_string_pretty(&table)?);

    let values = match dds.transition_to_buffered(&table) {
        Ok(values) => values,
        Err(e) => {
            let outcome = dds.abort_transition_to_buffered();
            tracing::error!("{} ({})", e, outcome);
            return Err(e.into());
        }
    };
    values.iter().for_each(|(ch, v)| println!("{}: {:?}", ch, v));

    dds.transition_to_manual()?;

    Ok(())
}
