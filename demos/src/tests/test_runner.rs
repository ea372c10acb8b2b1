use std::io::{self, Write};

use ad9959::prelude::*;

use super::{buffered::*, manual::*, ramp::*};

pub fn run<L: Link>(mut dds: Controller<L>) -> anyhow::Result<()> {
    type Test<L> = (&'static str, fn(&'_ mut Controller<L>) -> anyhow::Result<()>);

    let examples: Vec<Test<_>> = vec![
        ("Manual frequency, phase and amplitude", |dds| manual(dds)),
        ("Frequency ramp", |dds| ramp(dds)),
        ("Buffered shot", |dds| buffered(dds)),
    ];

    loop {
        examples.iter().enumerate().for_each(|(i, (name, _))| {
            println!("[{i}]: {name}");
        });
        println!("[Others]: Finish");
        print!("Choose number: ");
        io::stdout().flush()?;

        let mut s = String::new();
        io::stdin().read_line(&mut s)?;
        match s.trim().parse::<usize>() {
            Ok(i) if i < examples.len() => {
                (examples[i].1)(&mut dds)?;
            }
            _ => break,
        }
    }

    dds.close()?;

    Ok(())
}
