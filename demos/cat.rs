//! Copy one file to another, defaulting to standard input and output
//!
//! ```text
//! echo hello | cargo run --example cat
//! cargo run --example cat -- -i Cargo.toml -o /tmp/copy.toml
//! ```

use std::io::{Read, Write};

use anyhow::Context;
use cmdspec::prelude::*;

struct CatArgs {
    input: InFile,
    output: OutFile,
}

impl Arguments for CatArgs {
    fn declare(spec: &mut Spec<Self>) {
        spec.flag("in", |a| &mut a.input).short('i').descr("input file");
        spec.flag("out", |a| &mut a.output).short('o').descr("output file");
    }
}

fn cat(args: &mut CatArgs) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    args.input
        .read_to_end(&mut buf)
        .context("error reading file")?;
    args.input.close();

    args.output.write_all(&buf).context("error writing file")?;
    args.output.close().context("error closing file")?;
    Ok(())
}

fn main() -> Result<(), SpecError> {
    let record = CatArgs {
        input: InFile::stdin(),
        output: OutFile::stdout(),
    };
    let spec = CommandSpec::new("cat")
        .long("Writes the content of one file to another.")
        .action(cat);
    let mut cmd = Command::new(spec, record)?;
    let _ = cmd.run_env();
    Ok(())
}
