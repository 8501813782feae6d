//! A calculator menu with one sub-command per operation
//!
//! ```text
//! cargo run --example calc -- add 2 3
//! cargo run --example calc -- mult 4 5
//! cargo run --example calc -- --help
//! ```

use cmdspec::prelude::*;

#[derive(Default)]
struct CalcArgs {
    x: i64,
    y: i64,
}

impl Arguments for CalcArgs {
    fn declare(spec: &mut Spec<Self>) {
        spec.param("x", |a| &mut a.x).descr("first argument");
        spec.param("y", |a| &mut a.y).descr("second argument");
    }
}

fn operation(
    name: &str,
    short: &str,
    long: &str,
    op: fn(i64, i64) -> Option<i64>,
) -> Result<Command<CalcArgs>, SpecError> {
    let spec = CommandSpec::new(name)
        .short(short)
        .long(long)
        .action(move |a: &mut CalcArgs| {
            let result = op(a.x, a.y)
                .ok_or_else(|| anyhow::anyhow!("result does not fit in 64 bits"))?;
            println!("Result: {}", result);
            Ok(())
        });
    Command::with_default(spec)
}

fn main() -> Result<(), SpecError> {
    let add = operation(
        "add",
        "adds two integer arguments",
        "Adds x and y and prints the sum.",
        i64::checked_add,
    )?;
    let mult = operation(
        "mult",
        "multiplies two integer arguments",
        "Multiplies x and y and prints the product.",
        i64::checked_mul,
    )?;

    let spec = CommandSpec::new("calc")
        .short("does calculations")
        .long("A small calculator. Pick an operation and give it two whole numbers.")
        .subcommand(add)
        .subcommand(mult);
    let mut calc = Command::new(spec, ())?;

    // Errors are reported and the process exits with status 2.
    let _ = calc.run_env();
    Ok(())
}
