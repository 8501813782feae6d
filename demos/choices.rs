//! Choosing from fixed sets of options
//!
//! ```text
//! cargo run --example choices -- -a C A
//! cargo run --example choices -- D
//! ```

use cmdspec::prelude::*;

struct Args {
    a: Choice,
    b: Choice,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            a: Choice::new("A", ["A", "B", "C"]),
            b: Choice::new("B", ["A", "B", "C"]),
        }
    }
}

impl Arguments for Args {
    fn declare(spec: &mut Spec<Self>) {
        spec.flag("", |a| &mut a.a).short('a').descr("optional choice");
        spec.param("b", |a| &mut a.b).descr("mandatory choice");
    }
}

fn main() -> Result<(), SpecError> {
    let spec = CommandSpec::new("choices")
        .long("Demonstration of the difficult task of making choices.")
        .action(|args: &mut Args| {
            println!(
                "Choice A was {} and choice B was {}",
                args.a.choice, args.b.choice
            );
            Ok(())
        });
    let mut cmd = Command::<Args>::with_default(spec)?;
    let _ = cmd.run_env();
    Ok(())
}
