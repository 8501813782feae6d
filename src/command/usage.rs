//! Usage text for commands

use std::io::{self, Write};

use super::wrap::{word_wrap, LINE_WIDTH};
use super::Command;

impl<A> Command<A> {
    /// Write the full usage message.
    ///
    /// ```text
    /// Usage: name [flags] x y
    ///
    /// Description, wrapped at 70 columns.
    ///
    /// Flags:
    ///   -h,--help
    /// 	show help for name
    ///
    /// Arguments:
    ///   x
    /// 	...
    /// ```
    ///
    /// Menus also list the `cmd ...` arguments and a `Commands:` section.
    pub fn write_usage<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let menu = !self.subcommands.is_empty();

        let mut line = format!("Usage: {} [flags]", self.name);
        let params = self.params.short_usage();
        if !params.is_empty() {
            line.push(' ');
            line.push_str(&params);
        }
        if menu {
            line.push_str(" cmd ...");
        }
        write!(out, "{}\n\n", line)?;

        let descr = if self.long.trim().is_empty() {
            &self.short
        } else {
            &self.long
        };
        let descr = word_wrap(descr, LINE_WIDTH);
        if !descr.is_empty() {
            write!(out, "{}\n\n", descr)?;
        }

        self.flags.write_usage(&mut *out)?;

        if menu {
            write!(out, "\nArguments:\n")?;
            self.params.write_entries(&mut *out)?;
            write!(out, "  cmd\n\tcommand to run\n  ...\n\tcommand arguments\n")?;

            let mut subs: Vec<(&str, &str)> = self
                .subcommands
                .iter()
                .map(|sub| (sub.name(), sub.short_description()))
                .collect();
            subs.sort();
            write!(out, "\nCommands:\n")?;
            for (name, short) in subs {
                write!(out, "  {}\n\t{}\n", name, short)?;
            }
            writeln!(out)?;
        } else if !self.params.is_empty() {
            writeln!(out)?;
            self.params.write_usage(&mut *out)?;
        }
        Ok(())
    }

    /// The usage message as a string
    pub fn usage(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_usage(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
