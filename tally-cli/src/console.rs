use std::io::{self, Write};

use tally_core::Console;
use tracing::warn;

/// Terminal console: prompts on stdout, answers from stdin.
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self) -> Option<String> {
        io::stdout().flush().ok();
        let mut s = String::new();
        match io::stdin().read_line(&mut s) {
            Ok(0) => None,
            Ok(_) => Some(s.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read from stdin");
                None
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}
