//! Line-based terminal I/O shared by the menu and the fix command.

use std::io::{self, BufRead, Write};
use std::path::Path;

use atlas_core::FixupReport;

use crate::menu::parse_action;

/// ANSI sequence that clears the screen and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

const OVERWRITE_QUESTION: &str = "\n \"minecraft:atlases/blocks.json\" already exists, do you wish to overwrite it?\n  0) No\n  1) Yes\n\n";

/// Print `prompt` and read one line without its line ending.
///
/// Returns `None` once the input is exhausted.
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask until the user answers `0` (keep) or `1` (overwrite).
///
/// Closed or unreadable input keeps the existing atlas.
pub fn confirm_overwrite<R: BufRead, W: Write>(input: &mut R, output: &mut W, atlas: &Path) -> bool {
    tracing::debug!("Asking before overwriting {}", atlas.display());

    let mut message = String::new();
    loop {
        let answer = output
            .write_all(OVERWRITE_QUESTION.as_bytes())
            .and_then(|()| read_line(input, output, &format!("{message} Action: ")));

        match answer {
            Ok(Some(line)) => match parse_action(&line, 0, 1) {
                Ok(action) => return action == 1,
                Err(e) => message = format!(" ERROR: {e}\n"),
            },
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                return false;
            }
        }
    }
}

/// Warnings followed by the outcome line, one indented line each.
pub fn report_lines(report: &FixupReport) -> String {
    let mut text = String::new();
    for warning in &report.warnings {
        text.push_str(&format!(" WARNING: {warning}\n"));
    }
    text.push_str(&format!(" {}\n", report.message()));
    text
}
