//! Interactive prompts

use std::io::{self, BufRead, Write};

/// Print `question` and read one trimmed line
///
/// # Errors
/// I/O failures on either stream
pub fn ask(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Show a generated story and ask whether to keep it
///
/// Only `y` (any case) keeps the story; end of input discards it.
///
/// # Errors
/// I/O failures on either stream
pub fn confirm_story(
    input: &mut impl BufRead,
    output: &mut impl Write,
    description: &str,
) -> io::Result<bool> {
    writeln!(output, "\nGenerated story: \"{description}\"")?;
    let answer = ask(input, output, "Keep this story? (y/n): ")?;
    let keep = answer.eq_ignore_ascii_case("y");
    writeln!(output, "{}", if keep { "Story accepted." } else { "Story discarded." })?;
    Ok(keep)
}
