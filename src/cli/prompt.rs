//! Terminal confirmation prompt.
//!
//! Reading stdin blocks, so the question is asked on the blocking pool and
//! the calling future stays cancellable (Ctrl-C races it in `main`).

use std::io::{self, BufRead, BufReader, Read, Write};

use junket::ReviewError;

/// Asks `prompt` on stderr and waits for a `y`/`yes` answer on stdin.
///
/// # Errors
///
/// Returns [`ReviewError::Io`] when the prompt task cannot complete.
pub async fn ask(prompt: String) -> Result<bool, ReviewError> {
    ask_with(prompt, io::stdin(), io::stderr()).await
}

/// Same as [`ask`] over arbitrary streams.
pub async fn ask_with<R, W>(prompt: String, reader: R, writer: W) -> Result<bool, ReviewError>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    tokio::task::spawn_blocking(move || prompt_blocking(&prompt, reader, writer))
        .await
        .map_err(|error| ReviewError::Io {
            message: format!("confirmation prompt failed: {error}"),
        })
}

fn prompt_blocking<R: Read, W: Write>(prompt: &str, reader: R, mut writer: W) -> bool {
    if write!(writer, "{prompt} [y/N] ").is_err() || writer.flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if BufReader::new(reader).read_line(&mut answer).is_err() {
        return false;
    }
    is_affirmative(&answer)
}

/// Returns true for `y` or `yes`, ignoring case and surrounding space.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
