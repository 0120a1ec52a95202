//! Interactive format selection for a single file.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use convertino_core::Encoding;

use crate::error::UsageError;

/// Encodings offered in the prompt, in menu order.
pub const MENU: [Encoding; 3] = [Encoding::Wav, Encoding::Aif, Encoding::Mp3];

const PROMPT: &str = "Choose the output format (1: WAV, 2: AIF, 3: MP3): ";

/// Maps a menu answer to an encoding.
pub fn parse_choice(line: &str) -> Result<Encoding, UsageError> {
    match line.trim() {
        "1" => Ok(Encoding::Wav),
        "2" => Ok(Encoding::Aif),
        "3" => Ok(Encoding::Mp3),
        other => Err(UsageError::InvalidUserChoice {
            input: other.to_string(),
        }),
    }
}

/// Prints the prompt and reads one answer. End of input reads as empty.
pub async fn prompt_choice<R, W>(input: &mut R, out: &mut W) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    Ok(line)
}
