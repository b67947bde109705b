//! Plain text decoding.
//!
//! The caller names the encoding with a WHATWG label ("utf-8", "latin1",
//! "utf-16le", ...) and picks what happens to malformed byte sequences.

use std::fs;
use std::path::Path;

use encoding_rs::{DecoderResult, Encoding, UTF_16BE, UTF_16LE};

use crate::error::{Error, Result};
use crate::options::DecodeErrorPolicy;

/// Look up an encoding by label, ignoring case and surrounding whitespace.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Read a file, decode it, and normalize line endings to `\n`.
pub fn read_text(path: &Path, label: &str, policy: DecodeErrorPolicy) -> Result<String> {
    let bytes = fs::read(path)?;
    let text = decode_bytes(&bytes, label, policy)?;
    Ok(normalize_newlines(&text))
}

/// Turn `\r\n` and lone `\r` into `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode bytes with the encoding named by `label`.
///
/// For UTF-16 labels a byte-order mark selects the endianness and is
/// stripped. Other encodings keep their bytes as-is.
pub fn decode_bytes(bytes: &[u8], label: &str, policy: DecodeErrorPolicy) -> Result<String> {
    let mut encoding = resolve_encoding(label)?;
    let mut input = bytes;

    if encoding == UTF_16LE || encoding == UTF_16BE {
        if let Some((bom_encoding, bom_len)) = Encoding::for_bom(bytes) {
            if bom_encoding == UTF_16LE || bom_encoding == UTF_16BE {
                encoding = bom_encoding;
                input = &bytes[bom_len..];
            }
        }
    }

    decode_with_policy(input, encoding, policy)
}

fn decode_with_policy(
    input: &[u8],
    encoding: &'static Encoding,
    policy: DecodeErrorPolicy,
) -> Result<String> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(input.len())
        .unwrap_or(input.len());
    let mut output = String::with_capacity(capacity);
    let mut consumed = 0;

    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(&input[consumed..], &mut output, true);
        consumed += read;

        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => {
                let remaining = input.len() - consumed;
                let extra = decoder
                    .max_utf8_buffer_length_without_replacement(remaining)
                    .unwrap_or(remaining * 3 + 16);
                output.reserve(extra.max(4));
            }
            DecoderResult::Malformed(bad_len, extra) => match policy {
                DecodeErrorPolicy::Strict => {
                    return Err(Error::Decode(format!(
                        "'{}' codec can't decode {} byte(s) at position {}",
                        encoding.name(),
                        bad_len,
                        consumed.saturating_sub(bad_len as usize + extra as usize)
                    )));
                }
                DecodeErrorPolicy::Replace => output.push('\u{FFFD}'),
                DecodeErrorPolicy::Ignore => {}
            },
        }
    }

    Ok(output)
}
