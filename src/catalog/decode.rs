// SPDX-License-Identifier: PMPL-1.0-or-later

//! Byte-level decoding of catalog documents
//!
//! A byte order mark wins. Without one, the `encoding` pseudo-attribute of the
//! XML declaration picks the decoder, and UTF-8 is assumed when neither is
//! present. Malformed input is an error, never silently replaced.

use crate::catalog::error::ParseError;
use encoding_rs::{DecoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<\?xml[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("static encoding regex")
});

/// Decode a raw document into text.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..], bom_len);
    }

    let encoding = match declared_encoding(bytes) {
        Some(label) => {
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| ParseError::UnsupportedEncoding { label: label.clone() })?;
            // A declaration we could read as ASCII means the bytes are not UTF-16.
            if encoding == UTF_16LE || encoding == UTF_16BE {
                UTF_8
            } else {
                encoding
            }
        }
        None => UTF_8,
    };
    decode_with(encoding, bytes, 0)
}

fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(256)];
    DECLARED_ENCODING
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

fn decode_with<'a>(
    encoding: &'static Encoding,
    body: &'a [u8],
    bom_len: usize,
) -> Result<Cow<'a, str>, ParseError> {
    if encoding == UTF_8 {
        return std::str::from_utf8(body)
            .map(Cow::Borrowed)
            .map_err(|err| ParseError::Encoding {
                encoding: UTF_8.name().to_string(),
                offset: bom_len + err.valid_up_to(),
            });
    }

    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = String::with_capacity(body.len() + body.len() / 2 + 16);
    let mut consumed = 0usize;
    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(&body[consumed..], &mut out, true);
        consumed += read;
        match result {
            DecoderResult::InputEmpty => return Ok(Cow::Owned(out)),
            DecoderResult::OutputFull => {
                out.reserve((body.len() - consumed) * 3 + 16);
            }
            DecoderResult::Malformed(bad, extra) => {
                return Err(ParseError::Encoding {
                    encoding: encoding.name().to_string(),
                    offset: bom_len + consumed - bad as usize - extra as usize,
                });
            }
        }
    }
}
