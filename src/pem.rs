// SPDX-License-Identifier: Apache-2.0

//! Structural checks for PEM certificate documents (RFC 7468, strict form).
//!
//! Explanatory text is accepted before the first block only. Each block must
//! be labelled `CERTIFICATE` on both encapsulation boundaries, and its body
//! must be padded base64 in lines of at most 64 characters. Several blocks
//! may follow one another, separated by blank lines.
//!
//! Lines are checked here so that errors can name them; each block is then
//! decoded by the RFC 7468 decoder that `x509-cert` uses.

use crate::error::PemError;

use base64::{engine::general_purpose::STANDARD, Engine};
use x509_cert::{der::pem, der::pem::PemLabel, Certificate};

const BOUNDARY: &str = "-----";
const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const LABEL: &str = Certificate::PEM_LABEL;
const MAX_LINE: usize = 64;

/// One encapsulated block, re-assembled with LF line endings.
struct Block {
    begin: usize,
    text: String,
    lines: usize,
    padded: Option<usize>,
}

fn label_of<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix(BOUNDARY)
}

/// Decode a closed block with the RFC 7468 decoder.
fn decode_block(block: &Block) -> Result<Vec<u8>, PemError> {
    let (label, der) =
        pem::decode_vec(block.text.as_bytes()).map_err(|error| PemError::Encoding {
            line: block.begin,
            error,
        })?;

    if label != LABEL {
        return Err(PemError::UnexpectedLabel {
            line: block.begin,
            label: label.to_string(),
        });
    }

    Ok(der)
}

/// Decode every certificate block in `pem`, returning the DER bytes of each
/// in order of appearance.
pub fn decode_certificates(pem: &[u8]) -> Result<Vec<Vec<u8>>, PemError> {
    let mut blocks = Vec::new();
    let mut open: Option<Block> = None;

    for (i, raw) in pem.split(|&b| b == b'\n').enumerate() {
        let number = i + 1;

        if !raw.is_ascii() {
            return Err(PemError::NonAscii(number));
        }

        // Checked above, every byte is ASCII.
        let line = std::str::from_utf8(raw)
            .map_err(|_| PemError::NonAscii(number))?
            .trim_end();

        match open.take() {
            None => {
                if let Some(label) = label_of(line, BEGIN) {
                    if label != LABEL {
                        return Err(PemError::UnexpectedLabel {
                            line: number,
                            label: label.to_string(),
                        });
                    }

                    open = Some(Block {
                        begin: number,
                        text: format!("{line}\n"),
                        lines: 0,
                        padded: None,
                    });
                } else if !blocks.is_empty() && !line.is_empty() {
                    return Err(PemError::TrailingData(number));
                }
            }
            Some(mut block) => {
                if let Some(label) = label_of(line, END) {
                    if label != LABEL {
                        return Err(PemError::LabelMismatch {
                            line: number,
                            begin: LABEL.to_string(),
                            end: label.to_string(),
                        });
                    }

                    if block.lines == 0 {
                        return Err(PemError::EmptyBody(block.begin));
                    }

                    block.text.push_str(line);
                    block.text.push('\n');
                    blocks.push(decode_block(&block)?);
                    continue;
                }

                if line.starts_with(BEGIN) {
                    return Err(PemError::MissingEndMarker(block.begin));
                }

                if line.len() > MAX_LINE {
                    return Err(PemError::LineTooLong {
                        line: number,
                        len: line.len(),
                    });
                }

                // Padding ends the body: a padded line followed by more data
                // is the bad one.
                if let Some(padded) = block.padded {
                    return Err(PemError::InvalidBase64(padded));
                }

                if STANDARD.decode(line).is_err() {
                    return Err(PemError::InvalidBase64(number));
                }

                if line.ends_with('=') {
                    block.padded = Some(number);
                }

                block.text.push_str(line);
                block.text.push('\n');
                block.lines += 1;
                open = Some(block);
            }
        }
    }

    if let Some(block) = open {
        return Err(PemError::MissingEndMarker(block.begin));
    }

    if blocks.is_empty() {
        return Err(PemError::MissingBeginMarker);
    }

    Ok(blocks)
}

/// Whether `pem` holds at least one structurally valid certificate block.
pub fn is_well_formed(pem: &[u8]) -> bool {
    decode_certificates(pem).is_ok()
}
