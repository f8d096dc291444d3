//! Character encoding detection for text input.
//!
//! Decoding order:
//! 1. empty input decodes to the empty string
//! 2. a UTF-8 byte-order mark is stripped
//! 3. strict UTF-8
//! 4. each configured fallback encoding, strictly, in order
//! 5. optionally, a statistical guess from `chardetng`, strictly
//! 6. lossy UTF-8 with U+FFFD substitution
//!
//! Step 6 never fails, so decoding as a whole never fails.

use crate::core::config::TextConfig;
use crate::types::{ConvertedText, Diagnostic};
use crate::{ConvertError, Result};
use chardetng::EncodingDetector;
use encoding_rs::{EUC_KR, Encoding, REPLACEMENT, UTF_8};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Resolve an encoding label, accepting the Windows code page names for Korean.
///
/// `cp949`, `uhc` and `ms949` map to encoding_rs's `EUC-KR`, which implements
/// the full Windows-949 (Unified Hangul Code) repertoire.
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "cp949" | "uhc" | "ms949" | "x-windows-949" => Some(EUC_KR),
        _ => Encoding::for_label(normalized.as_bytes()).filter(|encoding| *encoding != REPLACEMENT),
    }
}

/// Text decoded from bytes, with the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    /// True when undecodable bytes were replaced with U+FFFD.
    pub lossy: bool,
}

impl DecodedText {
    pub fn into_converted(self) -> ConvertedText {
        let converted = ConvertedText::new(self.text).with_encoding(self.encoding.name());
        if self.lossy {
            converted.with_diagnostic(Diagnostic::LossyDecode)
        } else {
            converted
        }
    }
}

/// Decoder holding the resolved fallback chain.
#[derive(Debug, Clone)]
pub struct TextDecoder {
    fallbacks: Vec<&'static Encoding>,
    statistical_detection: bool,
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self {
            fallbacks: vec![EUC_KR],
            statistical_detection: false,
        }
    }
}

impl TextDecoder {
    pub fn new(config: &TextConfig) -> Result<Self> {
        let fallbacks = config
            .fallback_encodings
            .iter()
            .map(|label| {
                resolve_encoding(label)
                    .ok_or_else(|| ConvertError::validation(format!("Unknown encoding label '{}'", label)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fallbacks,
            statistical_detection: config.statistical_detection,
        })
    }

    pub fn fallbacks(&self) -> &[&'static Encoding] {
        &self.fallbacks
    }

    pub fn decode(&self, content: &[u8]) -> DecodedText {
        let bytes = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        if bytes.is_empty() {
            return DecodedText {
                text: String::new(),
                encoding: UTF_8,
                lossy: false,
            };
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            return DecodedText {
                text: text.to_string(),
                encoding: UTF_8,
                lossy: false,
            };
        }

        for encoding in &self.fallbacks {
            if let Some(text) = decode_strict(encoding, bytes) {
                tracing::debug!(encoding = encoding.name(), "Decoded text with fallback encoding");
                return DecodedText {
                    text,
                    encoding,
                    lossy: false,
                };
            }
        }

        if self.statistical_detection {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            let guess = detector.guess(None, true);
            if guess != UTF_8
                && let Some(text) = decode_strict(guess, bytes)
            {
                tracing::debug!(encoding = guess.name(), "Decoded text with detected encoding");
                return DecodedText {
                    text,
                    encoding: guess,
                    lossy: false,
                };
            }
        }

        tracing::warn!(
            bytes = bytes.len(),
            "No encoding decoded the input cleanly; substituting replacement characters"
        );
        DecodedText {
            text: String::from_utf8_lossy(bytes).into_owned(),
            encoding: UTF_8,
            lossy: true,
        }
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}
