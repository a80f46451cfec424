//! Character-set classification of message bodies.
//!
//! A body is [`EncodingMode::Standard`] when every code point belongs to the
//! active [`Repertoire`], and [`EncodingMode::Extended`] as soon as a single
//! code point falls outside of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    Standard,
    Extended,
}

impl EncodingMode {
    /// Characters that fit in one segment under this mode.
    #[inline]
    pub const fn capacity(self) -> usize {
        match self {
            EncodingMode::Standard => 160,
            EncodingMode::Extended => 70,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EncodingMode::Standard => "standard",
            EncodingMode::Extended => "extended",
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The character repertoire that qualifies a body for [`EncodingMode::Standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repertoire {
    /// 7-bit ASCII, U+0000 through U+007F.
    #[default]
    Ascii,
    /// GSM 03.38 default alphabet together with its extension table.
    Gsm7,
}

impl Repertoire {
    #[inline]
    pub fn contains(self, ch: char) -> bool {
        match self {
            Repertoire::Ascii => ch.is_ascii(),
            Repertoire::Gsm7 => is_gsm7(ch),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Repertoire::Ascii => "ascii",
            Repertoire::Gsm7 => "gsm7",
        }
    }
}

impl FromStr for Repertoire {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii" => Ok(Repertoire::Ascii),
            "gsm7" | "gsm" | "gsm-7" => Ok(Repertoire::Gsm7),
            _ => Err(format!(
                "Unknown repertoire: {} (supported: ascii, gsm7)",
                s
            )),
        }
    }
}

impl fmt::Display for Repertoire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_gsm7(ch: char) -> bool {
    matches!(
        ch,
        // printable ASCII except the backtick, which GSM 03.38 lacks
        ' '..='_' | 'a'..='~'
            | '\n' | '\r' | '\x0C'
            | '£' | '¥' | 'è' | 'é' | 'ù' | 'ì' | 'ò' | 'Ç' | 'Ø' | 'ø' | 'Å' | 'å'
            | 'Δ' | 'Φ' | 'Γ' | 'Λ' | 'Ω' | 'Π' | 'Ψ' | 'Σ' | 'Θ' | 'Ξ'
            | 'Æ' | 'æ' | 'ß' | 'É' | '¤' | '¡' | '¿' | '§'
            | 'Ä' | 'Ö' | 'Ñ' | 'Ü' | 'ä' | 'ö' | 'ñ' | 'ü' | 'à'
            | '€'
    )
}

/// Classify `body` against the default [`Repertoire::Ascii`].
pub fn classify(body: &str) -> EncodingMode {
    classify_with(body, Repertoire::Ascii)
}

pub fn classify_with(body: &str, repertoire: Repertoire) -> EncodingMode {
    let standard = match repertoire {
        Repertoire::Ascii => body.is_ascii(),
        Repertoire::Gsm7 => body.chars().all(is_gsm7),
    };

    if standard {
        EncodingMode::Standard
    } else {
        EncodingMode::Extended
    }
}
