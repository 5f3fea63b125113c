//! Supported charsets, text transcoding and charset detection

use crate::codec::CodecError;
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Charset used whenever nothing better can be resolved
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Canonical names of the charsets this runtime can transcode
///
/// Membership is by canonical name only and ignores case: `UTF-8` is a
/// member, the alias `utf8` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedCharsets {
    names: BTreeSet<String>,
}

impl SupportedCharsets {
    /// Build a set from explicit names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Get the set of every charset the transcoder handles
    pub fn runtime() -> Arc<SupportedCharsets> {
        static INSTANCE: OnceCell<Arc<SupportedCharsets>> = OnceCell::new();
        INSTANCE
            .get_or_init(|| {
                let encodings = [
                    encoding_rs::UTF_8,
                    encoding_rs::UTF_16BE,
                    encoding_rs::UTF_16LE,
                    encoding_rs::IBM866,
                    encoding_rs::ISO_8859_2,
                    encoding_rs::ISO_8859_3,
                    encoding_rs::ISO_8859_4,
                    encoding_rs::ISO_8859_5,
                    encoding_rs::ISO_8859_6,
                    encoding_rs::ISO_8859_7,
                    encoding_rs::ISO_8859_8,
                    encoding_rs::ISO_8859_10,
                    encoding_rs::ISO_8859_13,
                    encoding_rs::ISO_8859_14,
                    encoding_rs::ISO_8859_15,
                    encoding_rs::ISO_8859_16,
                    encoding_rs::KOI8_R,
                    encoding_rs::KOI8_U,
                    encoding_rs::MACINTOSH,
                    encoding_rs::WINDOWS_874,
                    encoding_rs::WINDOWS_1250,
                    encoding_rs::WINDOWS_1251,
                    encoding_rs::WINDOWS_1252,
                    encoding_rs::WINDOWS_1253,
                    encoding_rs::WINDOWS_1254,
                    encoding_rs::WINDOWS_1255,
                    encoding_rs::WINDOWS_1256,
                    encoding_rs::WINDOWS_1257,
                    encoding_rs::WINDOWS_1258,
                    encoding_rs::X_MAC_CYRILLIC,
                    encoding_rs::GBK,
                    encoding_rs::GB18030,
                    encoding_rs::BIG5,
                    encoding_rs::EUC_JP,
                    encoding_rs::SHIFT_JIS,
                    encoding_rs::EUC_KR,
                ];
                let names = encodings
                    .iter()
                    .map(|e| e.name())
                    .chain(["utf-16", "iso-8859-1", "us-ascii"]);
                Arc::new(SupportedCharsets::from_names(names))
            })
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for SupportedCharsets {
    fn default() -> Self {
        Self::runtime().as_ref().clone()
    }
}

fn lookup(charset: &str) -> Result<&'static Encoding, CodecError> {
    Encoding::for_label(charset.trim().as_bytes())
        .ok_or_else(|| CodecError::UnsupportedCharset(charset.to_string()))
}

/// Decode `data` as text in `charset`
///
/// A byte order mark overrides `charset`. `utf-16` without a byte order
/// mark is read big-endian. Malformed sequences become U+FFFD.
pub fn decode_text<'a>(data: &'a [u8], charset: &str) -> Result<Cow<'a, str>, CodecError> {
    let mut encoding = lookup(charset)?;
    if charset.trim().eq_ignore_ascii_case("utf-16") && Encoding::for_bom(data).is_none() {
        encoding = UTF_16BE;
    }
    let (text, _, _) = encoding.decode(data);
    Ok(text)
}

/// Encode `text` in `charset`
///
/// `utf-16` is written big-endian with a byte order mark. Characters the
/// charset cannot represent are an error.
pub fn encode_text<'a>(text: &'a str, charset: &str) -> Result<Cow<'a, [u8]>, CodecError> {
    let encoding = lookup(charset)?;
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(text.as_bytes()));
    }
    if charset.trim().eq_ignore_ascii_case("utf-16") {
        let mut out = vec![0xFE, 0xFF];
        out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        return Ok(Cow::Owned(out));
    }
    if encoding == UTF_16BE {
        return Ok(Cow::Owned(
            text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        ));
    }
    if encoding == UTF_16LE {
        return Ok(Cow::Owned(
            text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        ));
    }

    let (bytes, _, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(CodecError::Serialization(format!(
            "text is not representable in {charset}"
        )));
    }
    Ok(bytes)
}

/// Guesses the charset of raw request bytes
pub trait CharsetDetector: Send + Sync {
    fn detect(&self, data: &[u8]) -> Option<String>;
}

impl<F> CharsetDetector for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn detect(&self, data: &[u8]) -> Option<String> {
        self(data)
    }
}

/// Detects UTF-8 and UTF-16 from a leading byte order mark
#[derive(Debug, Clone, Copy, Default)]
pub struct BomDetector;

impl CharsetDetector for BomDetector {
    fn detect(&self, data: &[u8]) -> Option<String> {
        Encoding::for_bom(data).map(|(encoding, _)| encoding.name().to_ascii_lowercase())
    }
}
