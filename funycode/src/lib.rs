//! Funycode is a reversible mapping from arbitrary unicode strings onto the
//! restricted alphabet of C identifiers -- the 62 alphanumerics plus
//! underscore -- arranged so that every output is a plausible, non-reserved
//! identifier: it never starts with a digit or an underscore. The intended
//! use is mechanical mangling of the long, namespace-laden, highly repetitive
//! symbol names modern languages produce into something a C toolchain will
//! tolerate, while staying short enough to read in a linker map.
//!
//! The codec runs in two stages, each reversible on its own:
//!
//!   1. A bounded LZ77-style compressor that leaves most symbols alone and
//!      replaces repeats with back-reference tokens squirrelled away in the
//!      UTF-16 low-surrogate band (see match_compression). Well-formed
//!      unicode text never contains surrogates, so the band is free.
//!
//!   2. A bootstring-derived coder that copies the alphanumeric symbols
//!      verbatim into a prefix and spells every remaining symbol -- including
//!      the tokens from stage 1 -- as a delta in a base-62 suffix, the two
//!      halves glued with a single underscore (see insertion_coding and
//!      variable_length_code).
//!
//! Encoding is compress-then-spell; decoding is the mirror image. Both
//! directions are whole-buffer, synchronous and allocation-local: no state
//! survives a call, and separate calls are trivially parallel.

#[macro_use]
extern crate log;
#[macro_use]
extern crate static_assertions;

mod insertion_coding;
mod match_compression;
mod variable_length_code;

#[cfg(test)]
mod tests;

use thiserror::Error;

/// The unit the codec works on internally: either a unicode scalar value or
/// a back-reference token in 0xD800..=0xDFFF. Rust's `char` cannot represent
/// the token band, which is exactly why the band is safe to use.
pub(crate) type Symbol = u32;

/// The one input class the suffix format cannot carry: scalars below
/// U+0020. They would sort ahead of the decoder's starting code point and
/// drive the first insertion delta negative.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("character {0:?} is below U+0020 and has no funycode spelling")]
    UnencodableChar(char),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("'{0}' is not a base-62 digit")]
    InvalidDigit(char),
    #[error("suffix ends in the middle of a delta")]
    TruncatedInput,
    #[error("suffix delta does not fit in 64 bits")]
    DeltaOverflow,
    #[error("match of {len} symbols reaches {dist} back, before the output start")]
    MatchOutOfRange { len: usize, dist: usize },
    #[error("decoded symbol 0x{0:X} is not a unicode scalar value")]
    CharOutOfRange(u64),
}

/// Encode a sequence of unicode scalars as a C identifier.
///
/// The empty input maps to the empty string; every other well-formed input
/// maps to a non-empty string over `[0-9A-Za-z_]`. Fails only for scalars
/// below U+0020, which the wire format cannot represent.
pub fn encode(input: &[char]) -> Result<String, EncodeError> {
    if let Some(&c) = input.iter().find(|&&c| (c as Symbol) < insertion_coding::INITIAL_N) {
        return Err(EncodeError::UnencodableChar(c));
    }
    let scalars: Vec<Symbol> = input.iter().map(|&c| c as Symbol).collect();
    let packed = match_compression::compress(&scalars);
    Ok(insertion_coding::encode(&packed))
}

/// Decode a funycode identifier back to the unicode scalars it encodes.
pub fn decode(input: &str) -> Result<Vec<char>, DecodeError> {
    let symbols = insertion_coding::decode(input)?;
    match_compression::decompress(&symbols)
}

/// Convenience wrapper around [`encode`] for `str` input.
#[inline]
pub fn encode_str(input: &str) -> Result<String, EncodeError> {
    let scalars: Vec<char> = input.chars().collect();
    encode(&scalars)
}

/// Convenience wrapper around [`decode`] that collects into a `String`.
#[inline]
pub fn decode_to_string(input: &str) -> Result<String, DecodeError> {
    decode(input).map(|chars| chars.into_iter().collect())
}

pub trait EncodeFunycode {
    fn encode_funycode(self: &Self) -> Result<String, EncodeError>;
}

impl EncodeFunycode for str {
    fn encode_funycode(self: &Self) -> Result<String, EncodeError> {
        encode_str(self)
    }
}

impl EncodeFunycode for [char] {
    fn encode_funycode(self: &Self) -> Result<String, EncodeError> {
        encode(self)
    }
}

pub trait DecodeFunycode {
    fn decode_funycode(self: &Self) -> Result<String, DecodeError>;
}

impl DecodeFunycode for str {
    fn decode_funycode(self: &Self) -> Result<String, DecodeError> {
        decode_to_string(self)
    }
}
