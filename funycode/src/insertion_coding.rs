//! Part 2: insertion coding
//! ========================
//!
//! The second stage spells a mixed symbol stream as an identifier. It is a
//! bootstring in the RFC 3492 mold, re-based for the C identifier alphabet:
//! symbols that are already identifier material -- letters anywhere, digits
//! once a letter has led the way -- are copied verbatim into a _prefix_, and
//! everything else (punctuation, non-ASCII scalars, leading digits, and the
//! back-reference tokens from part 1) is carried in a base-62 _suffix_, one
//! insertion at a time.
//!
//! The decoder's view explains the suffix best: it starts from the bare
//! prefix and replays insertions in order of ascending code point, each one
//! a single integer that jointly advances the code point being inserted and
//! picks the position to insert it at. The encoder therefore sorts its
//! out-of-alphabet symbols by (code point, original position), rewrites each
//! original position as a position in the partially rebuilt string, and
//! emits the gap to the previous insertion state as one delta:
//!
//! ```text
//! delta = wc*(declen+1) + pos - last
//! ```
//!
//! where declen is how many symbols the reconstruction holds so far. Equal
//! code points must stay ordered by original position or the positional
//! rewrite above goes wrong; the sort key includes the position for exactly
//! that reason.
//!
//! Separator placement
//! -------------------
//!
//! A single underscore glues the halves, placed so the whole is a valid
//! identifier and the split is unambiguous: with a non-empty prefix it sits
//! between the halves (the prefix starts with a letter by the leading-digit
//! rule); with an empty prefix it is pushed to the _end_ instead, so the
//! string never leads with `_`. Decoding mirrors this: a trailing `_` marks
//! a suffix-only string, otherwise the first `_` (if any) is the split.
//!
//! The suffix-only case also shifts the initial decoder state down by 10 per
//! slot so that small first insertions (starting with the space at U+0020,
//! the lowest scalar the format carries) spell their first digit as a
//! letter rather than a digit.

use crate::variable_length_code::{adapt, decode_delta, encode_delta, INITIAL_BIAS};
use crate::{DecodeError, Symbol};

/// The code point the insertion state starts from. Scalars below this
/// cannot be carried; `encode` screens them out at the API boundary.
pub const INITIAL_N: Symbol = 32;

const SEPARATOR: char = '_';

/// Letters are always prefix material; digits only once a letter has been
/// emitted, so the prefix can never lead with one. Everything else --
/// including `_`, which is reserved for the separator -- goes to the suffix.
#[inline]
fn is_basic(sym: Symbol, seen_basic: bool) -> bool {
    match sym {
        0x41..=0x5A | 0x61..=0x7A => true, // A-Z a-z
        0x30..=0x39 => seen_basic,         // 0-9
        _ => false,
    }
}

/// An out-of-alphabet symbol and where it sat in the compressed stream.
struct CodeEntry {
    wc: Symbol,
    pos: usize,
}

/// Spell a compressed symbol stream as an identifier. Infallible: every
/// symbol is either basic or a code point at or above INITIAL_N (the API
/// layer guarantees the latter for scalars, and the token band is far
/// above it).
#[allow(clippy::cast_possible_truncation)]
pub fn encode(src: &[Symbol]) -> String {
    let mut out = String::with_capacity(src.len() + 1);
    let mut entries: Vec<CodeEntry> = Vec::new();
    for (pos, &wc) in src.iter().enumerate() {
        if is_basic(wc, !out.is_empty()) {
            out.push(wc as u8 as char);
        } else {
            debug_assert!(wc >= INITIAL_N);
            entries.push(CodeEntry { wc, pos });
        }
    }
    if entries.is_empty() {
        return out;
    }
    let prefix_len = out.len() as u64;
    if prefix_len > 0 {
        out.push(SEPARATOR);
    }

    entries.sort_by_key(|e| (e.wc, e.pos));

    let mut last = INITIAL_N as u64 * (prefix_len + 1);
    if prefix_len == 0 {
        last -= 10 * (prefix_len + 1);
    }
    let mut declen = prefix_len;
    let mut bias = INITIAL_BIAS;
    for (i, entry) in entries.iter().enumerate() {
        // Rewrite the original position as an insertion position: symbols
        // that sat earlier in the stream but insert later are not present
        // yet when the decoder replays this step.
        let not_yet = entries[i + 1..].iter().filter(|e| e.pos < entry.pos).count();
        let pos = (entry.pos - not_yet) as u64;
        let wc = u64::from(entry.wc);
        let delta = wc * (declen + 1) + pos - last;
        trace!(
            "InsertionCoding: insert 0x{:X} at {} (delta {})",
            entry.wc,
            pos,
            delta
        );
        encode_delta(delta, bias, &mut out);
        last = wc * (declen + 2) + pos + 1;
        declen += 1;
        bias = adapt(delta, declen, i == 0);
    }
    if prefix_len == 0 {
        out.push(SEPARATOR);
    }
    out
}

/// Split an encoded string into prefix and suffix. A trailing `_` marks a
/// suffix-only string; otherwise the first `_` separates the halves, and a
/// string without one is all prefix.
fn split(input: &str) -> (&str, &str) {
    if input.ends_with(SEPARATOR) {
        return ("", &input[..input.len() - 1]);
    }
    match input.find(SEPARATOR) {
        None => (input, ""),
        Some(at) => (&input[..at], &input[at + 1..]),
    }
}

/// Replay an identifier back into the symbol stream it spells. The prefix
/// is taken verbatim; each suffix delta advances the (code point, position)
/// state and inserts one symbol into the reconstruction.
pub fn decode(input: &str) -> Result<Vec<Symbol>, DecodeError> {
    let (prefix, suffix) = split(input);
    let mut symbols: Vec<Symbol> = prefix.chars().map(|c| c as Symbol).collect();

    let prefix_len = symbols.len() as u64;
    let mut last = INITIAL_N as u64 * (prefix_len + 1);
    if prefix_len == 0 {
        last -= 10 * (prefix_len + 1);
    }
    let mut bias = INITIAL_BIAS;
    let mut first = true;
    let mut rest = suffix.as_bytes();
    while !rest.is_empty() {
        let (delta, tail) = decode_delta(rest, bias)?;
        rest = tail;
        let value = last.checked_add(delta).ok_or(DecodeError::DeltaOverflow)?;
        let width = symbols.len() as u64 + 1;
        let wc = value / width;
        let pos = value % width;
        trace!("InsertionCoding: insert 0x{:X} at {}", wc, pos);
        let sym = match Symbol::try_from(wc) {
            Err(_) => return Err(DecodeError::CharOutOfRange(wc)),
            Ok(sym) => sym,
        };
        symbols.insert(pos as usize, sym);
        last = wc
            .checked_mul(width + 1)
            .and_then(|w| w.checked_add(pos + 1))
            .ok_or(DecodeError::DeltaOverflow)?;
        bias = adapt(delta, symbols.len() as u64, first);
        first = false;
    }
    Ok(symbols)
}
