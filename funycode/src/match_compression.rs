//! Part 1: match compression
//! =========================
//!
//! The first stage of encoding runs the input scalars through a small LZ77
//! variant. Literals pass through untouched; a repeat of MINCOPY or more
//! symbols within MAXDIST of an earlier occurrence is replaced by a single
//! back-reference token carrying its (length, distance) pair.
//!
//! Tokens travel the rest of the pipeline as ordinary symbols, so they need
//! a home in the code space that no well-formed input can occupy. The
//! UTF-16 low-surrogate band 0xD800..0xDFFF is exactly that home: surrogates
//! are not unicode scalar values, so no legitimate text contains them, and
//! the band's 2048 values are precisely enough to pack a 7-bit distance and
//! a 4-bit length:
//!
//! ```text
//! token = 0xD800 | (dist - MINDIST) << COPYBITS | (len - MINCOPY)
//! ```
//!
//! Choice of parameters
//! --------------------
//!
//! MINCOPY is 4 because a shorter match loses: a token always costs a
//! multi-digit insertion in the suffix, while three alphanumerics cost three
//! bytes of prefix. MAXCOPY and MAXDIST then fall out of the 11 bits the
//! band has to offer, split 4/7; a 128-symbol window is plenty for the
//! namespace-stutter this codec exists to squeeze.
//!
//! The matcher itself is single-pass and greedy: a 512-slot table maps a
//! fingerprint of the MINCOPY-1 symbols at each position to the most recent
//! position that carried the same fingerprint. Collisions are harmless --
//! a candidate is only used after verifying the actual symbols match -- so
//! the fingerprint is just FNV-1a folded onto the table size.

use crate::{DecodeError, Symbol};

pub const MINCOPY: usize = 4;
pub const COPYBITS: usize = 4;
pub const MAXCOPY: usize = MINCOPY + (1 << COPYBITS) - 1;

pub const MINDIST: usize = 1;
pub const DISTBITS: usize = 7;
pub const MAXDIST: usize = MINDIST + (1 << DISTBITS) - 1;

const MATCH_BASE: Symbol = 0xD800;
const MATCH_LIMIT: Symbol = 0xDFFF;

const_assert_eq!(assert_maxcopy; MAXCOPY, 19);
const_assert_eq!(assert_maxdist; MAXDIST, 128);

// The largest (length, distance) pair must land exactly on the end of the
// surrogate band.
const_assert_eq!(assert_band;
    MATCH_BASE as usize + (((MAXDIST - MINDIST) << COPYBITS) | (MAXCOPY - MINCOPY)),
    MATCH_LIMIT as usize);

const HTAB_SIZE: usize = 512;

const FNV_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// True for symbols in the back-reference band.
#[inline]
pub fn is_match(sym: Symbol) -> bool {
    (MATCH_BASE..=MATCH_LIMIT).contains(&sym)
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn pack_match(len: usize, dist: usize) -> Symbol {
    debug_assert!((MINCOPY..=MAXCOPY).contains(&len));
    debug_assert!((MINDIST..=MAXDIST).contains(&dist));
    MATCH_BASE | (((dist - MINDIST) << COPYBITS) | (len - MINCOPY)) as Symbol
}

#[inline]
pub(crate) fn unpack_match(sym: Symbol) -> (usize, usize) {
    debug_assert!(is_match(sym));
    let bits = (sym - MATCH_BASE) as usize;
    ((bits & ((1 << COPYBITS) - 1)) + MINCOPY, (bits >> COPYBITS) + MINDIST)
}

/// FNV-1a over the MINCOPY-1 symbols at the head of `window`, folded onto
/// the hash table size.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn fingerprint(window: &[Symbol]) -> usize {
    let mut h = FNV_BASIS;
    for &sym in &window[..MINCOPY - 1] {
        h ^= u64::from(sym);
        h = h.wrapping_mul(FNV_PRIME);
    }
    (h % (HTAB_SIZE as u64)) as usize
}

/// Compress `src` into a mixed stream of literal symbols and match tokens.
/// The output never exceeds the input in length, and every token's distance
/// stays within the symbols already emitted. Cannot fail.
pub fn compress(src: &[Symbol]) -> Vec<Symbol> {
    let mut htab = [0_usize; HTAB_SIZE];
    let mut out: Vec<Symbol> = Vec::with_capacity(src.len());
    let mut p = 0;
    while p + MINCOPY <= src.len() {
        let q = htab[fingerprint(&src[p..])];
        let mut advance = 1;
        // A slot holding 0 may be an untouched slot rather than a real
        // candidate; the verify pass below does not care, and distance 0 is
        // ruled out either way.
        if q < p && p - q <= MAXDIST {
            let cap = MAXCOPY.min(src.len() - p);
            let len = (0..cap).take_while(|&i| src[q + i] == src[p + i]).count();
            if len >= MINCOPY {
                trace!(
                    "MatchCompression: {} symbols at {} repeat {} back",
                    len,
                    p,
                    p - q
                );
                out.push(pack_match(len, p - q));
                advance = len;
            } else {
                out.push(src[p]);
            }
        } else {
            out.push(src[p]);
        }
        for i in p..p + advance {
            if i + MINCOPY <= src.len() {
                htab[fingerprint(&src[i..])] = i;
            }
        }
        p += advance;
    }
    out.extend_from_slice(&src[p..]);
    out
}

/// Expand a mixed stream back into scalars. Copies run left to right off
/// the output produced so far, so a match may overlap its own expansion.
pub fn decompress(src: &[Symbol]) -> Result<Vec<char>, DecodeError> {
    let mut out: Vec<char> = Vec::with_capacity(src.len());
    for &sym in src {
        if is_match(sym) {
            let (len, dist) = unpack_match(sym);
            if dist > out.len() {
                return Err(DecodeError::MatchOutOfRange { len, dist });
            }
            let from = out.len() - dist;
            for i in from..from + len {
                let c = out[i];
                out.push(c);
            }
        } else {
            match ::std::char::from_u32(sym) {
                None => return Err(DecodeError::CharOutOfRange(u64::from(sym))),
                Some(c) => out.push(c),
            }
        }
    }
    Ok(out)
}
