//! Part 3: variable-length code
//! ============================
//!
//! The suffix of a funycode string is a run of base-62 digits with no
//! internal framing: each delta is spelled least-significant-digit first and
//! is self-terminating. The trick (inherited from RFC 3492's generalized
//! variable-length integers) is that each digit position has a _threshold_:
//! a digit strictly below its position's threshold is the last digit of its
//! delta, while a digit at or above it says "more follow", contributing
//! `digit - t` at the current weight and multiplying the weight by `62 - t`.
//!
//! The thresholds are not fixed. They are derived from a _bias_ that tracks
//! how large recent deltas have been, so that a run of similar insertions --
//! the common case when a name sticks to one script or one flavour of
//! punctuation -- settles into single-digit codes. The threshold for the
//! digit at 1-based position k under bias b is
//!
//! ```text
//! t(k, b) = clamp(k*62 - b, TMIN, TMAX)
//! ```
//!
//! and after every insertion the bias is re-centred around the delta just
//! coded (see adapt below).
//!
//! Choice of parameters
//! --------------------
//!
//! BASE is 62 because that is all the alphabet there is once the separator
//! underscore is spoken for. TMIN and TMAX bracket the thresholds away from
//! the degenerate ends: a threshold of 0 could never terminate a code, one
//! of 62 could never continue one. SKEW is scaled up from the RFC 3492
//! value in rough proportion to the wider base, and the initial bias of
//! 2*62 - 52/2 = 98 pins the first threshold down to TMIN, which makes the
//! opening digit of a fresh suffix maximally dense.
//!
//! The digit alphabet is `0-9A-Za-z`, in that order. Anything outside the
//! three runs is a hard decode error.

use crate::DecodeError;

pub const BASE: u64 = 62;
pub const TMIN: u64 = 1;
pub const TMAX: u64 = 52;
pub const SKEW: u64 = 208;
pub const DAMP: u64 = 700;

pub const INITIAL_BIAS: u64 = BASE * 2 - TMAX / 2;
const_assert_eq!(assert_bias; INITIAL_BIAS, 98);

/// Map a digit value 0..=61 to its ASCII spelling.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn digit_char(v: u64) -> char {
    debug_assert!(v < BASE);
    match v {
        0..=9 => (b'0' + v as u8) as char,
        10..=35 => (b'A' + (v - 10) as u8) as char,
        _ => (b'a' + (v - 36) as u8) as char,
    }
}

/// Inverse of digit_char. None for bytes outside the alphabet, including
/// the separator underscore.
#[inline]
pub fn digit_value(b: u8) -> Option<u64> {
    match b {
        b'0'..=b'9' => Some(u64::from(b - b'0')),
        b'A'..=b'Z' => Some(u64::from(b - b'A') + 10),
        b'a'..=b'z' => Some(u64::from(b - b'a') + 36),
        _ => None,
    }
}

/// Threshold for the digit at 1-based position `k` under `bias`.
#[inline]
fn threshold(k: u64, bias: u64) -> u64 {
    (k * BASE).saturating_sub(bias).clamp(TMIN, TMAX)
}

/// Append the digits of `delta` to `out`.
pub fn encode_delta(mut delta: u64, bias: u64, out: &mut String) {
    trace!(
        "VariableLengthCode: encoding delta {} under bias {}",
        delta,
        bias
    );
    let mut k = 1;
    loop {
        let t = threshold(k, bias);
        if delta < t {
            out.push(digit_char(delta));
            return;
        }
        out.push(digit_char(t + (delta - t) % (BASE - t)));
        delta = (delta - t) / (BASE - t);
        k += 1;
    }
}

/// Read one delta off the front of `s`, returning it and the remaining
/// bytes. The accumulation is checked: a digit run long enough to overflow
/// 64 bits is malformed by construction, so the overflow check doubles as
/// the guard against suffixes that never terminate.
pub fn decode_delta(s: &[u8], bias: u64) -> Result<(u64, &[u8]), DecodeError> {
    let mut delta: u64 = 0;
    let mut weight: u64 = 1;
    let mut k = 1;
    let mut rest = s;
    loop {
        let (&b, tail) = match rest.split_first() {
            None => return Err(DecodeError::TruncatedInput),
            Some(split) => split,
        };
        rest = tail;
        let v = match digit_value(b) {
            None => return Err(DecodeError::InvalidDigit(b as char)),
            Some(v) => v,
        };
        delta = v
            .checked_mul(weight)
            .and_then(|vw| delta.checked_add(vw))
            .ok_or(DecodeError::DeltaOverflow)?;
        let t = threshold(k, bias);
        if v < t {
            trace!("VariableLengthCode: decoded delta {}", delta);
            return Ok((delta, rest));
        }
        weight = weight
            .checked_mul(BASE - t)
            .ok_or(DecodeError::DeltaOverflow)?;
        k += 1;
    }
}

/// Re-centre the bias after coding a delta of size `delta` into a
/// reconstruction that now holds `num_points` symbols. The delta is cut
/// down -- by DAMP on the very first insertion, which overshoots the most,
/// in half afterwards -- topped up with the per-symbol share of the
/// undamped delta, then folded down in base BASE-TMIN until it sits under
/// the pivot; what is left sets the new bias. Note the share term divides
/// the delta as coded, not the damped value.
pub fn adapt(delta: u64, num_points: u64, first: bool) -> u64 {
    let damped = if first { delta / DAMP } else { delta / 2 };
    let mut delta = damped + delta / num_points;
    let mut k = 0;
    while delta > ((BASE - TMIN) * TMAX) / 2 {
        delta /= BASE - TMIN;
        k += BASE;
    }
    k + ((BASE - TMIN + 1) * delta) / (delta + SKEW)
}
