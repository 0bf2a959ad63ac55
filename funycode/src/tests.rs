use crate::match_compression;
use crate::{decode, decode_to_string, encode_str};
use crate::{DecodeError, DecodeFunycode, EncodeError, EncodeFunycode};
extern crate env_logger;
extern crate quickcheck;

fn check_vector(plain: &str, coded: &str) {
    let _ = env_logger::try_init();
    assert_eq!(encode_str(plain).unwrap(), coded);
    assert_eq!(decode_to_string(coded).unwrap(), plain);
}

#[test]
fn test_100k_random_strings() {
    use self::quickcheck::*;
    fn check_one(s: String) -> bool {
        let _ = env_logger::try_init();
        // Scalars below U+0020 have no funycode spelling; see
        // test_control_chars_rejected for what happens to them.
        let s: String = s.chars().filter(|c| *c >= ' ').collect();
        let _ = debug!("quickcheck: {:?}", s);
        let coded = s.as_str().encode_funycode().unwrap();
        let plain = coded.as_str().decode_funycode().unwrap();
        plain == s
    }
    QuickCheck::new()
        .tests(100_000)
        .max_tests(100_000)
        .quickcheck(check_one as fn(String) -> bool)
}

#[test]
fn test_50k_random_strings_wellformed() {
    use self::quickcheck::*;
    fn check_one(s: String) -> bool {
        let _ = env_logger::try_init();
        let s: String = s.chars().filter(|c| *c >= ' ').collect();
        let coded = s.as_str().encode_funycode().unwrap();
        if s.is_empty() {
            return coded.is_empty();
        }
        !coded.is_empty()
            && !coded.starts_with('_')
            && coded.chars().filter(|c| *c == '_').count() <= 1
            && coded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    QuickCheck::new()
        .tests(50_000)
        .max_tests(50_000)
        .quickcheck(check_one as fn(String) -> bool)
}

#[test]
fn test_50k_random_string_pairs_injective() {
    use self::quickcheck::*;
    fn check_two(s1: String, s2: String) -> bool {
        let _ = env_logger::try_init();
        let s1: String = s1.chars().filter(|c| *c >= ' ').collect();
        let s2: String = s2.chars().filter(|c| *c >= ' ').collect();
        let c1 = s1.as_str().encode_funycode().unwrap();
        let c2 = s2.as_str().encode_funycode().unwrap();
        (s1 == s2) == (c1 == c2)
    }
    QuickCheck::new()
        .tests(50_000)
        .max_tests(50_000)
        .quickcheck(check_two as fn(String, String) -> bool)
}

#[test]
fn test_plain() {
    check_vector("foo", "foo");
}

#[test]
fn test_underscored_name() {
    check_vector("foo_bar", "foobar_H7");
}

#[test]
fn test_long_plain_word() {
    check_vector(
        "supercalifragilisticexpialidocious",
        "supercalifragilisticexpialidocious",
    );
}

#[test]
fn test_umlauts() {
    check_vector("bücher", "bcher_eL");
}

#[test]
fn test_more_umlauts() {
    check_vector("hörbücher", "hrbcher_5S0u0");
}

#[test]
fn test_lone_underscore() {
    check_vector("_", "C1_");
}

#[test]
fn test_lone_space() {
    check_vector(" ", "A0_");
}

#[test]
fn test_kanji() {
    check_vector("自転車", "qeE4K2A1_");
}

#[test]
fn test_cyrillic() {
    check_vector("велосипед", "FH420EHL9G_");
}

#[test]
fn test_empty() {
    check_vector("", "");
}

#[test]
fn test_astral_plane() {
    let _ = env_logger::try_init();
    let coded = "𝓯𝓸𝓸".encode_funycode().unwrap();
    assert!(coded.ends_with('_'));
    assert!(!coded.starts_with('_'));
    assert!(coded.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    assert_eq!(coded.as_str().decode_funycode().unwrap(), "𝓯𝓸𝓸");
}

#[test]
fn test_decode_bare_prefix() {
    let _ = env_logger::try_init();
    assert_eq!(decode_to_string("Abc123").unwrap(), "Abc123");
}

#[test]
fn test_overlapping_matches() {
    let _ = env_logger::try_init();
    for input in &["abababababababab", "aaaaaaaaaa", "xyxyxyxyxyxyxyxyxyxyxyxyxyz"] {
        let coded = input.encode_funycode().unwrap();
        // A run this regular must trip the compressor, so the coded form
        // carries a suffix.
        assert!(coded.contains('_'), "no match fired for {:?}", input);
        assert_eq!(coded.as_str().decode_funycode().unwrap(), *input);
    }
}

#[test]
fn test_cxx_symbol_compresses() {
    let _ = env_logger::try_init();
    let symbol = "std::__1::__function::__func<void (*)(std::__1::error_code*, \
                  std::__1::error_code*, std::__1::error_code*, std::__1::error_code*, \
                  std::__1::error_code*, std::__1::error_code*, std::__1::error_code*, \
                  std::__1::error_code*)>::operator()(std::__1::error_code*)";
    let coded = symbol.encode_funycode().unwrap();
    assert!(coded.len() < 200, "coded to {} bytes", coded.len());
    assert_eq!(coded.as_str().decode_funycode().unwrap(), symbol);
}

#[test]
fn test_hash_table_pressure() {
    let _ = env_logger::try_init();
    // 676 distinct letter pairs: far more three-symbol windows than hash
    // slots, and not a single four-symbol repeat, so the output must come
    // back untouched.
    let mut input = String::new();
    for hi in b'A'..=b'Z' {
        for lo in b'a'..=b'z' {
            input.push(hi as char);
            input.push(lo as char);
        }
    }
    let coded = input.as_str().encode_funycode().unwrap();
    assert_eq!(coded, input);
    assert_eq!(coded.as_str().decode_funycode().unwrap(), input);
}

#[test]
fn test_match_distances_bounded() {
    let _ = env_logger::try_init();
    let src: Vec<u32> = "std::__1::vector<std::__1::vector<std::__1::vector<int>>>"
        .chars()
        .map(|c| c as u32)
        .collect();
    let packed = match_compression::compress(&src);
    assert!(packed.len() <= src.len());
    assert!(packed.iter().any(|&sym| match_compression::is_match(sym)));
    let mut expanded = 0_usize;
    for &sym in &packed {
        if match_compression::is_match(sym) {
            let (len, dist) = match_compression::unpack_match(sym);
            assert!(dist <= expanded);
            expanded += len;
        } else {
            expanded += 1;
        }
    }
    assert_eq!(expanded, src.len());
}

#[test]
fn test_control_chars_rejected() {
    let _ = env_logger::try_init();
    assert_eq!(
        encode_str("a\tb"),
        Err(EncodeError::UnencodableChar('\t'))
    );
    assert_eq!(
        encode_str("line\n"),
        Err(EncodeError::UnencodableChar('\n'))
    );
}

#[test]
fn test_decode_invalid_digit() {
    let _ = env_logger::try_init();
    assert_eq!(decode("ab_!x"), Err(DecodeError::InvalidDigit('!')));
}

#[test]
fn test_decode_second_separator() {
    let _ = env_logger::try_init();
    // The second underscore lands in the suffix, where it is not a digit.
    assert_eq!(decode("ab_C1_x"), Err(DecodeError::InvalidDigit('_')));
}

#[test]
fn test_decode_truncated_suffix() {
    let _ = env_logger::try_init();
    assert_eq!(decode("foo_9"), Err(DecodeError::TruncatedInput));
}

#[test]
fn test_decode_match_before_start() {
    let _ = env_logger::try_init();
    // "8gO" spells 0xD800: a copy of 4 symbols from 1 back, into an empty
    // reconstruction.
    assert_eq!(
        decode("8gO_"),
        Err(DecodeError::MatchOutOfRange { len: 4, dist: 1 })
    );
}

#[test]
fn test_decode_scalar_out_of_range() {
    let _ = env_logger::try_init();
    // "lluj" spells 0x110000, one past the last unicode scalar value.
    assert_eq!(decode("lluj_"), Err(DecodeError::CharOutOfRange(0x110000)));
}

#[test]
fn test_decode_overlong_suffix() {
    let _ = env_logger::try_init();
    // A run of maximal digits never terminates a delta; the checked
    // accumulator gives out around the eighteenth digit.
    let mut s = String::from("a_");
    for _ in 0..24 {
        s.push('z');
    }
    assert_eq!(decode(&s), Err(DecodeError::DeltaOverflow));
}
