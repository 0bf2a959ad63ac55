// Line filter over the funycode codec.
// funycode [-e] < names.txt
//
// Decodes stdin to stdout line by line; -e encodes instead. Anything that
// fails to transcode stops the filter with a message on stderr.

use funycode::{decode_to_string, encode_str};
use std::env;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::process;

// A simple type alias so as to DRY.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A decode that balloons past what 16 bits can address was almost
/// certainly fed plain text; the caller wanted -e.
const DECODE_LIMIT: usize = 0xFFFF;

fn transform(line: &str, encoding: bool) -> Result<String> {
    if encoding {
        return Ok(encode_str(line)?);
    }
    let plain = decode_to_string(line)?;
    if plain.chars().count() > DECODE_LIMIT {
        return Err(format!(
            "decoded line exceeds {} characters; did you mean -e?",
            DECODE_LIMIT
        )
        .into());
    }
    Ok(plain)
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<bool> {
    let mut encoding = false;
    for arg in args {
        match arg.as_str() {
            "-e" => encoding = true,
            _ => return Err(format!("unknown flag: {}", arg).into()),
        }
    }
    Ok(encoding)
}

fn main() {
    let encoding = match parse_args(env::args().skip(1)) {
        Ok(encoding) => encoding,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: funycode [-e]");
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let result = line
            .map_err(Into::into)
            .and_then(|line| transform(&line, encoding))
            .and_then(|transformed| Ok(writeln!(out, "{}", transformed)?));
        if let Err(e) = result {
            eprintln!("funycode: {}", e);
            process::exit(1);
        }
    }
}
