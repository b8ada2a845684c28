//! Wire-format parser.
//!
//! Positions on the wire are 1-indexed and must lie in `1..=n`; the parser
//! shifts them to the core's 0-indexed form and validates the range, so the
//! memory only ever sees well-formed SDRs.

use crate::config::{DELETE_PREFIX, QUERY, SEPARATOR};
use crate::error::{Result, TriadicError};
use crate::memory::triadic::{Slot, Triple};
use crate::sdr::sdr::Sdr;

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Random,
    Version,
    Store(Triple),
    Delete(Triple),
    Recall(Triple),
}

/// Parse one line for a memory with universe size `n`.
pub fn parse_command(line: &str, n: usize) -> Result<Command> {
    let line = line.trim();
    match line {
        "quit" => return Ok(Command::Quit),
        "random" => return Ok(Command::Random),
        "version" => return Ok(Command::Version),
        _ => {}
    }

    let (delete, body) = match line.strip_prefix(DELETE_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let triple = parse_triple(body, n)?;

    match (delete, triple.unknown_axis()) {
        (false, Ok(None)) => Ok(Command::Store(triple)),
        (true, Ok(None)) => Ok(Command::Delete(triple)),
        (false, Ok(Some(_))) => Ok(Command::Recall(triple)),
        (true, Ok(Some(_))) => Err(TriadicError::Parse(
            "delete cannot contain an unknown part".into(),
        )),
        (_, Err(_)) => Err(TriadicError::Parse(
            "at most one part may be unknown".into(),
        )),
    }
}

/// Parse `{x, y, z}`.
pub fn parse_triple(text: &str, n: usize) -> Result<Triple> {
    let mut cur = Cursor::new(text);
    cur.skip_ws();
    cur.expect('{')?;
    let x = cur.slot(n)?;
    cur.expect(SEPARATOR)?;
    let y = cur.slot(n)?;
    cur.expect(SEPARATOR)?;
    let z = cur.slot(n)?;
    cur.expect('}')?;
    cur.skip_ws();
    if let Some(c) = cur.peek() {
        return Err(TriadicError::Parse(format!(
            "unexpected '{}' after '}}' in: {}",
            c, text
        )));
    }
    Ok(Triple { x, y, z })
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            _ => Err(TriadicError::Parse(format!(
                "expecting '{}', found: {}",
                want,
                self.rest()
            ))),
        }
    }

    fn number(&mut self) -> Result<usize> {
        let digits: &str = {
            let rest = self.rest();
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        };
        self.pos += digits.len();
        digits
            .parse()
            .map_err(|_| TriadicError::Parse(format!("bad position: {}", digits)))
    }

    /// One part: 1-indexed positions, or `_` for the unknown part.
    fn slot(&mut self, n: usize) -> Result<Slot> {
        let mut positions = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    let value = self.number()?;
                    if value == 0 || value > n {
                        return Err(TriadicError::Parse(format!(
                            "position out of range: {} (expected 1..={})",
                            value, n
                        )));
                    }
                    positions.push(value - 1);
                }
                _ => break,
            }
        }

        if positions.is_empty() && self.peek() == Some(QUERY) {
            self.bump();
            return Ok(Slot::Unknown);
        }
        Ok(Slot::Concrete(Sdr::from_positions(n, positions)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdr(n: usize, p: &[usize]) -> Sdr {
        Sdr::from_positions(n, p.iter().copied()).unwrap()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_command("quit\n", 10).unwrap(), Command::Quit);
        assert_eq!(parse_command(" random ", 10).unwrap(), Command::Random);
        assert_eq!(parse_command("version", 10).unwrap(), Command::Version);
    }

    #[test]
    fn test_store_is_zero_indexed() {
        let cmd = parse_command("{1 2 3, 4 5, 10}", 10).unwrap();
        assert_eq!(
            cmd,
            Command::Store(Triple::new(sdr(10, &[0, 1, 2]), sdr(10, &[3, 4]), sdr(10, &[9])))
        );
    }

    #[test]
    fn test_delete_prefix() {
        let cmd = parse_command("-{1, 2, 3}", 5).unwrap();
        assert!(matches!(cmd, Command::Delete(_)));
    }

    #[test]
    fn test_recall_each_axis() {
        for (line, unknown) in [
            ("{_, 2, 3}", 0),
            ("{1 , _ , 3}", 1),
            ("{1,2,_}", 2),
        ] {
            match parse_command(line, 5).unwrap() {
                Command::Recall(t) => {
                    let slots = [&t.x, &t.y, &t.z];
                    assert!(slots[unknown].is_unknown(), "{}", line);
                }
                other => panic!("expected recall for {}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_empty_part_is_concrete_empty() {
        let t = parse_triple("{ , 1, 2}", 5).unwrap();
        assert_eq!(t.x, Slot::Concrete(Sdr::new(5)));
    }

    #[test]
    fn test_out_of_range_positions() {
        assert!(parse_command("{0, 1, 1}", 5).is_err());
        let err = parse_command("{6, 1, 1}", 5).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);
    }

    #[test]
    fn test_missing_braces() {
        let err = parse_command("1, 2, 3}", 5).unwrap_err();
        assert!(err.to_string().contains("expecting '{'"), "{}", err);
        let err = parse_command("{1, 2, 3", 5).unwrap_err();
        assert!(err.to_string().contains("expecting '}'"), "{}", err);
    }

    #[test]
    fn test_invalid_unknown_combinations() {
        assert!(parse_command("{_, _, 3}", 5).is_err());
        assert!(parse_command("-{_, 2, 3}", 5).is_err());
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(parse_command("{1, 2, 3} x", 5).is_err());
    }

    #[test]
    fn test_huge_number_is_error() {
        assert!(parse_command("{99999999999999999999999, 1, 1}", 5).is_err());
    }
}
