//! Text codec for a single proposal per connection.
//!
//! A record is `id,value,origin`, e.g. `1,x,host3`. The value is exactly one
//! character, so `1,,,host3` is a proposal whose value is a comma.

use thiserror::Error;

use ballot_common::{NodeId, Proposal};

const DELIMITER: char = ',';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid proposal id '{0}'")]
    InvalidId(String),

    #[error("proposal id 0 is reserved")]
    ZeroId,

    #[error("expected ',' after the value")]
    MissingDelimiter,

    #[error("invalid origin '{0}'")]
    InvalidOrigin(String),
}

pub fn encode(proposal: &Proposal) -> Vec<u8> {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}",
        proposal.id, proposal.value, proposal.origin
    )
    .into_bytes()
}

pub fn decode(bytes: &[u8]) -> Result<Proposal, CodecError> {
    let text = std::str::from_utf8(bytes).map_err(|_| CodecError::NotUtf8)?;
    let text = text.trim_end();

    let (id_part, rest) = text
        .split_once(DELIMITER)
        .ok_or(CodecError::MissingField("value"))?;
    let id = parse_id(id_part)?;

    let mut chars = rest.chars();
    let value = chars.next().ok_or(CodecError::MissingField("value"))?;
    match chars.next() {
        Some(DELIMITER) => {}
        Some(_) => return Err(CodecError::MissingDelimiter),
        None => return Err(CodecError::MissingField("origin")),
    }

    let origin = chars.as_str();
    if origin.is_empty() {
        return Err(CodecError::MissingField("origin"));
    }
    if origin.chars().any(char::is_whitespace) {
        return Err(CodecError::InvalidOrigin(origin.to_string()));
    }

    Ok(Proposal {
        id,
        value,
        origin: NodeId::from(origin),
    })
}

// Canonical decimal only, so that a decoded record re-encodes byte for byte.
fn parse_id(raw: &str) -> Result<u64, CodecError> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && !(raw.len() > 1 && raw.starts_with('0'));
    if !canonical {
        return Err(CodecError::InvalidId(raw.to_string()));
    }

    match raw.parse::<u64>() {
        Ok(0) => Err(CodecError::ZeroId),
        Ok(id) => Ok(id),
        Err(_) => Err(CodecError::InvalidId(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let p = Proposal::new(12, 'x', "host1");
        assert_eq!(encode(&p), b"12,x,host1".to_vec());
    }

    #[test]
    fn test_decode_then_encode_is_identity() {
        for raw in ["1,x,host1", "42,é,node-b", "7,,,peer", "18446744073709551615,0,a.b.c"] {
            let p = decode(raw.as_bytes()).unwrap();
            assert_eq!(encode(&p), raw.as_bytes(), "record {raw}");
        }
    }

    #[test]
    fn test_encode_then_decode_is_identity() {
        let p = Proposal::new(5, '語', "acceptor-host");
        assert_eq!(decode(&encode(&p)).unwrap(), p);

        let comma = Proposal::new(9, ',', "h");
        assert_eq!(decode(&encode(&comma)).unwrap(), comma);
    }

    #[test]
    fn test_decode_tolerates_trailing_newline() {
        let p = decode(b"3,z,host2\n").unwrap();
        assert_eq!(p, Proposal::new(3, 'z', "host2"));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(decode(b""), Err(CodecError::MissingField("value")));
        assert_eq!(decode(b"1"), Err(CodecError::MissingField("value")));
        assert_eq!(decode(b"1,"), Err(CodecError::MissingField("value")));
        assert_eq!(decode(b"1,x"), Err(CodecError::MissingField("origin")));
        assert_eq!(decode(b"1,x,"), Err(CodecError::MissingField("origin")));
        assert_eq!(decode(b"1,xy,host"), Err(CodecError::MissingDelimiter));
        assert_eq!(decode(b"abc,x,host"), Err(CodecError::InvalidId("abc".into())));
        assert_eq!(decode(b"-1,x,host"), Err(CodecError::InvalidId("-1".into())));
        assert_eq!(decode(b"01,x,host"), Err(CodecError::InvalidId("01".into())));
        assert_eq!(decode(b"1,x,two words"), Err(CodecError::InvalidOrigin("two words".into())));
        assert_eq!(decode(&[0xff, 0xfe]), Err(CodecError::NotUtf8));
    }

    #[test]
    fn test_decode_rejects_zero_id() {
        assert_eq!(decode(b"0,x,host"), Err(CodecError::ZeroId));
    }
}
