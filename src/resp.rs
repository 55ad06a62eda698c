//! RESP2 framing: command encoding, reply decoding, typed conversions.
//!
//! Commands go out as arrays of bulk strings; replies come back as one of
//! the five RESP2 kinds. No command in this crate's surface produces a
//! nested array reply, so the decoder rejects nesting instead of
//! recursing.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::KvMiddlewareError;

/// One decoded store reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+OK` style simple strings.
    Simple(String),
    /// `-ERR ...` error replies.
    Error(String),
    /// `:123` integers.
    Integer(i64),
    /// `$...` bulk strings; `None` is the nil bulk.
    Bulk(Option<Vec<u8>>),
    /// `*...` arrays; `None` is the nil array.
    Array(Option<Vec<Reply>>),
}

impl Reply {
    fn kind(&self) -> &'static str {
        match self {
            Reply::Simple(_) => "simple string",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(_) => "bulk string",
            Reply::Array(_) => "array",
        }
    }

    fn unexpected(self, wanted: &str) -> KvMiddlewareError {
        KvMiddlewareError::ProtocolError(format!(
            "expected {wanted} reply, got {}",
            self.kind()
        ))
    }

    /// Convert an integer reply.
    ///
    /// # Errors
    /// `StoreError` for error replies, `ProtocolError` otherwise.
    pub fn into_i64(self) -> Result<i64, KvMiddlewareError> {
        match self {
            Reply::Integer(value) => Ok(value),
            Reply::Error(message) => Err(KvMiddlewareError::StoreError(message)),
            other => Err(other.unexpected("integer")),
        }
    }

    /// Convert a 0/1 integer reply into a boolean.
    ///
    /// # Errors
    /// `StoreError` for error replies, `ProtocolError` otherwise.
    pub fn into_bool(self) -> Result<bool, KvMiddlewareError> {
        match self.into_i64()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(KvMiddlewareError::ProtocolError(format!(
                "expected 0 or 1, got {other}"
            ))),
        }
    }

    /// Convert a simple or bulk string reply.
    ///
    /// # Errors
    /// `NilReply` for the nil bulk, `StoreError` for error replies,
    /// `ProtocolError` otherwise.
    pub fn into_string(self) -> Result<String, KvMiddlewareError> {
        match self {
            Reply::Simple(text) => Ok(text),
            Reply::Bulk(Some(data)) => utf8(data),
            Reply::Bulk(None) => Err(KvMiddlewareError::NilReply),
            Reply::Error(message) => Err(KvMiddlewareError::StoreError(message)),
            other => Err(other.unexpected("string")),
        }
    }

    /// Convert an array of bulk strings. Nil elements decode as empty
    /// strings (multi-key reads report missing keys that way); a nil array
    /// decodes as an empty vector.
    ///
    /// # Errors
    /// `StoreError` for error replies, `ProtocolError` otherwise.
    pub fn into_strings(self) -> Result<Vec<String>, KvMiddlewareError> {
        match self {
            Reply::Array(None) => Ok(Vec::new()),
            Reply::Array(Some(items)) => items
                .into_iter()
                .map(|item| match item {
                    Reply::Bulk(Some(data)) => utf8(data),
                    Reply::Bulk(None) => Ok(String::new()),
                    Reply::Simple(text) => Ok(text),
                    other => Err(other.unexpected("bulk string element")),
                })
                .collect(),
            Reply::Error(message) => Err(KvMiddlewareError::StoreError(message)),
            other => Err(other.unexpected("array")),
        }
    }
}

fn utf8(data: Vec<u8>) -> Result<String, KvMiddlewareError> {
    String::from_utf8(data)
        .map_err(|_| KvMiddlewareError::ProtocolError("non-utf8 bulk string".to_string()))
}

/// Encode one command as a RESP2 array of bulk strings into `out`.
pub(crate) fn encode_command(command: &str, args: &[&str], out: &mut Vec<u8>) {
    out.push(b'*');
    out.extend_from_slice((args.len() + 1).to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
    encode_bulk(command, out);
    for arg in args {
        encode_bulk(arg, out);
    }
}

fn encode_bulk(arg: &str, out: &mut Vec<u8>) {
    out.push(b'$');
    out.extend_from_slice(arg.len().to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(arg.as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Read one reply. `line` is a caller-owned scratch buffer reused across
/// calls to keep per-reply allocation down.
///
/// # Errors
/// IO errors pass through; malformed framing and nested arrays surface as
/// `ProtocolError`.
pub(crate) async fn read_reply<R>(
    reader: &mut R,
    line: &mut Vec<u8>,
) -> Result<Reply, KvMiddlewareError>
where
    R: AsyncBufRead + Unpin,
{
    read_line(reader, line).await?;
    if line.first() == Some(&b'*') {
        let len = parse_i64(&line[1..])?;
        if len < 0 {
            return Ok(Reply::Array(None));
        }
        let mut items = Vec::with_capacity(len as usize);
        for _ in 0..len {
            read_line(reader, line).await?;
            items.push(read_scalar(reader, line).await?);
        }
        return Ok(Reply::Array(Some(items)));
    }
    read_scalar(reader, line).await
}

/// Decode the scalar whose header line is already in `line`, reading the
/// bulk payload from `reader` when needed.
async fn read_scalar<R>(reader: &mut R, line: &mut Vec<u8>) -> Result<Reply, KvMiddlewareError>
where
    R: AsyncBufRead + Unpin,
{
    let Some((&marker, rest)) = line.split_first() else {
        return Err(KvMiddlewareError::ProtocolError("empty reply line".to_string()));
    };
    match marker {
        b'+' => Ok(Reply::Simple(utf8(rest.to_vec())?)),
        b'-' => Ok(Reply::Error(utf8(rest.to_vec())?)),
        b':' => Ok(Reply::Integer(parse_i64(rest)?)),
        b'$' => {
            let len = parse_i64(rest)?;
            if len < 0 {
                return Ok(Reply::Bulk(None));
            }
            let mut data = vec![0u8; len as usize];
            reader.read_exact(&mut data).await?;
            let mut crlf = [0u8; 2];
            reader.read_exact(&mut crlf).await?;
            if crlf != *b"\r\n" {
                return Err(KvMiddlewareError::ProtocolError(
                    "bulk string missing terminator".to_string(),
                ));
            }
            Ok(Reply::Bulk(Some(data)))
        }
        b'*' => Err(KvMiddlewareError::ProtocolError(
            "nested array reply is not supported".to_string(),
        )),
        other => Err(KvMiddlewareError::ProtocolError(format!(
            "unknown reply marker {:?}",
            other as char
        ))),
    }
}

async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<(), KvMiddlewareError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let bytes = reader.read_until(b'\n', buf).await?;
    if bytes == 0 {
        return Err(KvMiddlewareError::ConnectionError(
            "store closed the connection".to_string(),
        ));
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(KvMiddlewareError::ProtocolError(
            "reply line missing terminator".to_string(),
        ));
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_i64(data: &[u8]) -> Result<i64, KvMiddlewareError> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| KvMiddlewareError::ProtocolError("malformed integer".to_string()))
}
