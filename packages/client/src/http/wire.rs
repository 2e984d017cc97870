//! HTTP/1.1 wire encoding
//!
//! Requests are serialized into one buffer and written with a single
//! `write_all`; request bodies from readers go out in `chunk_size` pieces
//! with chunked transfer encoding. Response heads are parsed line by line
//! from the connection's buffered reader.

use std::io::{self, BufRead, Read, Write};

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode, Version};

use super::body::Framing;

const MAX_HEAD_LINE: u64 = 64 * 1024;
const MAX_HEADERS: usize = 128;

/// Serialize the request line and headers
///
/// `Host` is derived from the target origin and always written first; a
/// caller-supplied `Host` is ignored.
pub(crate) fn write_head<W: Write>(
    w: &mut W,
    method: &Method,
    target: &str,
    host: &str,
    headers: &HeaderMap,
) -> io::Result<()> {
    let mut buf = Vec::with_capacity(256);
    buf.extend_from_slice(method.as_str().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(target.as_bytes());
    buf.extend_from_slice(b" HTTP/1.1\r\nHost: ");
    buf.extend_from_slice(host.as_bytes());
    buf.extend_from_slice(b"\r\n");
    for (name, value) in headers {
        if name == header::HOST {
            continue;
        }
        buf.extend_from_slice(name.as_str().as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf.extend_from_slice(b"\r\n");
    w.write_all(&buf)
}

/// Stream `reader` as a chunked body, `chunk_size` bytes at a time
pub(crate) fn write_chunked<W: Write, R: Read + ?Sized>(
    w: &mut W,
    reader: &mut R,
    chunk_size: usize,
) -> io::Result<u64> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        write!(w, "{n:x}\r\n")?;
        w.write_all(&buf[..n])?;
        w.write_all(b"\r\n")?;
        total += n as u64;
    }
    w.write_all(b"0\r\n\r\n")?;
    Ok(total)
}

/// Parsed status line and headers of a response
#[derive(Debug, Clone)]
pub(crate) struct ResponseHead {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Whether the server allows another request on this connection
    pub(crate) fn keep_alive(&self) -> bool {
        let connection = self
            .headers
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .collect::<Vec<_>>();
        let has = |token: &str| connection.iter().any(|t| t.eq_ignore_ascii_case(token));

        match self.version {
            Version::HTTP_10 => has("keep-alive"),
            _ => !has("close"),
        }
    }

    /// Determine how the body following this head is delimited
    pub(crate) fn framing(&self, method: &Method) -> io::Result<Framing> {
        if *method == Method::HEAD
            || self.status.is_informational()
            || self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::NOT_MODIFIED
        {
            return Ok(Framing::Empty);
        }

        let chunked = self
            .headers
            .get_all(header::TRANSFER_ENCODING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .last()
            .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        if chunked {
            return Ok(Framing::Chunked);
        }

        match self.headers.get(header::CONTENT_LENGTH) {
            Some(value) => {
                let len = value
                    .to_str()
                    .ok()
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidData, "invalid Content-Length header")
                    })?;
                Ok(if len == 0 { Framing::Empty } else { Framing::Length(len) })
            }
            None => Ok(Framing::Close),
        }
    }
}

fn read_head_line<R: BufRead>(r: &mut R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let n = r.by_ref().take(MAX_HEAD_LINE).read_until(b'\n', &mut line)?;
    if n == 0 {
        return Ok(None);
    }
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    String::from_utf8(line)
        .map(Some)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "response head is not valid UTF-8"))
}

fn parse_status_line(line: &str) -> io::Result<(Version, StatusCode)> {
    let bad = || io::Error::new(io::ErrorKind::InvalidData, format!("malformed status line {line:?}"));
    let mut parts = line.splitn(3, ' ');
    let version = match parts.next() {
        Some("HTTP/1.1") => Version::HTTP_11,
        Some("HTTP/1.0") => Version::HTTP_10,
        _ => return Err(bad()),
    };
    let status = parts
        .next()
        .and_then(|code| StatusCode::from_bytes(code.as_bytes()).ok())
        .ok_or_else(bad)?;
    Ok((version, status))
}

fn parse_headers<R: BufRead>(r: &mut R) -> io::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    loop {
        let line = read_head_line(r)?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed inside response head")
        })?;
        if line.is_empty() {
            return Ok(headers);
        }
        if headers.len() >= MAX_HEADERS {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "too many response headers"));
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed header line {line:?}"),
            ));
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        headers.append(name, value);
    }
}

/// Read the next final response head, skipping interim `100 Continue` heads
///
/// A connection that closes before any status line arrives is reported as
/// `ConnectionReset`: the server dropped a kept-alive connection and the
/// request can be retried on a fresh one.
pub(crate) fn read_head<R: BufRead>(r: &mut R) -> io::Result<ResponseHead> {
    loop {
        let line = match read_head_line(r)? {
            Some(line) if !line.is_empty() => line,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "server closed the connection without sending a status line",
                ));
            }
        };
        let (version, status) = parse_status_line(&line)?;
        let headers = parse_headers(r)?;
        if status == StatusCode::CONTINUE {
            continue;
        }
        return Ok(ResponseHead {
            status,
            version,
            headers,
        });
    }
}
