//! Framing-aware response body decoding

use std::io::{self, BufRead, Read};

use bytes::Bytes;

/// How the end of a response body is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No body: HEAD, 1xx, 204, 304 or `Content-Length: 0`
    Empty,
    Length(u64),
    Chunked,
    /// Body runs until the server closes the connection
    Close,
}

/// Largest chunk accepted from the wire
const MAX_CHUNK_SIZE: u64 = 64 * 1024 * 1024;
const MAX_LINE: u64 = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Length(u64),
    /// Bytes left in the current chunk; 0 means positioned before a size line
    Chunk(u64),
    Close,
    Done,
}

/// Decoder state for one response body
#[derive(Debug)]
pub(crate) struct BodyReader {
    state: State,
}

fn unexpected_eof() -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed before end of response body",
    )
}

fn read_line<R: BufRead>(src: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    let n = src.by_ref().take(MAX_LINE).read_until(b'\n', &mut line)?;
    if n == 0 {
        return Ok(None);
    }
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    Ok(Some(line))
}

fn read_chunk_size<R: BufRead>(src: &mut R) -> io::Result<u64> {
    let line = read_line(src)?.ok_or_else(unexpected_eof)?;
    let line = String::from_utf8_lossy(&line);
    let hex = line.split(';').next().unwrap_or_default().trim();
    let size = u64::from_str_radix(hex, 16).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidData, format!("invalid chunk size line {line:?}"))
    })?;
    if size > MAX_CHUNK_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("chunk of {size} bytes exceeds limit"),
        ));
    }
    Ok(size)
}

fn expect_crlf<R: BufRead>(src: &mut R) -> io::Result<()> {
    match read_line(src)? {
        Some(line) if line.is_empty() => Ok(()),
        Some(_) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "missing CRLF after chunk data",
        )),
        None => Err(unexpected_eof()),
    }
}

/// Consume optional trailer fields and the final empty line
fn read_trailers<R: BufRead>(src: &mut R) -> io::Result<()> {
    while let Some(line) = read_line(src)? {
        if line.is_empty() {
            break;
        }
    }
    Ok(())
}

impl BodyReader {
    pub(crate) fn new(framing: Framing) -> Self {
        let state = match framing {
            Framing::Empty | Framing::Length(0) => State::Done,
            Framing::Length(n) => State::Length(n),
            Framing::Chunked => State::Chunk(0),
            Framing::Close => State::Close,
        };
        Self { state }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Read decoded body bytes; `Ok(0)` once the body is complete
    pub(crate) fn read<R: BufRead>(&mut self, src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.state {
                State::Done => return Ok(0),
                State::Length(remaining) => {
                    let max = usize::try_from(remaining).unwrap_or(usize::MAX).min(buf.len());
                    let n = src.read(&mut buf[..max])?;
                    if n == 0 {
                        return Err(unexpected_eof());
                    }
                    let remaining = remaining - n as u64;
                    self.state = if remaining == 0 {
                        State::Done
                    } else {
                        State::Length(remaining)
                    };
                    return Ok(n);
                }
                State::Close => {
                    let n = src.read(buf)?;
                    if n == 0 {
                        self.state = State::Done;
                    }
                    return Ok(n);
                }
                State::Chunk(0) => {
                    let size = read_chunk_size(src)?;
                    if size == 0 {
                        read_trailers(src)?;
                        self.state = State::Done;
                        return Ok(0);
                    }
                    self.state = State::Chunk(size);
                }
                State::Chunk(remaining) => {
                    let max = usize::try_from(remaining).unwrap_or(usize::MAX).min(buf.len());
                    let n = src.read(&mut buf[..max])?;
                    if n == 0 {
                        return Err(unexpected_eof());
                    }
                    let remaining = remaining - n as u64;
                    if remaining == 0 {
                        expect_crlf(src)?;
                    }
                    self.state = State::Chunk(remaining);
                    return Ok(n);
                }
            }
        }
    }

    /// Read the next whole chunk of a chunked body; `None` after the last chunk
    pub(crate) fn next_chunk<R: BufRead>(&mut self, src: &mut R) -> io::Result<Option<Bytes>> {
        let size = match self.state {
            State::Done => return Ok(None),
            State::Chunk(0) => {
                let size = read_chunk_size(src)?;
                if size == 0 {
                    read_trailers(src)?;
                    self.state = State::Done;
                    return Ok(None);
                }
                size
            }
            State::Chunk(remaining) => remaining,
            State::Length(_) | State::Close => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "response body does not use chunked transfer encoding",
                ));
            }
        };

        let len = usize::try_from(size)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "chunk too large"))?;
        let mut data = vec![0; len];
        src.read_exact(&mut data).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => unexpected_eof(),
            _ => err,
        })?;
        expect_crlf(src)?;
        self.state = State::Chunk(0);
        Ok(Some(Bytes::from(data)))
    }

    /// Read and discard the rest of the body
    pub(crate) fn drain<R: BufRead>(&mut self, src: &mut R) -> io::Result<u64> {
        let mut scratch = [0u8; 8 * 1024];
        let mut total = 0u64;
        loop {
            let n = self.read(src, &mut scratch)?;
            if n == 0 {
                return Ok(total);
            }
            total += n as u64;
        }
    }

    /// Read the whole remaining body into memory
    pub(crate) fn read_to_end<R: BufRead>(&mut self, src: &mut R, out: &mut Vec<u8>) -> io::Result<()> {
        let mut scratch = [0u8; 8 * 1024];
        loop {
            let n = self.read(src, &mut scratch)?;
            if n == 0 {
                return Ok(());
            }
            out.extend_from_slice(&scratch[..n]);
        }
    }
}
