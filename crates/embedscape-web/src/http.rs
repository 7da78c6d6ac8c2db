//! Just enough HTTP/1.1 for a local GET-only API: one request per connection,
//! `Connection: close` on every response.

use anyhow::Context;
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{self, BufRead, BufReader, Read, Write};

const MAX_LINE_BYTES: u64 = 8 * 1024;
const MAX_HEADER_LINES: usize = 100;
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Malformed requests get a 400; anything the socket did gets a 500.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RequestError {
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("read request: {0}")]
    Io(#[from] io::Error),
}

fn malformed(msg: impl Display) -> RequestError {
    RequestError::Malformed(msg.to_string())
}

#[derive(Debug)]
pub(crate) struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: HashMap<String, String>,
}

#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) status: u16,
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
}

impl Response {
    pub(crate) fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub(crate) fn json<T: serde::Serialize>(status: u16, value: &T) -> anyhow::Result<Self> {
        let body = serde_json::to_vec(value).context("serialize response")?;
        Ok(Self::new(status, "application/json", body))
    }
}

/// Reads the request line and headers. A body, if announced, is drained and
/// dropped since no route accepts one.
pub(crate) fn read_request<R: Read>(stream: &mut R) -> Result<Request, RequestError> {
    let mut reader = BufReader::new(stream);

    let request_line =
        next_line(&mut reader)?.ok_or_else(|| malformed("connection closed before request line"))?;
    let (method, target) = match request_line.split_whitespace().collect::<Vec<_>>()[..] {
        [method, target, version] if version.starts_with("HTTP/") => {
            (method.to_string(), target)
        }
        _ => return Err(malformed(format!("bad request line {request_line:?}"))),
    };
    let (path, query) = split_target(target);

    let mut body_len: u64 = 0;
    for _ in 0..MAX_HEADER_LINES {
        let line =
            next_line(&mut reader)?.ok_or_else(|| malformed("connection closed inside headers"))?;
        if line.is_empty() {
            if body_len > 0 {
                let drained = io::copy(&mut reader.by_ref().take(body_len), &mut io::sink())?;
                if drained != body_len {
                    return Err(malformed("request body shorter than content-length"));
                }
            }
            return Ok(Request {
                method,
                path,
                query,
            });
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                body_len = value
                    .trim()
                    .parse()
                    .map_err(|_| malformed(format!("invalid content-length {:?}", value.trim())))?;
                if body_len > MAX_BODY_BYTES {
                    return Err(malformed("request body too large"));
                }
            }
        }
    }
    Err(malformed("too many header lines"))
}

/// One CRLF- or LF-terminated line without its terminator. `None` on EOF.
fn next_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, RequestError> {
    let mut raw = Vec::new();
    let n = reader
        .by_ref()
        .take(MAX_LINE_BYTES)
        .read_until(b'\n', &mut raw)?;
    if n == 0 {
        return Ok(None);
    }
    if !raw.ends_with(b"\n") {
        return Err(malformed("request line too long or truncated"));
    }
    raw.pop();
    if raw.ends_with(b"\r") {
        raw.pop();
    }
    String::from_utf8(raw)
        .map(Some)
        .map_err(|_| malformed("request is not utf-8"))
}

pub(crate) fn write_response<W: Write>(stream: &mut W, resp: &Response) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: {ctype}\r\n\
         Content-Length: {len}\r\n\
         Cache-Control: no-store\r\n\
         Connection: close\r\n\r\n",
        status = resp.status,
        reason = reason_phrase(resp.status),
        ctype = resp.content_type,
        len = resp.body.len(),
    )?;
    stream.write_all(&resp.body)?;
    stream.flush()
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

/// Splits `/path?a=1&b=2`. Undecodable pairs are skipped; repeated keys keep
/// the last value.
fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
    let query = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            Some((form_decode(k)?, form_decode(v)?))
        })
        .collect();
    (path.to_string(), query)
}

/// `application/x-www-form-urlencoded` decoding: `+` is a space, `%XX` a byte.
fn form_decode(s: &str) -> Option<String> {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        out.push(match b {
            b'+' => b' ',
            b'%' => {
                let hi = hex_digit(bytes.next()?)?;
                let lo = hex_digit(bytes.next()?)?;
                (hi << 4) | lo
            }
            other => other,
        });
    }
    String::from_utf8(out).ok()
}

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
