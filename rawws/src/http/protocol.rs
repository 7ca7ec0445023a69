use super::{header::HeaderMap, request::HttpRequest, HttpResponse, Method};
use crate::{
    consts::{
        headers::CONTENT_LEN, CHUNK_END, HTTP_1_PREFIX, HTTP_VER_STR, MAX_BODY_SIZE, MAX_HEADER_SIZE,
    },
    Error,
};
use std::io::{ErrorKind, Read, Write};

/// Reads one HTTP/1.x request from the stream.
///
/// The header block is consumed byte by byte so nothing past the blank line
/// is pulled off the stream. After an upgrade the next byte read belongs to
/// the first websocket frame.
pub(crate) fn parse_request(stream: &mut impl Read) -> Result<HttpRequest, Error> {
    let header_chunk = read_header(stream)?;
    let header_chunk = String::from_utf8(header_chunk).map_err(|_| Error::InvalidHeader)?;
    let mut lines = header_chunk.split("\r\n");

    let Some(first) = lines.next().filter(|line| !line.is_empty()) else {
        return Err(Error::Empty);
    };
    let mut first_line = first.splitn(3, ' ');

    let method = first_line.next().unwrap_or("");
    let method = Method::parse(method).ok_or_else(|| Error::InvalidMethod {
        recieved: method.to_owned(),
    })?;

    let uri = first_line
        .next()
        .filter(|uri| !uri.is_empty())
        .ok_or(Error::NoUri)?
        .to_owned();

    let http_ver = first_line.next().ok_or(Error::UnsupportedVersion)?;
    if !http_ver.starts_with(HTTP_1_PREFIX) {
        return Err(Error::UnsupportedVersion);
    }

    let mut headers = HeaderMap::empty();
    for header_line in lines {
        let (key, value) = header_line.split_once(':').ok_or(Error::InvalidHeader)?;
        headers.values.push((key.trim().to_owned(), value.trim().to_owned()));
    }

    let body = match headers.content_length() {
        Some(content_len) => Some(read_body(stream, content_len)?),
        None => None,
    };

    Ok(HttpRequest {
        method,
        uri,
        headers,
        body,
    })
}

fn read_header(stream: &mut impl Read) -> Result<Vec<u8>, Error> {
    let mut total: Vec<u8> = Vec::with_capacity(128);

    loop {
        let mut latest = [0];
        let got = match stream.read(&mut latest) {
            Ok(got) => got,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if got == 0 {
            return Err(match total.is_empty() {
                true => Error::Empty,
                false => Error::InvalidHeader,
            });
        }
        total.push(latest[0]);

        if total.ends_with(CHUNK_END) {
            total.truncate(total.len() - CHUNK_END.len());
            return Ok(total);
        }

        if total.len() > MAX_HEADER_SIZE {
            return Err(Error::HeaderTooLarge);
        }
    }
}

/// The declared size is checked before anything is read or allocated
fn read_body(stream: &mut impl Read, size: usize) -> Result<Vec<u8>, Error> {
    if size > MAX_BODY_SIZE {
        return Err(Error::BodyTooLarge { declared: size });
    }

    let mut buf = Vec::new();
    stream.take(size as u64).read_to_end(&mut buf)?;

    if buf.len() < size {
        return Err(Error::BodyTooShort {
            expt: size,
            got: buf.len(),
        });
    }

    Ok(buf)
}

pub(crate) fn write_response(
    mut stream: impl Write,
    mut response: HttpResponse,
) -> Result<(), Error> {
    let body = response.body.take().unwrap_or_default();
    response.headers.insert(CONTENT_LEN, body.len().to_string());

    let mut out = format!("{} {}\r\n", HTTP_VER_STR, response.status).into_bytes();
    for (key, value) in &response.headers.values {
        out.extend_from_slice(format!("{key}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(&body);

    stream.write_all(&out)?;
    stream.flush()?;

    Ok(())
}
