// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The HTTP/1.x front end: pumps transport bytes through the bounded input
//! buffer and the incremental scanners, hands complete requests to the
//! application handlers, and answers malformed input with the canonical
//! `400 Bad Request` before forcing the connection closed.

pub mod buffer;
pub mod scan;

pub use buffer::InputBuffer;
pub use scan::{RequestParser, ScanStep};

use tokio::{
    io::{split, AsyncReadExt, AsyncWriteExt, BufWriter},
    net::{TcpListener, TcpStream},
    task,
    time::timeout,
};

use std::{
    fmt::Write,
    io,
    sync::Arc,
};

use gheppio_http::{
    BodyKind,
    Error,
    Request,
    Response,
};

use gheppio_http_handling::{
    finish_response_normal,
    handle_parse_error,
    responses,
    ServerLimits,
    ServerSettings,
};

#[derive(Debug)]
pub enum ExchangeError {
    MalformedData,
    TimedOut,
    Io(io::Error),
}

impl From<io::Error> for ExchangeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Read one request from the transport.
///
/// The pump: scan as far as the buffered bytes allow, then read more from
/// the socket and append. The scanners suspend with `NeedMoreData` instead
/// of blocking, so this never holds a worker hostage on a partial line; the
/// buffer's capacity check turns a flood of unterminated bytes into
/// [`HttpParseError::BufferOverflow`] instead of unbounded growth.
async fn read_request<R>(reader: &mut R, limits: &ServerLimits) -> Result<Request, Error>
        where R: AsyncReadExt + Unpin {
    let mut buffer = InputBuffer::with_limit(limits.max_request_buffer_size());
    let mut parser = RequestParser::new(limits);
    let mut chunk = [0u8; 4096];

    loop {
        match parser.advance(&mut buffer) {
            ScanStep::Done(request) => return Ok(request),
            ScanStep::Failed(error) => return Err(Error::ParseError(error)),
            ScanStep::NeedMoreData => {}
        }

        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            return match parser.close_error() {
                Some(error) => Err(Error::ParseError(error)),
                None => Err(Error::Other(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before a request arrived",
                ))),
            };
        }

        buffer.append(&chunk[..read]).map_err(Error::ParseError)?;
    }
}

/// Reads a single request, handles it and sends the response back to the
/// client. Any parse failure is answered with the uniform 400 and reported
/// as [`ExchangeError::MalformedData`] so the caller tears the connection
/// down; nothing further is read or parsed on it, buffered or not.
pub async fn handle_exchange<R, W>(reader: &mut R, writer: &mut W, settings: &ServerSettings) -> Result<(), ExchangeError>
        where R: AsyncReadExt + Unpin,
              W: AsyncWriteExt + Unpin {
    let request = match timeout(settings.read_headers_timeout, read_request(reader, &settings.limits)).await {
        Ok(request) => request,
        Err(_) => {
            _ = send_response(writer, responses::create_request_timeout()).await;
            return Err(ExchangeError::TimedOut);
        }
    };

    let request = match request {
        Ok(request) => request,
        Err(Error::ParseError(error)) => {
            let response = handle_parse_error(error);
            send_response(writer, response).await?;
            return Err(ExchangeError::MalformedData);
        }
        Err(Error::Other(error)) => {
            return Err(error.into());
        }
    };

    let mut response = settings.handler_controller.handle(&request).await;
    finish_response_normal(&mut response);

    #[cfg(feature = "debugging")]
    println!("{:?}>: {:?} => {}", request.method, request.target, response.status);

    send_response(writer, response).await?;
    Ok(())
}

/// Send the response to the client.
async fn send_response<W>(stream: &mut W, response: Response) -> Result<(), io::Error>
        where W: AsyncWriteExt + Unpin {
    let mut response_text = String::with_capacity(256);
    response_text.push_str("HTTP/1.1 ");
    _ = write!(response_text, "{}", response.status);
    response_text.push_str("\r\n");

    for (name, value) in response.headers.iter() {
        response_text.push_str(name.as_str());
        response_text.push_str(": ");
        value.append_to_message(&mut response_text);
        response_text.push_str("\r\n");
    }

    response_text.push_str("\r\n");

    stream.write_all(response_text.as_bytes()).await?;

    if let Some(body) = response.body {
        match body {
            BodyKind::Bytes(bytes) => stream.write_all(&bytes).await?,
            BodyKind::StaticString(string) => stream.write_all(string.as_bytes()).await?,
            BodyKind::String(string) => stream.write_all(string.as_bytes()).await?,
        }
    }

    stream.flush().await?;
    Ok(())
}

/// Process a single socket connection: one exchange, then close. The write
/// half is shut down whether the exchange succeeded, timed out, or went
/// through the malformed-request path.
async fn process_socket(stream: TcpStream, settings: Arc<ServerSettings>) {
    let (reader, writer) = split(stream);
    let mut reader = reader;
    let mut writer = BufWriter::new(writer);

    if let Err(e) = handle_exchange(&mut reader, &mut writer, &settings).await {
        #[cfg(feature = "debugging")]
        println!("Client Error: {:?}", e);

        #[cfg(not(feature = "debugging"))]
        { _ = e }
    }

    _ = writer.shutdown().await;
}

/// Start the HTTPv1 server on the given address.
///
/// The limits are validated here, once, before the listener binds: an
/// unsatisfiable configuration must refuse to start instead of failing
/// every request it would ever see.
pub async fn start(address: &str, settings: ServerSettings) -> io::Result<()> {
    settings.limits.validate()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let listener = TcpListener::bind(address).await?;
    println!("Started listening on {}", address);

    let settings = Arc::new(settings);

    loop {
        let (stream, _) = match listener.accept().await {
            Ok((stream, addr)) => (stream, addr),
            Err(e) => {
                #[cfg(unix)]
                if let Some(os_error) = e.raw_os_error() {
                    if os_error == gheppio_common::platform::unix::ERRNO_EMFILE {
                        task::yield_now().await;
                        continue;
                    }
                }

                println!("[FATAL] Error accepting connection: {}", e);
                continue;
            }
        };
        let settings = Arc::clone(&settings);
        task::spawn(async move {
            process_socket(stream, settings).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use gheppio_http_handling::HandlerController;

    fn settings() -> ServerSettings {
        ServerSettings {
            handler_controller: HandlerController::new(),
            limits: ServerLimits::default(),
            read_headers_timeout: Duration::from_secs(5),
        }
    }

    async fn exchange(input: &[u8]) -> (Result<(), ExchangeError>, Vec<u8>) {
        let mut reader = std::io::Cursor::new(input.to_vec());
        let mut writer = Vec::new();
        let settings = settings();
        let result = handle_exchange(&mut reader, &mut writer, &settings).await;
        (result, writer)
    }

    fn response_head(written: &[u8]) -> String {
        String::from_utf8_lossy(written).to_string()
    }

    #[tokio::test]
    async fn test_exchange_answers_unrouted_target_with_404() {
        let (result, written) = exchange(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").await;
        assert!(result.is_ok());

        let head = response_head(&written);
        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"), "response: {head}");
        assert!(head.contains("\r\nServer: gheppio\r\n"), "response: {head}");
        assert!(head.contains("\r\nConnection: close\r\n"), "response: {head}");
    }

    #[tokio::test]
    async fn test_exchange_answers_malformed_input_with_the_fixed_400() {
        let (result, written) = exchange(b"GET / HTTP/1.2\r\n\r\n").await;
        assert!(matches!(result, Err(ExchangeError::MalformedData)));

        let head = response_head(&written);
        assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\nConnection: close\r\nDate: "), "response: {head}");
        assert!(head.ends_with("\r\nContent-Length: 0\r\n\r\n"), "response: {head}");
        // No Server header and no body on the canonical rejection.
        assert!(!head.contains("Server:"), "response: {head}");
    }

    #[tokio::test]
    async fn test_exchange_stops_reading_after_a_malformed_request() {
        // The second, well-formed request behind the malformed one must
        // never be parsed or answered.
        let (result, written) =
            exchange(b"BAD(REQUEST / HTTP/1.1\r\n\r\nGET / HTTP/1.1\r\nHost: x\r\n\r\n").await;
        assert!(matches!(result, Err(ExchangeError::MalformedData)));

        let head = response_head(&written);
        assert_eq!(head.matches("HTTP/1.1").count(), 1, "response: {head}");
        assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\n"), "response: {head}");
    }

    #[tokio::test]
    async fn test_exchange_reports_incomplete_headers_at_eof() {
        let (result, written) = exchange(b"GET / HTTP/1.1\r\nHost: x\r\n").await;
        assert!(matches!(result, Err(ExchangeError::MalformedData)));
        assert!(response_head(&written).starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn test_exchange_is_quiet_on_immediate_close() {
        let (result, written) = exchange(b"").await;
        assert!(matches!(result, Err(ExchangeError::Io(_))));
        assert!(written.is_empty(), "nothing should be written on a clean early close");
    }
}
