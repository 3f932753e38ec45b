//! Authenticated HTTP transport for the Dropbox RPC and content hosts

use crate::{Config, Credential};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::{header, Body, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// JSON argument of content-host routes
pub const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// JSON metadata returned alongside downloaded content
pub const API_RESULT_HEADER: &str = "Dropbox-API-Result";

/// Failures before translation into [`ClientError`](crate::ClientError)
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request could not be assembled
    #[error("failed to build request: {0}")]
    Build(String),

    /// Connection or request transmission failed
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body stream failed mid-way
    #[error("response body failed: {0}")]
    Body(#[source] reqwest::Error),

    /// Response body shorter than advertised
    #[error("response ended early: expected {expected} bytes, received {received}")]
    Truncated { expected: u64, received: u64 },

    /// Response body or result header was not the expected JSON
    #[error("malformed response: {0}")]
    Decode(String),

    /// The upload source failed while being streamed
    #[error("reading upload source failed: {0}")]
    LocalRead(std::io::Error),
}

impl TransportError {
    /// Classify a `send` failure, separating local upload-source read
    /// errors from genuine connection failures.
    fn from_send(err: reqwest::Error) -> Self {
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            if let Some(local) = cause.downcast_ref::<LocalReadError>() {
                return Self::LocalRead(std::io::Error::new(local.0.kind(), local.0.to_string()));
            }
            source = cause.source();
        }
        Self::Connect(err)
    }
}

/// Read failure of an upload source, tagged so it survives the trip
/// through the HTTP stack's error chain.
#[derive(Error, Debug)]
#[error("failed to read upload source: {0}")]
struct LocalReadError(std::io::Error);

/// Which API host a route lives on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Host {
    Api,
    Content,
}

/// Request body
pub(crate) enum Payload {
    Empty,
    Json(Vec<u8>),
    Stream { body: Body, length: u64 },
}

/// Stream a local file as a request body.
///
/// The file is owned by the body and closed when the request completes or
/// is dropped.
pub(crate) fn file_body(file: tokio::fs::File) -> Body {
    Body::wrap_stream(ReaderStream::new(file).map_err(LocalReadError))
}

/// In-memory request body
pub(crate) fn bytes_body(data: Bytes) -> (Body, u64) {
    let length = data.len() as u64;
    (Body::from(data), length)
}

/// Authenticated HTTP transport
pub(crate) struct Transport {
    http: Client,
    credential: Credential,
    api_endpoint: String,
    content_endpoint: String,
}

impl Transport {
    pub fn new(config: &Config, credential: Credential) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self {
            http,
            credential,
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            content_endpoint: config.content_endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// RPC route with a JSON argument and JSON result
    pub async fn call<A, R>(&self, route: &str, arg: &A) -> Result<R, TransportError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(arg).map_err(|e| TransportError::Build(e.to_string()))?;
        let response = self.send(Host::Api, route, None, Payload::Json(body)).await?;
        decode_body(response).await
    }

    /// RPC route without an argument
    pub async fn call_no_arg<R>(&self, route: &str) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
    {
        let response = self.send(Host::Api, route, None, Payload::Empty).await?;
        decode_body(response).await
    }

    /// Content upload route: argument in the header, bytes in the body
    pub async fn upload<A, R>(
        &self,
        route: &str,
        arg: &A,
        body: Body,
        length: u64,
    ) -> Result<R, TransportError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let arg = header_arg(arg)?;
        let response = self
            .send(Host::Content, route, Some(arg), Payload::Stream { body, length })
            .await?;
        decode_body(response).await
    }

    /// Content download route: returns the decoded result header and the
    /// response whose body is still unread.
    pub async fn download<A, R>(&self, route: &str, arg: &A) -> Result<(R, Response), TransportError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let arg = header_arg(arg)?;
        let response = self
            .send(Host::Content, route, Some(arg), Payload::Empty)
            .await?;

        let result = response
            .headers()
            .get(API_RESULT_HEADER)
            .ok_or_else(|| TransportError::Decode(format!("missing {} header", API_RESULT_HEADER)))?;
        let result = serde_json::from_slice(result.as_bytes())
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok((result, response))
    }

    /// Send one POST request and fail on any non-2xx status.
    pub async fn send(
        &self,
        host: Host,
        route: &str,
        api_arg: Option<String>,
        payload: Payload,
    ) -> Result<Response, TransportError> {
        let base = match host {
            Host::Api => &self.api_endpoint,
            Host::Content => &self.content_endpoint,
        };
        let url = format!("{}/{}", base, route);

        let mut req = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, self.credential.authorization());

        if let Some(arg) = api_arg {
            req = req.header(API_ARG_HEADER, arg);
        }

        req = match payload {
            Payload::Empty => req,
            Payload::Json(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(body),
            Payload::Stream { body, length } => req
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .header(header::CONTENT_LENGTH, length)
                .body(body),
        };

        debug!("Sending POST request to {}", url);
        let response = req.send().await.map_err(TransportError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read error body from {}: {}", url, e);
                    String::new()
                }
            };
            debug!("Request to {} failed with {}: {}", url, status, body);
            return Err(TransportError::Status { status, body });
        }

        Ok(response)
    }
}

async fn decode_body<R: DeserializeOwned>(response: Response) -> Result<R, TransportError> {
    let bytes = response.bytes().await.map_err(TransportError::Body)?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Serialize a header argument, escaping every non-ASCII character (and
/// DEL) as `\uXXXX` so the JSON is a valid header value.
pub(crate) fn header_arg<A: Serialize + ?Sized>(arg: &A) -> Result<String, TransportError> {
    let json = serde_json::to_string(arg).map_err(|e| TransportError::Build(e.to_string()))?;

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\x7f' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }

    Ok(out)
}
