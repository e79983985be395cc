use bytes::{Bytes, BytesMut};
use http_body_util::Full;
use hyper::{
    HeaderMap, Response as HyperResponse, StatusCode,
    header::{self, HeaderName, HeaderValue, IntoHeaderName},
};
use std::str::FromStr;

pub mod error;

use error::ResponseError;

#[derive(Debug, Clone, Default)]
pub struct Response {
    status: StatusCode,
    body: BytesMut,
    headers: HeaderMap,
    ended: bool,
}

impl Response {
    pub fn new() -> Self {
        Response {
            status: StatusCode::OK,
            body: BytesMut::with_capacity(512),
            headers: HeaderMap::with_capacity(8),
            ended: false,
        }
    }

    /// Sets the status from a raw code, rejecting values outside `100..=999`.
    pub fn status_code(&mut self, status: u16) -> Result<&mut Self, ResponseError> {
        self.status =
            StatusCode::from_u16(status).map_err(|_| ResponseError::InvalidStatusCode(status))?;
        Ok(self)
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn current_status(&self) -> StatusCode {
        self.status
    }

    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    pub fn header<K: IntoHeaderName, V: Into<HeaderValue>>(&mut self, key: K, val: V) -> &mut Self {
        self.headers.insert(key, val.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        HeaderName::from_str(key)
            .ok()
            .and_then(|k| self.headers.get(&k))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn write(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.body.extend_from_slice(data.as_ref());
        self
    }

    pub fn send(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        let data = data.as_ref();

        self.body.clear();
        self.body.reserve(data.len());
        self.body.extend_from_slice(data);

        self.header(header::CONTENT_LENGTH, HeaderValue::from(data.len()));

        if !self.headers.contains_key(header::CONTENT_TYPE) {
            // Best guess: plain text if it's utf8
            let guess = if std::str::from_utf8(data).is_ok() {
                "text/plain; charset=utf-8"
            } else {
                "application/octet-stream"
            };
            self.header(header::CONTENT_TYPE, HeaderValue::from_static(guess));
        }

        self.end()
    }

    pub fn json<T: serde::Serialize>(&mut self, value: T) -> Result<&mut Self, ResponseError> {
        let json = serde_json::to_vec(&value)?;
        self.header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self.send(json))
    }

    #[inline]
    pub fn end(&mut self) -> &mut Self {
        self.ended = true;
        self
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn redirect(&mut self, location: impl Into<HeaderValue>) -> &mut Self {
        self.status = StatusCode::FOUND;
        self.header(header::LOCATION, location);
        self.header(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        self.end()
    }

    pub fn r#type(&mut self, mime: impl Into<HeaderValue>) -> &mut Self {
        self.header(header::CONTENT_TYPE, mime);
        self
    }

    pub fn into_hyper(mut self) -> HyperResponse<Full<Bytes>> {
        if !self.ended {
            self.end();
        }

        let body = self.body.freeze();

        let status = if body.is_empty() && self.status == StatusCode::OK {
            StatusCode::NO_CONTENT
        } else {
            self.status
        };

        let mut response = HyperResponse::new(Full::new(body));
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl From<Response> for HyperResponse<Full<Bytes>> {
    fn from(resp: Response) -> Self {
        resp.into_hyper()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn send_guesses_content_type() {
        let mut res = Response::new();
        res.send("plain");

        assert!(res.is_ended());
        assert_eq!(
            res.get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(res.get("content-length").unwrap(), "5");
    }

    #[test]
    fn json_sets_content_type() {
        let mut res = Response::new();
        res.json(json!({ "ok": true })).unwrap();

        assert_eq!(res.get("content-type").unwrap(), "application/json");
        assert_eq!(res.body(), br#"{"ok":true}"#.as_slice());
    }

    #[test]
    fn invalid_status_code_is_rejected() {
        let mut res = Response::new();
        assert!(matches!(
            res.status_code(42),
            Err(ResponseError::InvalidStatusCode(42))
        ));
        assert_eq!(res.current_status(), StatusCode::OK);
    }

    #[test]
    fn empty_ok_becomes_no_content() {
        let res = Response::new().into_hyper();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
