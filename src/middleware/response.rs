use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{self, HeaderValue};
use hyper::StatusCode;

use super::Response;

/// `200 OK` 텍스트 응답을 생성합니다.
pub fn text_response(body: impl Into<String>) -> Response {
    let mut res = Response::new(Full::new(Bytes::from(body.into())));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}

/// 본문 없이 상태 코드만 가진 응답을 생성합니다.
pub fn status_response(status: StatusCode) -> Response {
    let mut res = Response::new(Full::new(Bytes::new()));
    *res.status_mut() = status;
    res
}

/// 주어진 content-type과 본문으로 응답을 생성합니다.
pub fn bytes_response(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response {
    let mut res = Response::new(Full::new(Bytes::from(body)));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    res
}
