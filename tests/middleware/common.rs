use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::HeaderName;
use hyper::Method;
use modware::middleware::{Request, Response};

pub fn request(method: Method, uri: &str, headers: &[(HeaderName, &str)]) -> Request {
    let mut builder = hyper::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(name, *value);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

pub fn get(uri: &str) -> Request {
    request(Method::GET, uri, &[])
}

pub async fn body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
