use std::sync::{Arc, Mutex};

use modware::middleware::{
    handler_fn, text_response, BoxedHandler, Handler, MiddlewareChain, Pagination,
    PaginationProps, Request,
};

use crate::common::get;

type Seen = Arc<Mutex<Vec<Option<PaginationProps>>>>;

fn app(seen: Seen) -> BoxedHandler {
    MiddlewareChain::new(vec![Arc::new(Pagination::new())]).then(handler_fn(
        move |req: Request| {
            let seen = seen.clone();
            async move {
                seen.lock()
                    .unwrap()
                    .push(PaginationProps::from_request(&req).copied());
                text_response("ok")
            }
        },
    ))
}

#[tokio::test]
async fn test_page_number_and_size() {
    let seen: Seen = Arc::default();
    app(seen.clone())
        .call(get("/genes?page[number]=6&page[size]=10"))
        .await;

    let props = seen.lock().unwrap()[0].unwrap();
    assert_eq!(props.current, 6);
    assert_eq!(props.entries, 10);
    assert_eq!(props.records, 0);
    assert_eq!(props.offset(), 50);
}

#[tokio::test]
async fn test_missing_key_attaches_nothing() {
    let seen: Seen = Arc::default();
    let handler = app(seen.clone());
    for uri in [
        "/genes",
        "/genes?page[number]=6",
        "/genes?page[size]=10",
        "/genes?page=6&size=10",
    ] {
        handler.call(get(uri)).await;
    }
    assert_eq!(*seen.lock().unwrap(), vec![None, None, None, None]);
}

#[tokio::test]
async fn test_non_numeric_values_become_zero() {
    let seen: Seen = Arc::default();
    app(seen.clone())
        .call(get("/genes?page[number]=first&page[size]=10"))
        .await;

    let props = seen.lock().unwrap()[0].unwrap();
    assert_eq!(props.current, 0);
    assert_eq!(props.entries, 10);
}

#[tokio::test]
async fn test_negative_values_become_zero() {
    let seen: Seen = Arc::default();
    app(seen.clone())
        .call(get("/genes?page[number]=-1&page[size]=-5"))
        .await;

    let props = seen.lock().unwrap()[0].unwrap();
    assert_eq!(props.current, 0);
    assert_eq!(props.entries, 0);
    assert_eq!(props.offset(), 0);
}

#[test]
fn test_last_page() {
    let props = PaginationProps {
        records: 57,
        entries: 10,
        current: 1,
    };
    assert_eq!(props.last_page(), 6);

    let empty = PaginationProps::default();
    assert_eq!(empty.last_page(), 1);
}
