use std::sync::{Arc, Mutex};

use modware::middleware::{
    handler_fn, middleware_fn, text_response, BoxedHandler, Handler, Middleware, MiddlewareChain,
    Request,
};

use crate::common::{body_string, get};

type Trace = Arc<Mutex<Vec<String>>>;

fn tracing_middleware(name: &'static str, trace: Trace) -> Arc<dyn Middleware> {
    Arc::new(middleware_fn(name, move |next: BoxedHandler| {
        let trace = trace.clone();
        Arc::new(handler_fn(move |req: Request| {
            let next = next.clone();
            let trace = trace.clone();
            async move {
                trace.lock().unwrap().push(format!("{name}:before"));
                let res = next.call(req).await;
                trace.lock().unwrap().push(format!("{name}:after"));
                res
            }
        })) as BoxedHandler
    }))
}

fn terminal(trace: Trace) -> impl Handler {
    handler_fn(move |_req: Request| {
        let trace = trace.clone();
        async move {
            trace.lock().unwrap().push("handler".to_string());
            text_response("done")
        }
    })
}

#[tokio::test]
async fn test_outermost_first_entry_innermost_first_exit() {
    let trace: Trace = Arc::default();
    let chain = MiddlewareChain::new(vec![
        tracing_middleware("m1", trace.clone()),
        tracing_middleware("m2", trace.clone()),
    ]);

    let res = chain.then(terminal(trace.clone())).call(get("/")).await;
    assert_eq!(body_string(res).await, "done");
    assert_eq!(
        *trace.lock().unwrap(),
        vec!["m1:before", "m2:before", "handler", "m2:after", "m1:after"]
    );
}

#[tokio::test]
async fn test_append_and_extend_leave_receiver_untouched() {
    let trace: Trace = Arc::default();
    let base = MiddlewareChain::new(vec![tracing_middleware("m1", trace.clone())]);

    let appended = base.append(vec![tracing_middleware("m2", trace.clone())]);
    let extended = base.extend(&MiddlewareChain::new(vec![tracing_middleware(
        "m3",
        trace.clone(),
    )]));
    assert_eq!(base.names(), vec!["m1"]);
    assert_eq!(appended.names(), vec!["m1", "m2"]);
    assert_eq!(extended.names(), vec!["m1", "m3"]);

    base.then(terminal(trace.clone())).call(get("/")).await;
    assert_eq!(
        std::mem::take(&mut *trace.lock().unwrap()),
        vec!["m1:before", "handler", "m1:after"]
    );

    appended.then(terminal(trace.clone())).call(get("/")).await;
    assert_eq!(
        std::mem::take(&mut *trace.lock().unwrap()),
        vec!["m1:before", "m2:before", "handler", "m2:after", "m1:after"]
    );

    base.then(terminal(trace.clone())).call(get("/")).await;
    assert_eq!(
        *trace.lock().unwrap(),
        vec!["m1:before", "handler", "m1:after"]
    );
}
