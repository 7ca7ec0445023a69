use crate::{http::HttpResponse, HandlerResult};
use serde_json::Value;
use std::{any::Any, sync::Arc};

pub fn echo<S>(_: Arc<S>, message: Value) -> HandlerResult {
    Ok(message)
}

pub fn plain(body: &str) -> HttpResponse {
    HttpResponse::ok(body)
}

pub fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic".to_owned()
    }
}
