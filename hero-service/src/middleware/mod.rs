//! Request tracking middleware

pub mod request_id;
pub mod request_tracking;

pub use request_id::{
    CurrentRequestId, MakeTypedRequestId, RequestId, RequestIdError, REQUEST_ID_HEADER,
};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, SENSITIVE_HEADERS,
};
