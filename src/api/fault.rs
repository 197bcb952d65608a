//! Conversion of handler panics into 500 responses
//!
//! A panic escaping a handler ends up here as a [`Fault`]. The fault is
//! logged in full server-side; how much of it reaches the client is decided by
//! the [`FaultPolicy`] the router was built with.

use std::any::Any;

use axum::{body::Body, http::Response, response::IntoResponse};
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use crate::api::ApiError;
use crate::diagnostics;

/// Whether 500 responses carry the failure message and trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Generic body only
    #[default]
    Conceal,
    /// Message and trace embedded in the body; development use only
    Expose,
}

#[derive(Debug, Clone)]
pub struct Fault {
    pub message: String,
    pub trace: Option<String>,
}

/// Text of a panic payload (`&str` or `String`)
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Fault {
    /// Build a fault from a caught panic payload
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>, trace: Option<String>) -> Self {
        Self {
            message: panic_message(payload.as_ref()),
            trace,
        }
    }

    pub fn log(&self) {
        match &self.trace {
            Some(trace) => tracing::error!("Unhandled exception: {}\n{}", self.message, trace),
            None => tracing::error!("Unhandled exception: {}", self.message),
        }
    }

    pub fn into_api_error(self, policy: FaultPolicy) -> ApiError {
        match policy {
            FaultPolicy::Conceal => ApiError::internal("Internal Server Error"),
            FaultPolicy::Expose => {
                let err = ApiError::internal(format!("Unhandled exception: {}", self.message));
                match self.trace {
                    Some(trace) => err.with_trace(trace),
                    None => err,
                }
            }
        }
    }
}

/// Panic responder plugged into [`CatchPanicLayer`]
#[derive(Debug, Clone, Copy)]
pub struct FaultResponder {
    policy: FaultPolicy,
}

impl ResponseForPanic for FaultResponder {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> Response<Self::ResponseBody> {
        let fault = Fault::from_panic(err, diagnostics::take_panic_trace());
        fault.log();
        fault.into_api_error(self.policy).into_response()
    }
}

/// Layer catching handler panics and answering them per `policy`
pub fn catch_panic_layer(policy: FaultPolicy) -> CatchPanicLayer<FaultResponder> {
    CatchPanicLayer::custom(FaultResponder { policy })
}
