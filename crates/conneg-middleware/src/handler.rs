//! Handler trait shared by application code and the pipelines wrapping it

use crate::error::Result;
use crate::request::{Request, Response};

/// Turns a request into a response
///
/// Implemented for plain functions and closures, and by the decode and
/// encode pipelines so they can wrap each other.
pub trait Handler: Send + Sync {
    fn handle(&self, request: Request) -> Result<Response>;
}

impl<F> Handler for F
where
    F: Fn(Request) -> Result<Response> + Send + Sync,
{
    fn handle(&self, request: Request) -> Result<Response> {
        self(request)
    }
}
