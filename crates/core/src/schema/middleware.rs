//! Response shapes a compiled schema can report middleware failures through.
//!
//! Hosting frameworks come in two flavors: those with a chainable
//! `status(code).send(body)` response, and lower-level ones that write a head
//! and then a body. Callers pick the matching [`Responder`] variant.

/// Status code sent when validation fails in middleware mode.
pub const BAD_REQUEST: u16 = 400;

/// A response with a chainable status setter, e.g. `res.status(400).send(body)`.
pub trait ChainableResponse {
    fn status(&mut self, code: u16) -> &mut dyn ChainableResponse;
    fn send(&mut self, body: &str);
}

/// A low-level response written as a head followed by a body.
pub trait HeaderWriterResponse {
    fn write_head(&mut self, status: u16, headers: &[(&str, String)]);
    fn end(&mut self, body: &str);
}

/// The response a middleware invocation reports failures to.
pub enum Responder<'a> {
    Chainable(&'a mut dyn ChainableResponse),
    HeaderWriter(&'a mut dyn HeaderWriterResponse),
}

impl Responder<'_> {
    /// Deliver a plain-text failure body with the given status.
    pub fn report_failure(self, status: u16, body: &str) {
        match self {
            Self::Chainable(res) => res.status(status).send(body),
            Self::HeaderWriter(res) => {
                let headers = [
                    ("Content-Type", "text/plain".to_string()),
                    ("Content-Length", body.len().to_string()),
                ];
                res.write_head(status, &headers);
                res.end(body);
            }
        }
    }
}

impl<'a> From<&'a mut dyn ChainableResponse> for Responder<'a> {
    fn from(res: &'a mut dyn ChainableResponse) -> Self {
        Self::Chainable(res)
    }
}

impl<'a> From<&'a mut dyn HeaderWriterResponse> for Responder<'a> {
    fn from(res: &'a mut dyn HeaderWriterResponse) -> Self {
        Self::HeaderWriter(res)
    }
}
