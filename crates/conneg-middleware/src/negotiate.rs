//! Response encoder selection from the client's `Accept` preferences

use crate::error::Result;
use crate::registry::CodecDescriptor;
use crate::request::Request;
use conneg_core::{AcceptParser, MediaType};
use std::sync::Arc;
use tracing::debug;

/// Picks the encoder for a response
#[derive(Debug, Clone)]
pub struct Negotiator {
    parser: Arc<AcceptParser>,
}

impl Negotiator {
    /// Negotiator sharing the process-wide `Accept` parse cache
    pub fn new() -> Self {
        Self {
            parser: AcceptParser::global(),
        }
    }

    pub fn with_parser(parser: Arc<AcceptParser>) -> Self {
        Self { parser }
    }

    /// Best encoder for `request`, or `None` when nothing acceptable exists
    ///
    /// Preferences come from the request's pre-ranked list, then its
    /// `Accept` header, then its content-type field. With none of them the
    /// first encoder is chosen.
    pub fn preferred<'a>(
        &self,
        encoders: &'a [CodecDescriptor],
        request: &Request,
    ) -> Result<Option<&'a CodecDescriptor>> {
        if let Some(ranked) = &request.ranked_accept {
            return Ok(preferred_encoder(encoders, ranked));
        }
        let Some(accept) = request
            .headers
            .get("Accept")
            .or(request.content_type.as_deref())
        else {
            return Ok(encoders.first());
        };
        let ranked = self.parser.parse(accept)?;
        let chosen = preferred_encoder(encoders, &ranked);
        debug!(
            accept,
            encoder = chosen.map(CodecDescriptor::name),
            "negotiated response encoder"
        );
        Ok(chosen)
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}

/// First encoder accepting the highest-ranked media range
///
/// Ranked ranges are the outer loop, so a better-ranked range beats
/// encoder declaration order; declaration order breaks ties within one
/// range.
pub fn preferred_encoder<'a>(
    encoders: &'a [CodecDescriptor],
    ranked: &[MediaType],
) -> Option<&'a CodecDescriptor> {
    ranked
        .iter()
        .find_map(|accepted| encoders.iter().find(|encoder| encoder.accepts(accepted)))
}

#[cfg(test)]
#[path = "negotiate/negotiate_tests.rs"]
mod negotiate_tests;
