//! Decode and encode pipelines in one wrap

use conneg_middleware::{
    DecodeOptions, DecodeRequest, EncodeOptions, EncodeResponse, FormatConfig, Handler, Result,
};

/// Handler type produced by [`restful_format`]
pub type Restful<H> = EncodeResponse<DecodeRequest<H>>;

/// Wrap `handler` so request bodies are decoded and responses encoded using
/// the formats of one configuration
///
/// The decode pipeline sits inside the encode pipeline, so an error hook on
/// decoding can still return a structured body that gets encoded.
pub fn restful_format<H: Handler>(handler: H, config: &FormatConfig) -> Result<Restful<H>> {
    restful_format_with(
        handler,
        DecodeOptions::from_config(config),
        EncodeOptions::from_config(config),
    )
}

/// [`restful_format`] with programmatic options for each direction
pub fn restful_format_with<H: Handler>(
    handler: H,
    decode: DecodeOptions,
    encode: EncodeOptions,
) -> Result<Restful<H>> {
    let decoding = DecodeRequest::new(handler, decode)?;
    EncodeResponse::new(decoding, encode)
}
