use std::borrow::Cow;

use crate::connection::DeserializingConnection;
use crate::decoder::DecoderTypes;
use crate::transform::{ResultTransformer, ResultTransformers};
use crate::types::{DecoderType, RowValues};

mod rows;
mod select;
mod single_value;

pub use rows::DenormalizedRows;

/// Fluent builder for a typed query: parameters, column decoders and transformers.
pub struct DeserializingQuery<'conn, 'q, E> {
    pub(crate) conn: &'conn DeserializingConnection<E>,
    pub(crate) sql: Cow<'q, str>,
    pub(crate) params: Cow<'q, [RowValues]>,
    pub(crate) decoder_types: DecoderTypes,
    pub(crate) transformers: Option<&'q ResultTransformers>,
    pub(crate) decoder_type: Option<DecoderType>,
    pub(crate) single_value_transformer: Option<&'q ResultTransformer>,
}

impl<'conn, 'q, E> DeserializingQuery<'conn, 'q, E> {
    pub(crate) fn new(conn: &'conn DeserializingConnection<E>, sql: &'q str) -> Self {
        Self {
            conn,
            sql: Cow::Borrowed(sql),
            params: Cow::Borrowed(&[]),
            decoder_types: DecoderTypes::new(),
            transformers: None,
            decoder_type: None,
            single_value_transformer: None,
        }
    }

    /// Provide parameters for this statement.
    #[must_use]
    pub fn params(mut self, params: &'q [RowValues]) -> Self {
        self.params = Cow::Borrowed(params);
        self
    }

    /// Decode `column` with `decoder_type` before transformation.
    #[must_use]
    pub fn decode(mut self, column: impl Into<String>, decoder_type: DecoderType) -> Self {
        self.decoder_types.insert(column.into(), decoder_type);
        self
    }

    /// Replace all column decoders.
    #[must_use]
    pub fn decoder_types(mut self, decoder_types: DecoderTypes) -> Self {
        self.decoder_types = decoder_types;
        self
    }

    #[must_use]
    pub fn transformers(mut self, transformers: &'q ResultTransformers) -> Self {
        self.transformers = Some(transformers);
        self
    }

    /// Decoder for the scalar read by the single-value terminals.
    #[must_use]
    pub fn decoder_type(mut self, decoder_type: DecoderType) -> Self {
        self.decoder_type = Some(decoder_type);
        self
    }

    /// Transformer for the scalar read by the single-value terminals. It must not rename.
    #[must_use]
    pub fn single_value_transformer(mut self, transformer: &'q ResultTransformer) -> Self {
        self.single_value_transformer = Some(transformer);
        self
    }
}
