use crate::types::{DecodePolicy, MissingKeyPolicy};

/// Options shared by the decoding and deserializing connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeserializingOptions {
    pub decode_policy: DecodePolicy,
    pub missing_key_policy: MissingKeyPolicy,
}

impl DeserializingOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> DeserializingOptionsBuilder {
        DeserializingOptionsBuilder::default()
    }
}

/// Fluent builder for [`DeserializingOptions`].
#[derive(Debug, Clone, Default)]
pub struct DeserializingOptionsBuilder {
    opts: DeserializingOptions,
}

impl DeserializingOptionsBuilder {
    #[must_use]
    pub fn decode_policy(mut self, decode_policy: DecodePolicy) -> Self {
        self.opts.decode_policy = decode_policy;
        self
    }

    #[must_use]
    pub fn missing_key_policy(mut self, missing_key_policy: MissingKeyPolicy) -> Self {
        self.opts.missing_key_policy = missing_key_policy;
        self
    }

    #[must_use]
    pub fn finish(self) -> DeserializingOptions {
        self.opts
    }
}
