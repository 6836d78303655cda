use serde::{Deserialize, Serialize};

/// Max length given to fields synthesised past the declared field count.
pub const DEFAULT_EXTENSION_FIELD_LENGTH: usize = 65536;

/// Runtime behaviour shared by every node of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Synthesise extension fields when a field past the declared count is requested.
    pub extend_segments: bool,
    /// Max length recorded for synthesised extension fields.
    pub extension_field_length: usize,
    /// Fall back to a generic segment when a non-standard name can't be resolved.
    pub unknown_segments_as_generic: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            extend_segments: true,
            extension_field_length: DEFAULT_EXTENSION_FIELD_LENGTH,
            unknown_segments_as_generic: true,
        }
    }
}

impl ModelOptions {
    /// Options that reject anything the definitions don't declare.
    pub fn strict() -> Self {
        Self {
            extend_segments: false,
            unknown_segments_as_generic: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_extend_segments(mut self, enable: bool) -> Self {
        self.extend_segments = enable;
        self
    }

    #[must_use]
    pub fn with_extension_field_length(mut self, length: usize) -> Self {
        self.extension_field_length = length;
        self
    }

    #[must_use]
    pub fn with_unknown_segments_as_generic(mut self, enable: bool) -> Self {
        self.unknown_segments_as_generic = enable;
        self
    }
}
