use thiserror::Error;

/// Errors from decoding or re-encoding wallet records.
///
/// Field-level decode problems are never errors: projection degrades them to
/// per-field defaults. These variants cover whole payloads only.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record payload could not be decoded: {0}")]
    Decode(String),

    #[error("record could not be encoded as a transition input: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = RecordError::Decode("expected value at line 1".into());
        assert!(err.to_string().contains("line 1"));
    }
}
