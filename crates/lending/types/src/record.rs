use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// A decrypted record exactly as the wallet hands it over.
///
/// Only `recordName` and `data` are interpreted. Every other key the wallet
/// supplies (`id`, `owner`, `programName`, `spent`, nonces...) is kept in
/// `extra` so that serializing the record yields the wallet's payload again.
/// Records are never mutated after decoding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "recordName", default)]
    pub record_name: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
            data: Map::new(),
            extra: Map::new(),
        }
    }

    /// Builder helper: add a data field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Builder helper: add a top-level envelope key such as `id`.
    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// The declared record type, if it is one this client understands.
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_name(&self.record_name)
    }

    /// Wallet-assigned record identifier, when present.
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }

    /// Textual form of a data field. Numbers and booleans are stringified;
    /// nulls, arrays and objects count as absent.
    pub fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.data.get(name)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Compact JSON, the form a transition expects when consuming this record.
    pub fn to_input(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Response shape of the wallet's record plaintext request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl RecordBatch {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|e| RecordError::Decode(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Record types produced by the lending program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    UserProfile,
    Loan,
    Collateral,
    CreditCredential,
}

impl RecordType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "UserProfile" => Some(RecordType::UserProfile),
            "Loan" => Some(RecordType::Loan),
            "Collateral" => Some(RecordType::Collateral),
            "CreditCredential" => Some(RecordType::CreditCredential),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RecordType::UserProfile => "UserProfile",
            RecordType::Loan => "Loan",
            RecordType::Collateral => "Collateral",
            RecordType::CreditCredential => "CreditCredential",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
