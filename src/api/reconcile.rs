use serde_json::{Map, Value};
use tracing::{debug, info};

use super::traits::DocumentLookup;
use super::types::UploadResult;
use crate::constants::{DB_ID_KEY, EMBEDDING_ID_KEY, EXISTING_KEY, FILE_INFO_KEY, HASH_CODE_KEY};
use crate::utils::ChatError;

/// Fields read from an upload response before any lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFields {
    pub hash_code: Option<String>,
    pub existing: bool,
    pub auxiliary_id: Option<String>,
}

/// Read the identifier fields of an upload response
///
/// Metadata lives under `file_info` when that key holds an object, and at
/// the top level otherwise. `embedding_id` and `db_id` are interchangeable.
pub fn extract_fields(response: &Value) -> UploadFields {
    let Some(scope) = metadata_scope(response) else {
        return UploadFields::default();
    };

    UploadFields {
        hash_code: scope.get(HASH_CODE_KEY).and_then(identifier_text),
        existing: scope.get(EXISTING_KEY).is_some_and(is_truthy),
        auxiliary_id: [EMBEDDING_ID_KEY, DB_ID_KEY]
            .iter()
            .find_map(|key| scope.get(*key).and_then(identifier_text)),
    }
}

/// Turn an upload response into the identifier the session should track
///
/// Performs at most one `lookup` call, and only when the response has an
/// auxiliary id but no hash code.
pub async fn reconcile_upload<L>(response: &Value, lookup: &L) -> Result<UploadResult, ChatError>
where
    L: DocumentLookup + ?Sized,
{
    let fields = extract_fields(response);
    debug!(?fields, "upload response fields");

    let mut document_id = fields.hash_code;

    if document_id.is_none() {
        if let Some(auxiliary_id) = fields.auxiliary_id.as_deref() {
            info!(auxiliary_id, "no hash code in upload response, looking up document");
            let details = lookup.lookup_document(auxiliary_id).await?;
            document_id = details.get(HASH_CODE_KEY).and_then(identifier_text);
        }
    }

    match document_id {
        Some(document_id) => Ok(UploadResult {
            document_id,
            already_existed: fields.existing,
        }),
        None => Err(ChatError::MissingIdentifier {
            response: response.to_string(),
        }),
    }
}

fn metadata_scope(response: &Value) -> Option<&Map<String, Value>> {
    let top = response.as_object()?;
    match top.get(FILE_INFO_KEY) {
        Some(Value::Object(nested)) => Some(nested),
        _ => Some(top),
    }
}

/// Identifiers are truthy strings or numbers; `""` and `0` count as absent
fn identifier_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
