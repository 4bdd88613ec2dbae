use crate::form::FormField;
use crate::procedure::Procedure;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown procedure: '{0}'")]
    UnknownProcedure(String),

    #[error("sub-category '{category}' does not offer procedure '{procedure}'")]
    ProcedureNotInCategory { category: String, procedure: String },

    #[error("the {procedure} form has no `{field}` field")]
    FieldNotOnForm {
        field: FormField,
        procedure: Procedure,
    },

    #[error("value does not fit field `{0}`")]
    FieldValueMismatch(FormField),

    #[error("required field `{0}` is empty")]
    MissingRequired(FormField),

    #[error("catalog error: {0}")]
    Catalog(#[from] dental_catalog::CatalogError),

    #[error("{document} schema mismatch at {path}: {message}")]
    Schema {
        document: &'static str,
        path: String,
        message: String,
    },

    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
}

pub type OrderResult<T> = std::result::Result<T, OrderError>;

/// Deserialize a strict wire document, reporting the path of the first mismatch.
pub(crate) fn parse_yaml<T>(document: &'static str, yaml_text: &str) -> OrderResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        OrderError::Schema {
            document,
            path,
            message: err.into_inner().to_string(),
        }
    })
}
