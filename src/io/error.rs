use thiserror::Error;

/// Failures while locating or decoding rules, message tables and input.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("could not resolve {label} format; pass --from or use a .json/.yaml file")]
    UnresolvedFormat { label: &'static str },

    #[error("unsupported {label} file extension: {path} (expected .json, .yaml or .yml)")]
    UnsupportedPathExtension { label: &'static str, path: String },

    #[error("invalid json: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("invalid yaml: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
