//! Utility functions for processing data in the YAML file format
use std::io::Write;

use serde::{Deserialize, ser};
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize YAML"))]
    SerializeYaml { source: serde_yaml::Error },

    #[snafu(display("failed to write YAML document separator"))]
    WriteDocumentSeparator { source: std::io::Error },

    #[snafu(display("failed to parse YAML document #{index}"))]
    ParseDocument {
        source: serde_yaml::Error,
        index: usize,
    },
}

/// Serializes the given data structure as an explicit YAML document and writes it to a [`Write`].
pub fn serialize_to_explicit_document<T, W>(mut writer: W, value: &T) -> Result<()>
where
    T: ser::Serialize,
    W: Write,
{
    writer
        .write_all(b"---\n")
        .context(WriteDocumentSeparatorSnafu)?;
    let mut serializer = serde_yaml::Serializer::new(writer);
    value
        .serialize(&mut serializer)
        .context(SerializeYamlSnafu)?;
    Ok(())
}

/// Splits a (potentially multi-document) YAML stream into its documents.
///
/// Empty documents, such as the one produced by a leading `---`, are skipped.
pub fn parse_documents(input: &str) -> Result<Vec<serde_yaml::Value>> {
    let mut documents = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let value =
            serde_yaml::Value::deserialize(document).context(ParseDocumentSnafu { index })?;
        if !value.is_null() {
            documents.push(value);
        }
    }

    Ok(documents)
}
