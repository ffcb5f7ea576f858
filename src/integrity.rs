/*************************************************************************************************
 *
 * Integrity verification
 * ----------------------
 *
 * Recomputes fingerprint digests over script content and compares them with the digest
 * declared in the tag's integrity attribute. Content comes from the file named by the tag's
 * src attribute, or from the tag's inner text when no src is present.
 *
 * --------------------
 * Errors and responses
 * --------------------
 *
 * File cannot be read:               Return IntegrityError::Io(std::io::Error)
 * Content outside the alphabet:      Return IntegrityError::Hash(HashError)
 * Declared digest not a number:      Return IntegrityError::BadDigest(String)
 * Digests differ:                    Return IntegrityError::Mismatch naming the resource
 * Neither or both inputs provided:   Return IntegrityError::MissingInput (generation only)
 *
 * Digest comparison is numeric on both sides; the declared text is parsed into the same
 * representation the fingerprint function produces.
 *
 *************************************************************************************************/

use std::{fmt, fs, io};

use crate::hashing::{self, Digest, HashError};
use crate::table::TableError;
use crate::tags;

/// Scheme half of emitted integrity attributes, naming the fingerprint algorithm.
pub const SCHEME: &str = "fingerprint";

// ***********************************************************************************************

#[derive(Debug)]
pub enum IntegrityError {
    Io(io::Error),
    Hash(HashError),
    Table(TableError),
    BadDigest(String),
    Mismatch {
        resource: String,
        declared: String,
        computed: Digest,
    },
    MissingInput,
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegrityError::Io(error) => write!(f, "{}", error),
            IntegrityError::Hash(error) => write!(f, "{}", error),
            IntegrityError::Table(error) => write!(f, "{}", error),
            IntegrityError::BadDigest(text) => {
                write!(f, "Declared digest {} is not a decimal integer", text)
            }
            IntegrityError::Mismatch {
                resource,
                declared,
                computed,
            } => write!(
                f,
                "Content of {} does not match the declared digest {} (computed {})",
                resource, declared, computed
            ),
            IntegrityError::MissingInput => {
                write!(f, "Provide a file location or the inline javascript, not both")
            }
        }
    }
}

impl From<io::Error> for IntegrityError {
    fn from(error: io::Error) -> Self {
        IntegrityError::Io(error)
    }
}

impl From<HashError> for IntegrityError {
    fn from(error: HashError) -> Self {
        IntegrityError::Hash(error)
    }
}

impl From<TableError> for IntegrityError {
    fn from(error: TableError) -> Self {
        IntegrityError::Table(error)
    }
}

// ***********************************************************************************************

/// Verifies every script tag in `markup` that declares an integrity digest. Tags without a
/// scheme and digest pass untouched; the first failing tag aborts the walk.
pub fn verify_document(markup: &str) -> Result<(), IntegrityError> {
    trace!("integrity::verify_document");
    for tag in tags::scan(markup) {
        let info = tag.to_table()?;
        let scheme = info.get("integrity_scheme")?;
        let declared = info.get("integrity_hash")?;
        if scheme.is_empty() || declared.is_empty() {
            continue;
        }

        let src = info.get("src")?;
        if src.is_empty() {
            verify_inline(declared, info.get("inner_content")?)?;
        } else {
            verify_file(declared, src)?;
        }
    }
    Ok(())
}

/// Checks the contents of the file at `location` against the declared digest. The file handle
/// is opened, read to completion and closed before any comparison happens.
pub fn verify_file(declared: &str, location: &str) -> Result<(), IntegrityError> {
    debug!("integrity: checking {} against declared digest", location);
    let content = fs::read_to_string(location)?;
    compare(declared, &content, location)
}

/// Checks inline script text against the declared digest.
pub fn verify_inline(declared: &str, inline: &str) -> Result<(), IntegrityError> {
    debug!("integrity: checking inline script against declared digest");
    compare(declared, inline, "inline")
}

fn compare(declared: &str, content: &str, resource: &str) -> Result<(), IntegrityError> {
    let computed = hashing::fingerprint(content)?;
    let expected: Digest = declared
        .parse()
        .map_err(|_| IntegrityError::BadDigest(declared.to_string()))?;

    if computed == expected {
        info!("integrity: {} matches its declared digest", resource);
        Ok(())
    } else {
        Err(IntegrityError::Mismatch {
            resource: resource.to_string(),
            declared: declared.to_string(),
            computed,
        })
    }
}

// ***********************************************************************************************

/// Emits a script tag string carrying an integrity attribute for the file at `src` or for
/// the `inline` javascript. Exactly one of the two must be provided.
pub fn generate(src: Option<&str>, inline: Option<&str>) -> Result<String, IntegrityError> {
    match (src, inline) {
        (Some(location), None) => {
            let content = fs::read_to_string(location)?;
            let digest = hashing::fingerprint(content.as_str())?;
            Ok(format!(
                "<script src=\"{}\" integrity=\"{}-{}\"></script>",
                location, SCHEME, digest
            ))
        }
        (None, Some(javascript)) => {
            let digest = hashing::fingerprint(javascript)?;
            Ok(format!(
                "<script integrity=\"{}-{}\">{}</script>",
                SCHEME, digest, javascript
            ))
        }
        _ => Err(IntegrityError::MissingInput),
    }
}

/* *****************************************************************************************************************
 *
 * Tests
 *
 * *****************************************************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn generated_inline_tag_verifies() {
        let tag = generate(None, Some("console.log('Hello World')")).unwrap();
        assert!(tag.starts_with(&format!("<script integrity=\"{}-", SCHEME)));
        verify_document(&tag).unwrap();
    }

    #[test]
    fn tampered_inline_digest_is_a_mismatch() {
        let markup = format!(
            "<script integrity=\"{}-{}\">console.log('Hello World')</script>",
            SCHEME,
            "9".repeat(128)
        );
        match verify_document(&markup).unwrap_err() {
            IntegrityError::Mismatch { resource, .. } => assert_eq!(resource, "inline"),
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    fn generated_file_tag_verifies() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "console.log('Hello World')").unwrap();
        let location = file.path().to_str().unwrap().to_string();

        let tag = generate(Some(location.as_str()), None).unwrap();
        verify_document(&tag).unwrap();
    }

    #[test]
    fn tampered_file_digest_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "console.log('Hello World')").unwrap();
        let location = file.path().to_str().unwrap().to_string();

        let markup = format!(
            "<script integrity=\"{}-{}\" src=\"{}\"></script>",
            SCHEME,
            "9".repeat(128),
            location
        );
        match verify_document(&markup).unwrap_err() {
            IntegrityError::Mismatch { resource, .. } => assert_eq!(resource, location),
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        assert!(matches!(
            generate(Some("/nonexistent/file.js"), None).unwrap_err(),
            IntegrityError::Io(_)
        ));
    }

    #[test]
    fn generation_requires_exactly_one_input() {
        assert!(matches!(
            generate(None, None).unwrap_err(),
            IntegrityError::MissingInput
        ));
        assert!(matches!(
            generate(Some("file.js"), Some("alert(1)")).unwrap_err(),
            IntegrityError::MissingInput
        ));
    }

    #[test]
    fn tags_without_integrity_pass() {
        verify_document("<script src=\"app.js\">x()</script>").unwrap();
    }

    #[test]
    fn unparseable_declared_digest_is_rejected() {
        let markup = format!("<script integrity=\"{}-notanumber\">x()</script>", SCHEME);
        assert!(matches!(
            verify_document(&markup).unwrap_err(),
            IntegrityError::BadDigest(_)
        ));
    }
}
