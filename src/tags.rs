/*************************************************************************************************
 *
 * Script tag extraction
 * ---------------------
 *
 * Pulls src, integrity and inner-text information out of <script> tags in markup. Detection
 * matches `<script (.*)>(.*)</script>` per line, so a tag with no attribute text (and hence
 * no space after "script") is not detected. The integrity attribute value is a combined
 * "scheme-digest" pair split on its first '-'.
 *
 *************************************************************************************************/

use regex::Regex;

use crate::table::{ChainedTable, DuplicatePolicy, TableError};

lazy_static! {
    static ref SCRIPT_TAG: Regex = Regex::new(r"<script (.*)>(.*)</script>")
        .expect("Internal error compiling script tag pattern in tags");
}

// ***********************************************************************************************

/// One detected script tag. `integrity` holds the (scheme, digest) pair when the tag carried
/// a well-formed integrity attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: Option<String>,
    pub integrity: Option<(String, String)>,
    pub inner: String,
}

impl ScriptTag {
    /// Lowers the record into a Replace-policy table under the fixed field names, absent
    /// fields stored as empty strings.
    pub fn to_table(&self) -> Result<ChainedTable<String>, TableError> {
        let (scheme, digest) = match &self.integrity {
            Some((scheme, digest)) => (scheme.as_str(), digest.as_str()),
            None => ("", ""),
        };

        let mut info = ChainedTable::new(DuplicatePolicy::Replace);
        info.set("src", self.src.clone().unwrap_or_default())?;
        info.set("integrity_scheme", scheme.to_string())?;
        info.set("integrity_hash", digest.to_string())?;
        info.set("inner_content", self.inner.clone())?;
        Ok(info)
    }
}

// ***********************************************************************************************

/// Extracts every detectable script tag from `markup`.
pub fn scan(markup: &str) -> Vec<ScriptTag> {
    trace!("tags::scan");
    SCRIPT_TAG
        .captures_iter(markup)
        .map(|captures| {
            let attributes = &captures[1];
            let inner = captures[2].to_string();

            let mut src = None;
            let mut integrity = None;
            for attribute in attributes.split(' ') {
                if let Some(value) = attribute_value(attribute, "src") {
                    src = Some(value);
                } else if let Some(value) = attribute_value(attribute, "integrity") {
                    integrity = split_scheme_digest(&value);
                }
            }

            debug!("tags: found script tag (src: {:?})", src);
            ScriptTag {
                src,
                integrity,
                inner,
            }
        })
        .collect()
}

fn attribute_value(attribute: &str, name: &str) -> Option<String> {
    let (attribute_name, value) = attribute.split_once('=')?;
    if attribute_name != name {
        return None;
    }
    Some(value.replace('"', "").replace('\'', ""))
}

fn split_scheme_digest(value: &str) -> Option<(String, String)> {
    let (scheme, digest) = value.split_once('-')?;
    Some((scheme.to_string(), digest.to_string()))
}

/* *****************************************************************************************************************
 *
 * Tests
 *
 * *****************************************************************************************************************/
