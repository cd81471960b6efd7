//! Archive registry: which archives exist and where their TimeGates are.
//!
//! The registry is an XML document of the form
//!
//! ```xml
//! <links>
//!   <link id="ia" longname="Internet Archive">
//!     <timegate uri="http://web.archive.org/web/"/>
//!     <archive memento-status="yes"/>
//!   </link>
//! </links>
//! ```
//!
//! Use [`ArchiveInfo::timegate_uri`] as
//! [`ClientConfig::timegate_uri`](crate::core::client::ClientConfig::timegate_uri)
//! to prefer one archive over the aggregator.

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One archive listed in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArchiveInfo {
    pub id: String,
    pub name: String,
    pub timegate_uri: Option<String>,
    /// Whether the archive supports Memento natively.
    pub memento_status: bool,
}

#[derive(Debug, Deserialize)]
struct RegistryDoc {
    #[serde(rename = "link", default)]
    links: Vec<RegistryLink>,
}

#[derive(Debug, Deserialize)]
struct RegistryLink {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@longname", default)]
    longname: String,
    #[serde(default)]
    timegate: Option<UriAttr>,
    #[serde(default)]
    archive: Option<ArchiveAttr>,
}

#[derive(Debug, Deserialize)]
struct UriAttr {
    #[serde(rename = "@uri")]
    uri: String,
}

#[derive(Debug, Deserialize)]
struct ArchiveAttr {
    #[serde(rename = "@memento-status", default)]
    memento_status: String,
}

/// Parse the registry XML into archives keyed by id.
pub fn parse_archive_registry(xml: &str) -> Result<BTreeMap<String, ArchiveInfo>> {
    let doc: RegistryDoc = quick_xml::de::from_str(xml)?;
    Ok(doc
        .links
        .into_iter()
        .map(|link| {
            let info = ArchiveInfo {
                id: link.id.clone(),
                name: link.longname,
                timegate_uri: link.timegate.map(|t| t.uri),
                memento_status: link
                    .archive
                    .map(|a| a.memento_status == "yes")
                    .unwrap_or(false),
            };
            (link.id, info)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MementoError;

    const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<links>
  <link id="ia" longname="Internet Archive">
    <timegate uri="http://web.archive.org/web/"/>
    <timemap uri="http://web.archive.org/web/timemap/link/"/>
    <archive type="snapshot" rewritten-urls="yes" memento-status="yes"/>
  </link>
  <link id="loc" longname="Library of Congress">
    <timegate uri="http://webarchive.loc.gov/all/"/>
    <archive type="snapshot" memento-status="no"/>
  </link>
</links>"#;

    #[test]
    fn test_parse_registry() {
        let archives = parse_archive_registry(REGISTRY).unwrap();
        assert_eq!(archives.len(), 2);
        let ia = &archives["ia"];
        assert_eq!(ia.name, "Internet Archive");
        assert_eq!(ia.timegate_uri.as_deref(), Some("http://web.archive.org/web/"));
        assert!(ia.memento_status);
        assert!(!archives["loc"].memento_status);
    }

    #[test]
    fn test_parse_registry_empty() {
        assert!(parse_archive_registry("<links></links>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_registry_malformed() {
        assert!(matches!(
            parse_archive_registry("<links><link id=\"x\">"),
            Err(MementoError::Xml(_))
        ));
    }
}
