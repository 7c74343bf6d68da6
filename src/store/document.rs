//! QuickPaths XML document: parse, validate, render, load/save.
//!
//! Формат:
//!   <QuickPaths>
//!     <Configuration>
//!       <Source>...</Source>
//!       <LastUpdated>yyyy-MM-dd HH:mm:ss</LastUpdated>
//!     </Configuration>
//!     <Paths>
//!       <Path alias="..." location="..." />
//!     </Paths>
//!   </QuickPaths>
//!
//! Configuration и Paths обязательны: документ без них отвергается целиком (Validation),
//! до любых изменений. Сохранение - запись всего документа во временный файл + rename.

use log::debug;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, WinDeckError};
use crate::util::now_stamp;

pub const ROOT_ELEMENT: &str = "QuickPaths";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    #[serde(rename = "@alias")]
    pub alias: String,
    #[serde(rename = "@location")]
    pub location: String,
}

impl AliasEntry {
    pub fn new(alias: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "LastUpdated", default)]
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PathList {
    #[serde(rename = "Path", default)]
    entries: Vec<AliasEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "QuickPaths")]
pub struct AliasDocument {
    #[serde(rename = "Configuration")]
    pub configuration: Configuration,
    #[serde(rename = "Paths")]
    paths: PathList,
}

impl AliasDocument {
    pub fn new(source: impl Into<String>, entries: Vec<AliasEntry>) -> Self {
        Self {
            configuration: Configuration {
                source: source.into(),
                last_updated: now_stamp(),
            },
            paths: PathList { entries },
        }
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.paths.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<AliasEntry> {
        &mut self.paths.entries
    }

    /// First entry with `alias` (document order).
    pub fn find(&self, alias: &str) -> Option<&AliasEntry> {
        self.paths.entries.iter().find(|e| e.alias == alias)
    }

    pub fn position(&self, alias: &str) -> Option<usize> {
        self.paths.entries.iter().position(|e| e.alias == alias)
    }

    pub fn touch(&mut self) {
        self.configuration.last_updated = now_stamp();
    }

    pub fn parse(text: &str) -> Result<Self> {
        if !text.contains(&format!("<{}", ROOT_ELEMENT)) {
            return Err(WinDeckError::Validation(format!(
                "missing <{}> root element",
                ROOT_ELEMENT
            )));
        }
        quick_xml::de::from_str::<AliasDocument>(text)
            .map_err(|e| WinDeckError::Validation(format!("malformed alias document: {}", e)))
    }

    pub fn render(&self) -> Result<String> {
        let mut body = String::new();
        let mut ser = Serializer::with_root(&mut body, Some(ROOT_ELEMENT))
            .map_err(|e| WinDeckError::Validation(format!("serialize: {}", e)))?;
        ser.indent(' ', 2);
        self.serialize(ser)
            .map_err(|e| WinDeckError::Validation(format!("serialize: {}", e)))?;

        let mut out = String::with_capacity(XML_DECL.len() + body.len() + 1);
        out.push_str(XML_DECL);
        out.push_str(&body);
        out.push('\n');
        Ok(out)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| WinDeckError::io_at("read", path, e))?;
        Self::parse(&text).map_err(|e| match e {
            WinDeckError::Validation(msg) => {
                WinDeckError::Validation(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Whole-document replacement via a sibling temp file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.render()?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        fs::write(&tmp, text.as_bytes()).map_err(|e| WinDeckError::io_at("write", &tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            WinDeckError::io_at("replace", path, e)
        })?;
        debug!("store: saved {} entr(y/ies) to {}", self.entries().len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_attributes_and_order() {
        let xml = r#"<QuickPaths>
  <Configuration>
    <Source>C:\tools\qp.xml</Source>
    <LastUpdated>2024-05-01 10:00:00</LastUpdated>
  </Configuration>
  <Paths>
    <Path alias="b" location="C:\b" />
    <Path alias="a" location="C:\a" />
  </Paths>
</QuickPaths>"#;
        let doc = AliasDocument::parse(xml).unwrap();
        assert_eq!(doc.configuration.last_updated, "2024-05-01 10:00:00");
        let aliases: Vec<_> = doc.entries().iter().map(|e| e.alias.as_str()).collect();
        assert_eq!(aliases, vec!["b", "a"]);
    }

    #[test]
    fn empty_paths_section_is_valid() {
        let xml = "<QuickPaths><Configuration><Source>x</Source><LastUpdated>t</LastUpdated></Configuration><Paths/></QuickPaths>";
        let doc = AliasDocument::parse(xml).unwrap();
        assert!(doc.entries().is_empty());
    }

    #[test]
    fn missing_sections_rejected() {
        let no_paths = "<QuickPaths><Configuration><Source>x</Source></Configuration></QuickPaths>";
        assert!(AliasDocument::parse(no_paths).unwrap_err().is_validation());

        let no_cfg = "<QuickPaths><Paths><Path alias=\"a\" location=\"b\"/></Paths></QuickPaths>";
        assert!(AliasDocument::parse(no_cfg).unwrap_err().is_validation());

        assert!(AliasDocument::parse("not xml at all").unwrap_err().is_validation());
        assert!(AliasDocument::parse("<Other><Paths/></Other>").unwrap_err().is_validation());
    }

    #[test]
    fn render_then_parse_keeps_entries() {
        let doc = AliasDocument::new(
            "/tmp/qp.xml",
            vec![AliasEntry::new("dev", "/tmp/dev"), AliasEntry::new("x", "a & b")],
        );
        let text = doc.render().unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("alias=\"dev\""));
        assert!(text.contains("<LastUpdated>"));
        let back = AliasDocument::parse(&text).unwrap();
        assert_eq!(back, doc);
    }
}
