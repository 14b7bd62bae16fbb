/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The boundary to the CSL processor.
//!
//! [`CitationEngine`] takes CSL-JSON items plus a style definition and returns
//! HTML. [`HayagrivaEngine`] implements it with hayagriva: it parses the style,
//! resolves dependent styles against hayagriva's bundled archive, and adapts
//! the items to the subset of CSL-JSON hayagriva accepts.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use citeblock_core::{CitationItem, StyleDefinition};
use hayagriva::archive::{self, ArchivedStyle};
use hayagriva::citationberg::json as csl_json;
use hayagriva::citationberg::{IndependentStyle, Locale, LocaleCode, Style};
use hayagriva::{
    BibliographyDriver, BibliographyRequest, BufWriteFormat, CitationRequest, ElemChild,
    ElemChildren, Rendered,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RenderError, Result};
use crate::markup::escape_html;

/// What to produce for a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One `csl-entry` per item inside a `csl-bib-body`.
    #[default]
    Bibliography,
    /// The in-text or note citation.
    Citation,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bibliography" => Ok(RenderMode::Bibliography),
            "citation" => Ok(RenderMode::Citation),
            other => Err(format!("unknown render mode: {}", other)),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Bibliography => f.write_str("bibliography"),
            RenderMode::Citation => f.write_str("citation"),
        }
    }
}

/// Renders CSL-JSON items with a CSL style.
pub trait CitationEngine: Send + Sync {
    fn render(
        &self,
        items: &[CitationItem],
        style: &StyleDefinition,
        mode: RenderMode,
    ) -> Result<String>;
}

/// [`CitationEngine`] backed by hayagriva.
pub struct HayagrivaEngine {
    locales: Vec<Locale>,
}

impl fmt::Debug for HayagrivaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HayagrivaEngine")
            .field("locales", &self.locales.len())
            .finish()
    }
}

impl Default for HayagrivaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HayagrivaEngine {
    /// Load the CSL locales bundled with hayagriva.
    pub fn new() -> Self {
        Self {
            locales: archive::locales(),
        }
    }

    fn resolve_style(&self, style: &StyleDefinition) -> Result<(IndependentStyle, Option<LocaleCode>)> {
        let parsed = Style::from_xml(&style.xml).map_err(|e| RenderError::StyleParse {
            id: style.id.clone(),
            message: e.to_string(),
        })?;

        match parsed {
            Style::Independent(independent) => Ok((independent, None)),
            Style::Dependent(dependent) => {
                let parent = dependent.parent_link.href.clone();
                match archived_style(&parent) {
                    Some(Style::Independent(independent)) => {
                        tracing::debug!(style = %style.id, %parent, "resolved dependent style");
                        Ok((independent, dependent.default_locale))
                    }
                    _ => Err(RenderError::MissingParent {
                        id: style.id.clone(),
                        parent,
                    }),
                }
            }
        }
    }

    fn render_entries(
        &self,
        entries: &[csl_json::Item],
        style: &IndependentStyle,
        locale: Option<LocaleCode>,
        mode: RenderMode,
    ) -> Result<String> {
        let mut driver: BibliographyDriver<'_, csl_json::Item> = BibliographyDriver::new();
        driver.citation(CitationRequest::new(
            entries.iter().map(hayagriva::CitationItem::with_entry).collect(),
            style,
            locale.clone(),
            &self.locales,
            None,
        ));
        let rendered = driver.finish(BibliographyRequest::new(style, locale, &self.locales));

        write_rendered(&rendered, mode).map_err(|_| RenderError::Engine("could not write HTML".into()))
    }
}

impl CitationEngine for HayagrivaEngine {
    fn render(
        &self,
        items: &[CitationItem],
        style: &StyleDefinition,
        mode: RenderMode,
    ) -> Result<String> {
        if items.is_empty() {
            return Ok(String::new());
        }
        let (independent, locale) = self.resolve_style(style)?;
        let entries = items
            .iter()
            .map(engine_item)
            .collect::<Result<Vec<_>>>()?;

        guarded(|| self.render_entries(&entries, &independent, locale, mode))
    }
}

/// Run a render step, turning a panic into [`RenderError::Engine`].
///
/// hayagriva asserts on inputs it does not support instead of returning errors.
pub(crate) fn guarded<F: FnOnce() -> Result<String>>(f: F) -> Result<String> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(RenderError::Engine(panic_message(payload.as_ref()))))
}

/// Look up a style in hayagriva's archive by its CSL id.
fn archived_style(href: &str) -> Option<Style> {
    let href = href.trim().trim_end_matches('/');
    let id = match href.strip_prefix("https://") {
        Some(rest) => format!("http://{}", rest),
        None => href.to_string(),
    };
    ArchivedStyle::by_id(&id).map(ArchivedStyle::get)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "the citation processor panicked".to_string()
    }
}

fn write_rendered(rendered: &Rendered, mode: RenderMode) -> std::result::Result<String, fmt::Error> {
    use fmt::Write;

    let mut html = String::new();
    match (&rendered.bibliography, mode) {
        (Some(bibliography), RenderMode::Bibliography) => {
            html.push_str("<div class=\"csl-bib-body\">\n");
            for item in &bibliography.items {
                let mut entry = String::new();
                if let Some(first) = &item.first_field {
                    escaped_child(first).write_buf(&mut entry, BufWriteFormat::Html)?;
                }
                escaped(&item.content).write_buf(&mut entry, BufWriteFormat::Html)?;
                writeln!(html, "  <div class=\"csl-entry\">{}</div>", entry)?;
            }
            html.push_str("</div>");
        }
        // Styles without a bibliography section only produce citations.
        _ => {
            let mut citation = String::new();
            for rendered in &rendered.citations {
                escaped(&rendered.citation).write_buf(&mut citation, BufWriteFormat::Html)?;
            }
            write!(html, "<span class=\"csl-citation\">{}</span>", citation)?;
        }
    }
    Ok(html)
}

fn escaped(children: &ElemChildren) -> ElemChildren {
    ElemChildren(children.0.iter().map(escaped_child).collect())
}

/// hayagriva writes text verbatim into HTML.
fn escaped_child(child: &ElemChild) -> ElemChild {
    match child {
        ElemChild::Text(text) => {
            let mut text = text.clone();
            text.text = escape_html(&text.text);
            ElemChild::Text(text)
        }
        ElemChild::Elem(elem) => {
            let mut elem = elem.clone();
            elem.children = escaped(&elem.children);
            ElemChild::Elem(elem)
        }
        ElemChild::Markup(markup) => ElemChild::Markup(escape_html(markup)),
        ElemChild::Link { text, url } => {
            let mut text = text.clone();
            text.text = escape_html(&text.text);
            ElemChild::Link {
                text,
                url: escape_html(url),
            }
        }
        other => other.clone(),
    }
}

/// Convert an item to hayagriva's CSL-JSON model.
///
/// hayagriva accepts strings, integers, name lists and dates with
/// `date-parts` or `raw`. Other JSON shapes are stringified or dropped, and
/// date ranges keep only their start date.
fn engine_item(item: &CitationItem) -> Result<csl_json::Item> {
    if !item.has_type() {
        return Err(RenderError::MissingType(item.id.clone()));
    }
    let Value::Object(fields) = item.to_json() else {
        return Err(RenderError::Item {
            id: item.id.clone(),
            message: "not a JSON object".into(),
        });
    };

    let fields: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(key, value)| {
            let value = engine_value(&key, value);
            value.map(|value| (key, value))
        })
        .collect();

    serde_json::from_value(Value::Object(fields)).map_err(|e| RenderError::Item {
        id: item.id.clone(),
        message: e.to_string(),
    })
}

fn engine_value(variable: &str, value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(Value::String(b.to_string())),
        Value::Number(n) if n.is_i64() => Some(Value::Number(n)),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::String(s) => Some(Value::String(s)),
        Value::Array(values) => engine_list(values),
        Value::Object(map) => engine_date(variable, map),
    }
}

/// Name lists keep their name objects; plain string lists are joined.
fn engine_list(values: Vec<Value>) -> Option<Value> {
    let names: Vec<Value> = values
        .iter()
        .filter_map(|v| v.as_object())
        .filter_map(engine_name)
        .collect();
    if !names.is_empty() {
        return Some(Value::Array(names));
    }

    let texts: Vec<String> = values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    (!texts.is_empty()).then(|| Value::String(texts.join(", ")))
}

const NAME_PARTS: &[&str] = &[
    "family",
    "given",
    "suffix",
    "dropping-particle",
    "non-dropping-particle",
];

fn engine_name(name: &Map<String, Value>) -> Option<Value> {
    if let Some(literal) = name.get("literal").and_then(Value::as_str) {
        let mut out = Map::new();
        out.insert("literal".into(), Value::String(literal.to_string()));
        return Some(Value::Object(out));
    }
    let out: Map<String, Value> = NAME_PARTS
        .iter()
        .filter_map(|part| {
            let value = name.get(*part)?.as_str()?;
            Some((part.to_string(), Value::String(value.to_string())))
        })
        .collect();
    (!out.is_empty()).then_some(Value::Object(out))
}

fn engine_date(variable: &str, date: Map<String, Value>) -> Option<Value> {
    let mut out = Map::new();

    let ranges = date.get("date-parts").and_then(Value::as_array);
    if let Some(start) = ranges.and_then(|r| r.first()).and_then(Value::as_array) {
        if ranges.is_some_and(|r| r.len() > 1) {
            tracing::debug!(variable, "date range rendered as its start date");
        }
        let parts: Option<Vec<Value>> = start
            .iter()
            .map(|p| {
                let p = p.as_i64()?;
                i16::try_from(p).ok().map(Value::from)
            })
            .collect();
        match parts {
            Some(parts) if !parts.is_empty() => {
                out.insert("date-parts".into(), Value::Array(vec![Value::Array(parts)]));
            }
            _ => return None,
        }
    } else if let Some(raw) = date.get("raw").and_then(Value::as_str) {
        out.insert("raw".into(), Value::String(raw.to_string()));
    } else {
        tracing::debug!(variable, "dropping date without date-parts");
        return None;
    }

    if let Some(season) = date.get("season").filter(|s| s.is_i64() || s.is_string()) {
        out.insert("season".into(), season.clone());
    }
    Some(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeblock_core::{CslDate, CslName};
    use serde_json::json;

    const AUTHOR_DATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
  <info>
    <title>Author Date Test</title>
    <id>http://example.org/styles/author-date-test</id>
  </info>
  <citation>
    <layout>
      <names variable="author">
        <name name-as-sort-order="all" sort-separator=", "/>
      </names>
      <date variable="issued" prefix=" (" suffix=")."><date-part name="year"/></date>
      <text variable="title" prefix=" " suffix="."/>
    </layout>
  </citation>
  <bibliography>
    <layout>
      <names variable="author">
        <name name-as-sort-order="all" sort-separator=", "/>
      </names>
      <date variable="issued" prefix=" (" suffix=")."><date-part name="year"/></date>
      <text variable="title" prefix=" " suffix="."/>
    </layout>
  </bibliography>
</style>"#;

    fn definition(xml: &str) -> StyleDefinition {
        StyleDefinition {
            id: "test".into(),
            xml: xml.into(),
        }
    }

    fn book() -> CitationItem {
        let mut item = CitationItem::new("node-1");
        item.item_type = Some("book".into());
        item.title = Some("Sample Title".into());
        item.author.push(CslName::new("Doe", "Jane"));
        item.issued = Some(CslDate::from_parts(vec![2020, 5]));
        item
    }

    #[test]
    fn renders_bibliography_entries() {
        let html = HayagrivaEngine::new()
            .render(&[book()], &definition(AUTHOR_DATE), RenderMode::Bibliography)
            .unwrap();
        assert!(html.starts_with("<div class=\"csl-bib-body\">"));
        assert!(html.contains("<div class=\"csl-entry\">"));
        assert!(html.contains("Doe, Jane"));
        assert!(html.contains("2020"));
        assert!(html.contains("Sample Title"));
    }

    #[test]
    fn renders_citations() {
        let html = HayagrivaEngine::new()
            .render(&[book()], &definition(AUTHOR_DATE), RenderMode::Citation)
            .unwrap();
        assert!(html.starts_with("<span class=\"csl-citation\">"));
        assert!(html.contains("Doe, Jane"));
    }

    #[test]
    fn escapes_item_text() {
        let mut item = book();
        item.title = Some("Fish & <Chips>".into());
        let html = HayagrivaEngine::new()
            .render(&[item], &definition(AUTHOR_DATE), RenderMode::Bibliography)
            .unwrap();
        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
    }

    #[test]
    fn style_without_bibliography_falls_back_to_citation() {
        let xml = AUTHOR_DATE.replace(
            &AUTHOR_DATE[AUTHOR_DATE.find("  <bibliography>").unwrap()
                ..AUTHOR_DATE.find("</style>").unwrap()],
            "",
        );
        let html = HayagrivaEngine::new()
            .render(&[book()], &definition(&xml), RenderMode::Bibliography)
            .unwrap();
        assert!(html.starts_with("<span class=\"csl-citation\">"));
        assert!(html.contains("Sample Title"));
    }

    #[test]
    fn missing_type_is_an_error() {
        let mut item = book();
        item.item_type = None;
        let err = HayagrivaEngine::new()
            .render(&[item], &definition(AUTHOR_DATE), RenderMode::Bibliography)
            .unwrap_err();
        assert_eq!(err, RenderError::MissingType("node-1".into()));
    }

    #[test]
    fn malformed_style_is_a_parse_error() {
        let err = HayagrivaEngine::new()
            .render(&[book()], &definition("<style>"), RenderMode::Bibliography)
            .unwrap_err();
        assert!(matches!(err, RenderError::StyleParse { .. }));
    }

    #[test]
    fn dependent_style_uses_archived_parent() {
        let dependent = r#"<?xml version="1.0" encoding="utf-8"?>
<style xmlns="http://purl.org/net/xbiblio/csl" version="1.0" default-locale="en-US">
  <info>
    <title>Journal of Examples</title>
    <id>http://www.zotero.org/styles/journal-of-examples</id>
    <link href="http://www.zotero.org/styles/apa" rel="independent-parent"/>
  </info>
</style>"#;
        let html = HayagrivaEngine::new()
            .render(&[book()], &definition(dependent), RenderMode::Bibliography)
            .unwrap();
        assert!(html.contains("Doe"));
        assert!(html.contains("Sample Title"));

        let orphan = dependent.replace("styles/apa", "styles/no-such-parent");
        let err = HayagrivaEngine::new()
            .render(&[book()], &definition(&orphan), RenderMode::Bibliography)
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingParent { .. }));
    }

    #[test]
    fn engine_items_drop_unsupported_shapes() {
        let mut item = book();
        item.issued = Some(CslDate {
            date_parts: vec![vec![2019], vec![2020]],
            circa: true,
            ..Default::default()
        });
        item.variables.insert("accessed".into(), json!({"literal": "sometime"}));
        item.variables.insert("peer-reviewed".into(), json!(true));
        item.variables.insert("keyword".into(), json!(["a", "b"]));

        let engine = engine_item(&item).unwrap();
        let value = serde_json::to_value(&engine).unwrap();
        assert_eq!(value["issued"], json!([[2019]]));
        assert!(value.get("accessed").is_none());
        assert_eq!(value["peer-reviewed"], json!("true"));
        assert_eq!(value["keyword"], json!("a, b"));
    }

    #[test]
    fn guarded_passes_results_through() {
        assert_eq!(guarded(|| Ok("<span/>".to_string())), Ok("<span/>".to_string()));
        assert_eq!(
            guarded(|| Err(RenderError::MissingType("node-1".into()))),
            Err(RenderError::MissingType("node-1".into()))
        );
    }

    #[test]
    fn guarded_turns_panics_into_engine_errors() {
        let static_message = guarded(|| panic!("ranges are not supported"));
        assert_eq!(
            static_message,
            Err(RenderError::Engine("ranges are not supported".into()))
        );

        let formatted = guarded(|| panic!("bad date {}", 42));
        assert_eq!(formatted, Err(RenderError::Engine("bad date 42".into())));

        let opaque = guarded(|| std::panic::panic_any(7_u8));
        assert_eq!(
            opaque,
            Err(RenderError::Engine("the citation processor panicked".into()))
        );
        assert_eq!(
            opaque.unwrap_err().to_string(),
            "citation engine failed: the citation processor panicked"
        );
    }

    #[test]
    fn render_mode_parsing() {
        assert_eq!("citation".parse::<RenderMode>().unwrap(), RenderMode::Citation);
        assert_eq!(" Bibliography ".parse::<RenderMode>().unwrap(), RenderMode::Bibliography);
        assert!("footnote".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::default().to_string(), "bibliography");
    }
}
