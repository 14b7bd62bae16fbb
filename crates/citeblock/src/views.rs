/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! HTML pages for the admin screens and the picker block.

use std::fmt::Write;

use axum::http::StatusCode;
use citeblock_core::upload::{ALLOWED_EXTENSIONS, COLLECTION_PATH};
use citeblock_core::{inspect_style, StyleInfo, StyleRecord};
use citeblock_processor::picker::{ARIA_LABEL, FIELD_NAME, WRAPPER_ID};
use citeblock_processor::{escape_html, PickerView};

pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{}</title>
</head>
<body>
<h1>{}</h1>
{}
</body>
</html>
"#,
        escape_html(title),
        escape_html(title),
        body
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        status.canonical_reason().unwrap_or("Error"),
        &format!(r#"<p class="error">{}</p>"#, escape_html(message)),
    )
}

/// Status message shown above the listing after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Created(&'a str),
    Updated(&'a str),
    Deleted(&'a str),
}

impl Notice<'_> {
    pub fn message(&self) -> String {
        match self {
            Notice::Created(label) => format!("Created new citation style {}.", label),
            Notice::Updated(label) => format!("Updated citation style {}.", label),
            Notice::Deleted(label) => format!("Deleted citation style {}.", label),
        }
    }
}

pub fn style_list(styles: &[StyleRecord], notice: Option<Notice<'_>>) -> String {
    let mut body = String::new();
    if let Some(notice) = notice {
        let _ = writeln!(
            body,
            r#"<div class="messages status">{}</div>"#,
            escape_html(&notice.message())
        );
    }
    let _ = writeln!(
        body,
        r#"<p><a href="{}/add">Add citation style</a></p>"#,
        COLLECTION_PATH
    );

    if styles.is_empty() {
        body.push_str("<p>There are no citation styles yet.</p>");
        return page("Citation styles", &body);
    }

    body.push_str("<table>\n<thead><tr><th>Label</th><th>Machine name</th><th>Style</th><th>Kind</th><th>Locale</th><th>Operations</th></tr></thead>\n<tbody>\n");
    for style in styles {
        let (title, kind, locale) = match inspect_style(&style.file_content) {
            Ok(info) => (info.title.clone(), style_kind(&info), info.default_locale.unwrap_or_default()),
            Err(_) => (String::new(), "unreadable".to_string(), String::new()),
        };
        let _ = writeln!(
            body,
            r#"<tr><td>{label}</td><td>{id}</td><td>{title}</td><td>{kind}</td><td>{locale}</td><td><a href="{base}/{id}/edit">Edit</a> <a href="{base}/{id}/delete">Delete</a></td></tr>"#,
            label = escape_html(&style.label),
            id = escape_html(&style.id),
            title = escape_html(&title),
            kind = escape_html(&kind),
            locale = escape_html(&locale),
            base = COLLECTION_PATH,
        );
    }
    body.push_str("</tbody>\n</table>");
    page("Citation styles", &body)
}

/// `in-text`, `note (citations only)`, `dependent on <parent>`.
fn style_kind(info: &StyleInfo) -> String {
    if info.is_dependent() {
        return format!("dependent on {}", info.parent.as_deref().unwrap_or_default());
    }
    let class = info.class.as_deref().unwrap_or("unknown");
    if info.has_bibliography {
        class.to_string()
    } else {
        format!("{} (citations only)", class)
    }
}

/// Values to prefill the add/edit form with.
#[derive(Debug, Clone, Default)]
pub struct StyleForm<'a> {
    /// Set when editing; the machine name is then fixed.
    pub id: Option<&'a str>,
    pub label: &'a str,
    pub error: Option<&'a str>,
}

pub fn style_form(form: &StyleForm<'_>) -> String {
    let (title, action) = match form.id {
        Some(id) => ("Edit citation style", format!("{}/{}/edit", COLLECTION_PATH, id)),
        None => ("Add citation style", format!("{}/add", COLLECTION_PATH)),
    };
    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    let mut body = String::new();
    if let Some(error) = form.error {
        let _ = writeln!(body, r#"<div class="messages error">{}</div>"#, escape_html(error));
    }
    let _ = writeln!(
        body,
        r#"<form method="post" action="{}" enctype="multipart/form-data">"#,
        escape_html(&action)
    );
    let _ = writeln!(
        body,
        r#"<label for="edit-label">Label</label> <input type="text" id="edit-label" name="label" value="{}" maxlength="255">"#,
        escape_html(form.label)
    );
    match form.id {
        Some(id) => {
            let _ = writeln!(
                body,
                r#"<label for="edit-id">Machine name</label> <input type="text" id="edit-id" name="id" value="{}" readonly>"#,
                escape_html(id)
            );
        }
        None => body.push_str(
            "<label for=\"edit-id\">Machine name</label> <input type=\"text\" id=\"edit-id\" name=\"id\" pattern=\"[a-z0-9_]+\">\n",
        ),
    }
    let _ = writeln!(
        body,
        r#"<label for="edit-file">CSL file</label> <input type="file" id="edit-file" name="file" accept="{}">"#,
        accept
    );
    let _ = writeln!(
        body,
        "<p>Allowed types: {}.</p>",
        ALLOWED_EXTENSIONS.join(" ")
    );
    body.push_str("<button type=\"submit\">Save</button>\n</form>");
    page(title, &body)
}

pub fn delete_confirm(style: &StyleRecord) -> String {
    let body = format!(
        r#"<p>Are you sure you want to delete the citation style {label}? This action cannot be undone.</p>
<form method="post" action="{base}/{id}/delete">
<button type="submit">Delete</button> <a href="{base}">Cancel</a>
</form>"#,
        label = escape_html(&style.label),
        base = COLLECTION_PATH,
        id = escape_html(&style.id),
    );
    page("Delete citation style", &body)
}

/// The embeddable picker: a select list plus the citation region it updates.
pub fn picker_block(view: &PickerView) -> String {
    let endpoint = format!("/items/{}/citation", urlencoding::encode(&view.item_id));

    let mut options = String::new();
    for option in &view.options {
        let selected = if !option.value.is_empty() && view.selected.as_deref() == Some(option.value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            options,
            r#"<option value="{}"{}>{}</option>"#,
            escape_html(&option.value),
            selected,
            escape_html(&option.label)
        );
    }

    format!(
        r#"<div class="citation-picker">
<form class="citation-select" method="post" action="{endpoint}">
<select name="{field}" aria-label="{aria}">
{options}</select>
</form>
<div id="{wrapper}">{fragment}</div>
<script>
(function () {{
  var form = document.currentScript.previousElementSibling.previousElementSibling;
  var select = form.querySelector("select");
  var target = document.getElementById("{wrapper}");
  select.addEventListener("change", function () {{
    var body = new URLSearchParams();
    body.set("{field}", select.value);
    fetch(form.action, {{ method: "POST", body: body }})
      .then(function (response) {{ return response.text(); }})
      .then(function (html) {{ target.innerHTML = html; }});
  }});
}})();
</script>
</div>
"#,
        endpoint = escape_html(&endpoint),
        field = FIELD_NAME,
        aria = ARIA_LABEL,
        options = options,
        wrapper = WRAPPER_ID,
        fragment = view.fragment(),
    )
}
