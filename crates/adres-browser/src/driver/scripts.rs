//! JavaScript snippets evaluated in the page.
//!
//! Every snippet runs through [`in_document`], which binds `doc` to the
//! document of the context it is evaluated in. The driver picks that context
//! per [`Focus`](super::Focus), so snippets never reach across frames.
//! Arguments are embedded as JSON literals.

use serde_json::Value;

fn literal(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Wrap `body` so it runs as a function over `doc`.
pub(super) fn in_document(body: &str) -> String {
    format!(
        r#"(() => {{
  const doc = document;
  {body}
}})()"#,
        body = body,
    )
}

pub(super) fn element_exists(id: &str) -> String {
    format!("return !!doc.getElementById({});", literal(id))
}

pub(super) fn element_interactable(id: &str) -> String {
    format!(
        r#"const el = doc.getElementById({id});
  if (!el || el.disabled) return false;
  const rect = el.getBoundingClientRect();
  if (rect.width === 0 || rect.height === 0) return false;
  const style = doc.defaultView.getComputedStyle(el);
  return style.visibility !== 'hidden' && style.display !== 'none';"#,
        id = literal(id)
    )
}

/// Returns `"ok"`, `"missing"` or `"no-option"`.
pub(super) fn select_option(id: &str, value: &str) -> String {
    format!(
        r#"const el = doc.getElementById({id});
  if (!el) return 'missing';
  const value = {value};
  const option = Array.from(el.options || []).find(o => o.value === value);
  if (!option) return 'no-option';
  el.value = value;
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return 'ok';"#,
        id = literal(id),
        value = literal(value)
    )
}

pub(super) fn clear(id: &str) -> String {
    format!(
        r#"const el = doc.getElementById({id});
  if (!el) return false;
  el.focus();
  el.value = '';
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  return true;"#,
        id = literal(id)
    )
}

/// Scroll the element into view and return its center in the viewport of
/// its own document: `null` when missing, `{x, y, visible}` otherwise.
/// Scrolling propagates to the embedding documents.
pub(super) fn click_point(id: &str) -> String {
    format!(
        r#"const el = doc.getElementById({id});
  if (!el) return null;
  el.scrollIntoView({{ block: 'center', inline: 'center' }});
  const rect = el.getBoundingClientRect();
  return {{
    x: rect.left + rect.width / 2,
    y: rect.top + rect.height / 2,
    visible: rect.width > 0 && rect.height > 0,
  }};"#,
        id = literal(id)
    )
}

pub(super) fn body_present() -> String {
    "return !!doc.body;".to_string()
}

/// Rendered text only: script, style and hidden elements do not count.
pub(super) fn text_contains(phrase: &str) -> String {
    format!(
        "return !!doc.body && doc.body.innerText.includes({});",
        literal(phrase)
    )
}

pub(super) fn tables() -> String {
    r#"return Array.from(doc.querySelectorAll('table')).map(t => ({
    rows: Array.from(t.rows).map(r => ({
      cells: Array.from(r.cells).map(c => ({ kind: c.tagName.toLowerCase(), text: c.innerText || '' }))
    }))
  }));"#
        .to_string()
}
