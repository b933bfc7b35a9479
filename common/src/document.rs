//! TGML文書モジュール
//!
//! quick-xml で要素を文書順に読み取り、各要素の Name 属性値の位置を記録する。
//! 書き換えは元のテキストへの差し込みで行うため、変更箇所以外はバイト単位で保持される。

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;

/// 書き換え対象の属性名
pub const NAME_ATTRIBUTE: &str = "Name";

/// 宣言がない文書に付与する XML 宣言
pub const DEFAULT_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

/// 文書中の開始タグ / 空要素タグ1つ
#[derive(Debug, Clone)]
pub struct Element {
    /// タグ名
    pub tag: String,
    /// Name 属性（実体参照は展開済み）
    pub name: Option<String>,
    /// Name 属性値の位置（引用符は含まない）
    name_span: Option<Range<usize>>,
    /// 属性を追加する場合の差し込み位置（タグ内容の末尾）
    insert_at: usize,
}

#[derive(Debug, Clone)]
struct Edit {
    span: Range<usize>,
    text: String,
}

/// 解析済みTGML文書
#[derive(Debug, Clone)]
pub struct TgmlDocument {
    source: String,
    elements: Vec<Element>,
    edits: Vec<Edit>,
    has_declaration: bool,
}

impl TgmlDocument {
    /// バイト列から解析（UTF-8のみ）
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| Error::Parse(format!("document is not valid UTF-8: {}", e)))?;
        Self::parse(source)
    }

    /// 文字列から解析
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        let mut elements = Vec::new();
        let mut has_declaration = false;
        let mut depth = 0usize;
        let mut root_closed = false;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                Error::Parse(format!(
                    "{} (at byte {})",
                    e,
                    reader.error_position()
                ))
            })?;
            let after = reader.buffer_position() as usize;

            match event {
                Event::Decl(_) => has_declaration = true,
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if root_closed {
                        return Err(Error::Parse(format!(
                            "content after the root element (at byte {})",
                            before
                        )));
                    }
                    elements.push(read_element(source, e, before..after)?);
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                    } else if depth == 0 {
                        root_closed = true;
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        root_closed = true;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(Error::Parse("unexpected end of document: unclosed element".into()));
        }
        if elements.is_empty() {
            return Err(Error::Parse("no element found".into()));
        }

        Ok(Self {
            source: source.to_string(),
            elements,
            edits: Vec::new(),
            has_declaration,
        })
    }

    /// 全要素（文書順）
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn has_declaration(&self) -> bool {
        self.has_declaration
    }

    /// 要素の Name 属性を書き換える
    ///
    /// 現在値と同じなら何もせず `false` を返す。属性がなければ追加する。
    pub fn set_name(&mut self, index: usize, value: &str) -> bool {
        let Some(element) = self.elements.get_mut(index) else {
            return false;
        };
        if element.name.as_deref() == Some(value) {
            return false;
        }

        let escaped = quick_xml::escape::escape(value);
        let edit = match &element.name_span {
            Some(span) => Edit {
                span: span.clone(),
                text: escaped.into_owned(),
            },
            None => Edit {
                span: element.insert_at..element.insert_at,
                text: format!(" {}=\"{}\"", NAME_ATTRIBUTE, escaped),
            },
        };

        // 同じ要素への再書き込みは後勝ち
        self.edits.retain(|e| e.span != edit.span);
        self.edits.push(edit);
        element.name = Some(value.to_string());
        true
    }

    /// 変更のある要素数
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// 書き換えを反映した文書を返す
    pub fn serialize(&self, ensure_declaration: bool) -> String {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by_key(|e| e.span.start);

        let mut out = String::with_capacity(self.source.len() + 64);
        if ensure_declaration && !self.has_declaration {
            out.push_str(DEFAULT_DECLARATION);
        }

        let mut cursor = 0;
        for edit in edits {
            out.push_str(&self.source[cursor..edit.span.start]);
            out.push_str(&edit.text);
            cursor = edit.span.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

fn read_element(
    source: &str,
    start: &BytesStart,
    event_span: Range<usize>,
) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let name = start
        .try_get_attribute(NAME_ATTRIBUTE)
        .map_err(|e| Error::Parse(format!("invalid attribute in <{}>: {}", tag, e)))?
        .map(|attr| attr.unescape_value().map(|v| v.into_owned()))
        .transpose()
        .map_err(|e| Error::Parse(format!("invalid Name in <{}>: {}", tag, e)))?;

    // タグ内容（< と > の間、空要素の / は除く）の元テキスト上の位置
    let raw = std::str::from_utf8(start)
        .map_err(|e| Error::Parse(format!("invalid UTF-8 in <{}>: {}", tag, e)))?;
    let window = &source[event_span.clone()];
    let offset = window
        .rfind(raw)
        .ok_or_else(|| Error::Parse(format!("cannot locate <{}> in source", tag)))?;
    let content_start = event_span.start + offset;
    let content_end = content_start + raw.len();

    let name_span = match &name {
        Some(_) => {
            let local = attribute_value_span(raw, NAME_ATTRIBUTE).ok_or_else(|| {
                Error::Parse(format!("cannot locate Name attribute in <{}>", tag))
            })?;
            Some(content_start + local.start..content_start + local.end)
        }
        None => None,
    };

    Ok(Element {
        tag,
        name,
        name_span,
        insert_at: content_end,
    })
}

/// タグ内容から属性値（引用符の内側）の位置を探す
fn attribute_value_span(raw: &str, key: &str) -> Option<Range<usize>> {
    let bytes = raw.as_bytes();
    let mut pos = bytes.iter().position(|b| b.is_ascii_whitespace())?;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return None;
        }

        let key_start = pos;
        while pos < bytes.len() && bytes[pos] != b'=' && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let found = &raw[key_start..pos];

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'=') {
            return None;
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let quote = *bytes.get(pos)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let value_start = pos + 1;
        let value_len = bytes[value_start..].iter().position(|b| *b == quote)?;
        let value_end = value_start + value_len;

        if found == key {
            return Some(value_start..value_end);
        }
        pos = value_end + 1;
    }
}
