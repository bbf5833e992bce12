//! Form-data body parsing for hearth requests.
//!
//! Decodes a request body according to its declared content-type into a
//! [`FormData`] field collection. The urlencoded and multipart decoders are
//! deliberately lenient: garbage input produces an empty or partial form
//! rather than an error, so a handler calling [`crate::http::Request::form_data`]
//! only sees an `Err` when the content-type itself is not a form encoding.

use bytes::Bytes;

/// A single decoded form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name from the urlencoded key or multipart Content-Disposition.
    pub name: String,
    /// Raw field payload.
    pub value: Bytes,
    /// Filename, for multipart file parts.
    pub filename: Option<String>,
    /// Per-part content type, for multipart parts that declare one.
    pub content_type: Option<String>,
}

impl FormField {
    /// Get the field payload as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).to_string()
    }

    /// Whether this field carries an uploaded file.
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// An ordered collection of decoded form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<FormField>,
}

impl FormData {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, field: FormField) {
        self.fields.push(field);
    }

    /// Append a simple text field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Bytes>) {
        self.fields.push(FormField {
            name: name.into(),
            value: value.into(),
            filename: None,
            content_type: None,
        });
    }

    /// Get the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all fields with the given name, in order of appearance.
    pub fn get_all(&self, name: &str) -> Vec<&FormField> {
        self.fields.iter().filter(|f| f.name == name).collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields in order of appearance.
    pub fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter()
    }
}

/// Error raised when a request body cannot be decoded as form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataError {
    /// The request carried no content-type header.
    MissingContentType,
    /// The declared media type is not a form encoding.
    UnsupportedMediaType(String),
}

impl std::fmt::Display for FormDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormDataError::MissingContentType => {
                write!(f, "missing content-type header")
            }
            FormDataError::UnsupportedMediaType(media_type) => {
                write!(f, "content type '{}' is not a form encoding", media_type)
            }
        }
    }
}

impl std::error::Error for FormDataError {}

/// Decode a request body according to its declared content-type.
///
/// Dispatches on the media type:
/// - `application/x-www-form-urlencoded` bodies are decoded leniently and
///   never fail; malformed segments become fields with empty values.
/// - `multipart/form-data` bodies are decoded leniently; a missing boundary
///   parameter or a body without a matching delimiter yields an empty form,
///   and a truncated body keeps the fields decoded so far.
/// - Any other media type is an error.
pub fn parse_form_data(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<FormData, FormDataError> {
    let header = content_type.ok_or(FormDataError::MissingContentType)?;
    let media_type = header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        "application/x-www-form-urlencoded" => Ok(parse_urlencoded(body)),
        "multipart/form-data" => Ok(parse_multipart(header, body)),
        _ => Err(FormDataError::UnsupportedMediaType(media_type)),
    }
}

/// Extract the boundary parameter from a multipart content-type header.
///
/// Handles quoted and unquoted values. Returns `None` when the parameter is
/// absent or empty.
pub fn extract_multipart_boundary(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("boundary") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

fn parse_urlencoded(body: &[u8]) -> FormData {
    let mut form = FormData::new();

    for pair in body.split(|&b| b == b'&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = match pair.iter().position(|&b| b == b'=') {
            Some(idx) => (&pair[..idx], &pair[idx + 1..]),
            None => (pair, &pair[..0]),
        };
        form.push(FormField {
            name: String::from_utf8_lossy(&percent_decode(name)).to_string(),
            value: Bytes::from(percent_decode(value)),
            filename: None,
            content_type: None,
        });
    }

    form
}

fn parse_multipart(header: &str, body: &[u8]) -> FormData {
    let mut form = FormData::new();

    let Some(boundary) = extract_multipart_boundary(header) else {
        return form;
    };
    let delimiter = format!("--{}", boundary);
    let delimiter = delimiter.as_bytes();

    let mut pos = match find(body, delimiter, 0) {
        Some(idx) => idx + delimiter.len(),
        None => return form,
    };

    loop {
        // `--` after the delimiter closes the stream
        if body[pos..].starts_with(b"--") {
            break;
        }
        let part_start = match find(body, b"\r\n", pos) {
            Some(idx) => idx + 2,
            None => break,
        };
        let (part, next) = match find(body, delimiter, part_start) {
            Some(idx) => (&body[part_start..idx], Some(idx + delimiter.len())),
            // truncated body: keep what decoded so far
            None => (&body[part_start..], None),
        };
        if let Some(field) = parse_part(part) {
            form.push(field);
        }
        match next {
            Some(idx) => pos = idx,
            None => break,
        }
    }

    form
}

/// Decode one multipart section: headers up to a blank line, then payload.
/// Sections without a blank line or a field name are skipped.
fn parse_part(part: &[u8]) -> Option<FormField> {
    let header_end = find(part, b"\r\n\r\n", 0)?;
    let mut value = &part[header_end + 4..];
    if value.ends_with(b"\r\n") {
        value = &value[..value.len() - 2];
    }

    let headers = String::from_utf8_lossy(&part[..header_end]);
    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    for line in headers.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let rest = rest.trim();
        if key.trim().eq_ignore_ascii_case("content-disposition") {
            for param in rest.split(';').skip(1) {
                if let Some((param_key, param_value)) = param.split_once('=') {
                    let param_value = param_value.trim().trim_matches('"').to_string();
                    match param_key.trim().to_ascii_lowercase().as_str() {
                        "name" => name = Some(param_value),
                        "filename" => filename = Some(param_value),
                        _ => {}
                    }
                }
            }
        } else if key.trim().eq_ignore_ascii_case("content-type") {
            content_type = Some(rest.to_string());
        }
    }

    Some(FormField {
        name: name?,
        value: Bytes::copy_from_slice(value),
        filename,
        content_type,
    })
}

/// Decode percent-escapes and `+`; invalid escapes pass through literally.
fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < input.len() => {
                match (hex_value(input[i + 1]), hex_value(input[i + 2])) {
                    (Some(high), Some(low)) => {
                        out.push(high << 4 | low);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|idx| idx + from)
}
