//! Tests for form-data body decoding.

use hearth::http::{extract_multipart_boundary, parse_form_data, FormDataError, Method, Request};

#[test]
fn urlencoded_decodes_simple_pairs() {
    let form = parse_form_data(
        Some("application/x-www-form-urlencoded"),
        b"a=1&b=two",
    )
    .unwrap();

    assert_eq!(form.len(), 2);
    assert_eq!(form.get("a").unwrap().text(), "1");
    assert_eq!(form.get("b").unwrap().text(), "two");
}

#[test]
fn urlencoded_decodes_plus_and_percent_escapes() {
    let form = parse_form_data(
        Some("application/x-www-form-urlencoded"),
        b"name=ada+lovelace&sym=%24",
    )
    .unwrap();

    assert_eq!(form.get("name").unwrap().text(), "ada lovelace");
    assert_eq!(form.get("sym").unwrap().text(), "$");
}

#[test]
fn urlencoded_passes_invalid_escapes_through() {
    let form = parse_form_data(Some("application/x-www-form-urlencoded"), b"v=%zz%4").unwrap();

    assert_eq!(form.get("v").unwrap().text(), "%zz%4");
}

#[test]
fn urlencoded_tolerates_garbage_body() {
    let form = parse_form_data(
        Some("application/x-www-form-urlencoded"),
        b"$rofl this is totally invalid$",
    )
    .unwrap();

    // a segment without '=' becomes a field with an empty value
    assert_eq!(form.len(), 1);
    assert_eq!(
        form.get("$rofl this is totally invalid$").unwrap().text(),
        ""
    );
}

#[test]
fn urlencoded_empty_body_is_empty_form() {
    let form = parse_form_data(Some("application/x-www-form-urlencoded"), b"").unwrap();
    assert!(form.is_empty());
}

#[test]
fn urlencoded_repeated_names_keep_order() {
    let form = parse_form_data(
        Some("application/x-www-form-urlencoded"),
        b"tag=a&tag=b&tag=c",
    )
    .unwrap();

    let tags: Vec<_> = form.get_all("tag").iter().map(|f| f.text()).collect();
    assert_eq!(tags, vec!["a", "b", "c"]);
}

#[test]
fn form_data_collection_api() {
    let mut form = hearth::FormData::new();
    assert!(form.is_empty());

    form.insert("topping", "mushroom");
    form.insert("topping", "olive");

    assert_eq!(form.len(), 2);
    assert_eq!(form.get("topping").unwrap().text(), "mushroom");
    assert_eq!(form.get_all("topping").len(), 2);
    assert_eq!(form.iter().count(), 2);
}

#[test]
fn boundary_extracted_from_content_type() {
    assert_eq!(
        extract_multipart_boundary("multipart/form-data; boundary=abc123"),
        Some("abc123".to_string())
    );
}

#[test]
fn boundary_extracted_when_quoted() {
    assert_eq!(
        extract_multipart_boundary("multipart/form-data; boundary=\"my-boundary\""),
        Some("my-boundary".to_string())
    );
}

#[test]
fn boundary_parameter_is_case_insensitive() {
    assert_eq!(
        extract_multipart_boundary("multipart/form-data; BOUNDARY=abc"),
        Some("abc".to_string())
    );
}

#[test]
fn boundary_missing_or_empty_is_none() {
    assert_eq!(extract_multipart_boundary("multipart/form-data"), None);
    assert_eq!(
        extract_multipart_boundary("multipart/form-data; boundary="),
        None
    );
}

#[test]
fn multipart_decodes_fields_and_file_part() {
    let body = b"--abc\r\n\
        Content-Disposition: form-data; name=\"field1\"\r\n\
        \r\n\
        value1\r\n\
        --abc\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        hello\r\n\
        --abc--\r\n";

    let form = parse_form_data(Some("multipart/form-data; boundary=abc"), body).unwrap();

    assert_eq!(form.len(), 2);
    assert_eq!(form.get("field1").unwrap().text(), "value1");

    let file = form.get("file").unwrap();
    assert_eq!(file.text(), "hello");
    assert_eq!(file.filename.as_deref(), Some("a.txt"));
    assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    assert!(file.is_file());
}

#[test]
fn multipart_without_matching_delimiter_is_empty_form() {
    let form = parse_form_data(
        Some("multipart/form-data; boundary=abc"),
        b"$rofl this is totally invalid$",
    )
    .unwrap();

    assert!(form.is_empty());
}

#[test]
fn multipart_without_boundary_parameter_is_empty_form() {
    let form = parse_form_data(
        Some("multipart/form-data"),
        b"$rofl this is totally invalid$",
    )
    .unwrap();

    assert!(form.is_empty());
}

#[test]
fn multipart_truncated_body_keeps_decoded_fields() {
    let body = b"--abc\r\n\
        Content-Disposition: form-data; name=\"a\"\r\n\
        \r\n\
        1\r\n\
        --abc\r\n\
        Content-Disposition: form-data; name=\"b\"\r\n\
        \r\n\
        partial";

    let form = parse_form_data(Some("multipart/form-data; boundary=abc"), body).unwrap();

    assert_eq!(form.len(), 2);
    assert_eq!(form.get("a").unwrap().text(), "1");
    assert_eq!(form.get("b").unwrap().text(), "partial");
}

#[test]
fn multipart_part_without_name_is_skipped() {
    let body = b"--abc\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        orphan\r\n\
        --abc--\r\n";

    let form = parse_form_data(Some("multipart/form-data; boundary=abc"), body).unwrap();

    assert!(form.is_empty());
}

#[test]
fn json_content_type_is_rejected() {
    let err = parse_form_data(Some("application/json"), b"").unwrap_err();
    assert_eq!(
        err,
        FormDataError::UnsupportedMediaType("application/json".to_string())
    );
    assert!(err.to_string().contains("not a form encoding"));
}

#[test]
fn missing_content_type_is_rejected() {
    let err = parse_form_data(None, b"a=1").unwrap_err();
    assert_eq!(err, FormDataError::MissingContentType);
}

#[test]
fn request_form_data_matches_header_case_insensitively() {
    let request = Request::new(Method::Post, "/")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("a=1");

    let form = request.form_data().unwrap();
    assert_eq!(form.get("a").unwrap().text(), "1");
}

#[test]
fn request_without_body_decodes_to_empty_form() {
    let request = Request::new(Method::Post, "/")
        .header("content-type", "application/x-www-form-urlencoded");

    let form = request.form_data().unwrap();
    assert!(form.is_empty());
}
