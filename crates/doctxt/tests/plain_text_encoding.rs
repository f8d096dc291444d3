//! Plain-text decoding: UTF-8, Korean legacy encodings and lossy fallback.

use doctxt::{ConversionConfig, ConversionPipeline, Diagnostic, Format, get_conversion_pipeline};

#[test]
fn test_korean_utf8() {
    let result = get_conversion_pipeline().convert("안녕하세요".as_bytes(), "test.txt");
    assert_eq!(result.text.as_deref(), Some("안녕하세요"));
    assert!(result.error.is_none());
    assert_eq!(result.format, Some(Format::PlainText));
}

#[test]
fn test_utf8_bom_is_stripped() {
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice("머리말".as_bytes());

    let result = get_conversion_pipeline().convert(&content, "bom.txt");
    assert_eq!(result.text.as_deref(), Some("머리말"));
}

#[test]
fn test_cp949_fallback() {
    let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode("한국어 인코딩 테스트");
    assert!(!had_errors);

    let result = get_conversion_pipeline().convert(&bytes, "legacy.csv");
    assert_eq!(result.text.as_deref(), Some("한국어 인코딩 테스트"));
    assert_eq!(result.encoding.as_deref(), Some("EUC-KR"));
    assert!(!result.has_diagnostic(Diagnostic::LossyDecode));
}

#[test]
fn test_malformed_bytes_do_not_fail() {
    let result = get_conversion_pipeline().convert(b"\xff\xfe\x00\x01invalid", "bad.txt");
    assert!(result.error.is_none());
    let text = result.text.unwrap();
    assert!(text.contains("invalid"));
}

#[test]
fn test_undecodable_input_is_lossy() {
    let result = get_conversion_pipeline().convert(b"abc\xff\xffdef", "broken.log");
    assert!(result.error.is_none());
    assert!(result.has_diagnostic(Diagnostic::LossyDecode));

    let text = result.text.unwrap();
    assert!(text.starts_with("abc"));
    assert!(text.ends_with("def"));
}

#[test]
fn test_configured_fallback_chain() {
    let mut config = ConversionConfig::default();
    config.text.fallback_encodings = vec!["shift_jis".to_string()];
    let pipeline = ConversionPipeline::new(config).unwrap();

    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("日本語のテキスト");
    let result = pipeline.convert(&bytes, "jp.txt");
    assert_eq!(result.text.as_deref(), Some("日本語のテキスト"));
    assert_eq!(result.encoding.as_deref(), Some("Shift_JIS"));
}

#[test]
fn test_empty_file_is_success_with_diagnostic() {
    let result = get_conversion_pipeline().convert(b"", "empty.txt");
    assert_eq!(result.text.as_deref(), Some(""));
    assert!(result.error.is_none());
    assert!(result.has_diagnostic(Diagnostic::EmptyText));
}

#[test]
fn test_structured_text_extensions_pass_through() {
    let pipeline = get_conversion_pipeline();
    let json = r#"{"name": "홍길동", "age": 30}"#.as_bytes();
    let result = pipeline.convert(json, "person.JSON");
    assert_eq!(result.text.as_deref(), Some(r#"{"name": "홍길동", "age": 30}"#));

    let result = pipeline.convert(b"key: value\n", "config.yml");
    assert_eq!(result.text.as_deref(), Some("key: value\n"));
}
