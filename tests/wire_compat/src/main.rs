fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use codectrl_protocol::{Log, RequestResult, RequestStatus};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Parses a fixture into `T`, re-serializes it and compares the JSON
    /// values field by field.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let data = read_fixture(name);
        let fixture: serde_json::Value = serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"));
        let parsed: T = serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  Rust:    {reserialized}"
        );
        parsed
    }

    // --- Log ---

    #[test]
    fn fixture_log() {
        let log: Log = roundtrip_test("log.json");
        assert_eq!(log.stack.len(), 2);
        assert_eq!(log.line_number, log.stack[1].line_number);
        assert_eq!(log.file_name, log.stack[1].file_path);
        let keys: Vec<u32> = log.code_snippet.keys().copied().collect();
        assert_eq!(keys, (21..=27).collect::<Vec<_>>());
        assert!(log.code_snippet[&24].contains("Hello, world!"));
    }

    #[test]
    fn fixture_log_empty_stack() {
        let log: Log = roundtrip_test("log_empty_stack.json");
        assert!(log.stack.is_empty());
        assert!(log.code_snippet.is_empty());
        assert!(log.address.is_empty());
        assert_eq!(log.line_number, 0);
    }

    #[test]
    fn log_without_collector_fields_parses() {
        let json = r#"{
            "stack": [{"lineNumber": 3, "filePath": "/a.rs", "name": "a::f"}],
            "lineNumber": 3,
            "fileName": "/a.rs",
            "codeSnippet": {"3": "f();"},
            "message": "m",
            "messageType": "str",
            "language": "Rust"
        }"#;
        let log: Log = serde_json::from_str(json).unwrap();
        assert!(log.uuid.is_empty());
        assert!(log.warnings.is_empty());
        assert_eq!(log.stack[0].column_number, 0);
        assert!(log.stack[0].code.is_empty());
    }

    // --- RequestResult ---

    #[test]
    fn fixture_request_result_confirmed() {
        let reply: RequestResult = roundtrip_test("request_result_confirmed.json");
        assert_eq!(reply.status, RequestStatus::Confirmed);
        assert!(reply.is_confirmed());
    }

    #[test]
    fn fixture_request_result_error() {
        let reply: RequestResult = roundtrip_test("request_result_error.json");
        assert_eq!(reply.status, RequestStatus::Error);
        assert!(!reply.is_confirmed());
    }

    // --- Framing ---

    #[tokio::test]
    async fn framed_fixture_has_big_endian_length_prefix() {
        let log: Log = serde_json::from_str(&read_fixture("log.json")).unwrap();

        let mut buf = Vec::new();
        codectrl_protocol::write_frame(&mut buf, &log).await.unwrap();

        let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        assert_eq!(len, buf.len() - 4);
        let body: serde_json::Value = serde_json::from_slice(&buf[4..]).unwrap();
        assert_eq!(body["message"], "Hello, world!");

        let mut reader = &buf[..];
        let decoded: Log = codectrl_protocol::read_frame(&mut reader).await.unwrap();
        assert_eq!(decoded, log);
    }
}
