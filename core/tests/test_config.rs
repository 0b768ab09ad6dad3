#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use bitframe_core::checksum::ChecksumAlg;
    use bitframe_core::config::{ConfigError, TransportConfig};
    use bitframe_core::types::StreamError;

    #[test]
    fn defaults() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.block_size, 4096);
        assert_eq!(cfg.algorithm, ChecksumAlg::Fletcher32);
        assert_eq!(cfg.max_block_bytes, 32 * 1024);
        assert_eq!(cfg.receive_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.poll_interval(), Duration::from_millis(10));
        assert_eq!(cfg.max_message_bytes, 256 * 1024 * 1024);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = TransportConfig::from_json_str(
            r#"{ "block_size": 8192, "algorithm": "CheckSum16", "receive_timeout_ms": null }"#,
        )
        .unwrap();
        assert_eq!(cfg.block_size, 8192);
        assert_eq!(cfg.algorithm, ChecksumAlg::CheckSum16);
        assert_eq!(cfg.receive_timeout(), None);
        assert_eq!(cfg.poll_interval_ms, 10);

        let opts = cfg.transport_options();
        assert_eq!(opts.timeout, None);
        assert_eq!(opts.max_message_bytes, cfg.max_message_bytes);
    }

    #[test]
    fn json_round_trip() {
        let cfg = TransportConfig {
            block_size: 512,
            algorithm: ChecksumAlg::CheckSum8,
            max_block_bytes: 100,
            receive_timeout_ms: Some(250),
            poll_interval_ms: 1,
            max_message_bytes: 1 << 20,
        };
        let json = cfg.to_json_string().unwrap();
        assert_eq!(TransportConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        for json in [
            r#"{ "block_size": 256 }"#,
            r#"{ "max_block_bytes": 0 }"#,
            r#"{ "max_block_bytes": 32769 }"#,
            r#"{ "poll_interval_ms": 0 }"#,
            r#"{ "max_message_bytes": 0 }"#,
        ] {
            assert!(
                matches!(TransportConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{}",
                json
            );
        }
    }

    #[test]
    fn parse_and_io_errors() {
        assert!(matches!(
            TransportConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            TransportConfig::from_json_str(r#"{ "algorithm": "Crc32" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            TransportConfig::from_json_file("/nonexistent/bitframe.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "block_size": 1024, "poll_interval_ms": 5 }}"#).unwrap();

        let cfg = TransportConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.block_size, 1024);
        assert_eq!(cfg.poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn errors_lift_into_stream_error() {
        let err: StreamError = TransportConfig::from_json_str(r#"{ "block_size": 1 }"#)
            .unwrap_err()
            .into();
        assert!(matches!(err, StreamError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().starts_with("config error: "));
    }
}
