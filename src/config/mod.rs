//! Configuration for codelint.
//!
//! ```toml
//! [server]
//! transport = "streamable-http"
//! host = "127.0.0.1"
//! port = 8001
//!
//! [analysis]
//! timeout_seconds = 60
//! parallel = true
//! source_suffix = ".py"
//!
//! [[analyzers]]
//! name = "flake8"
//! command = ["flake8"]
//! ```

mod core;
mod loader;
pub mod server;

pub use self::core::{default_analyzers, AnalysisSettings, AnalyzerEntry, CodeLintConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
};
pub use server::{ServerConfig, ServerSettings, Transport};

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CodeLintConfig::default());
        assert!(config.analysis.parallel);
        assert_eq!(config.analysis.source_suffix, ".py");
        assert!(config.analysis.include_defaults);
        assert_eq!(config.analysis.timeout(), None);
        assert_eq!(config.server.resolve(), ServerConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(indoc! {r#"
            [server]
            transport = "sse"
            host = "127.0.0.1"
            port = 9100

            [analysis]
            timeout_seconds = 30
            parallel = false
            source_suffix = ".rs"
            include_defaults = false

            [[analyzers]]
            name = "flake8"
            command = ["flake8", "--select=E9"]

            [[analyzers]]
            name = "mypy"
            command = ["mypy"]
        "#})
        .unwrap();

        let server = config.server.resolve();
        assert_eq!(server.transport, Transport::Sse);
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(9100));

        assert_eq!(config.analysis.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.analysis.parallel);
        assert_eq!(config.analysis.source_suffix, ".rs");
        assert!(!config.analysis.include_defaults);

        let names: Vec<_> = config.analyzers.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["flake8", "mypy"]);
        assert_eq!(config.analyzers[0].command, vec!["flake8", "--select=E9"]);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = parse_config("[analysis]\ntimeout_seconds = 0\n").unwrap();
        assert_eq!(config.analysis.timeout(), None);
    }

    #[test]
    fn test_malformed_config_is_error() {
        let err = parse_config("[analysis\nparallel = ").unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_config_searches_ancestors() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[analysis]\nparallel = false\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(nested);
        assert!(!config.analysis.parallel);
    }

    #[test]
    fn test_load_explicit_invalid_file_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert_eq!(load_config(Some(&path)), CodeLintConfig::default());
    }

    #[test]
    fn test_load_config_search_stops_after_ten_directories() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[analysis]\nparallel = false\n",
        )
        .unwrap();

        let mut nested = root.path().to_path_buf();
        for level in 0..10 {
            nested.push(format!("d{}", level));
        }
        std::fs::create_dir_all(&nested).unwrap();

        // 9 levels down the root is the tenth directory searched
        assert!(!load_config_from(nested.parent().unwrap().to_path_buf()).analysis.parallel);
        assert!(load_config_from(nested).analysis.parallel);
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors("/a/b/c/d".into(), 2).collect();
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn test_default_analyzer_is_errors_only_pylint() {
        let defaults = default_analyzers();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].name, "pylint");
        assert_eq!(defaults[0].command, vec!["pylint", "-E"]);
    }
}
