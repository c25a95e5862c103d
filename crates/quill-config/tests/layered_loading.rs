//! Integration tests for layered configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

#[test]
fn defaults_without_files() {
    Jail::expect_with(|_jail| {
        let config = QuillConfig::load().expect("config loads");
        assert_eq!(config.database.path, ".quill/audit-log.db");
        assert_eq!(config.general.export_limit, 999_999_999);
        Ok(())
    });
}

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/quill/audit.db"

[writer]
queue_capacity = 8

[general]
default_limit = 25
"#,
        )?;

        let config: QuillConfig = Figment::from(Serialized::defaults(QuillConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/quill/audit.db");
        assert_eq!(config.writer.queue_capacity, 8);
        assert_eq!(config.general.default_limit, 25);
        assert_eq!(config.general.export_limit, 999_999_999);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".quill")?;
        jail.create_file(".quill/config.toml", "[database]\npath = \":memory:\"\n")?;

        let config = QuillConfig::load().expect("config loads");
        assert!(config.database.is_in_memory());
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".quill")?;
        jail.create_file(".quill/config.toml", "[writer]\nqueue_capacity = 8\n")?;
        jail.set_env("QUILL_WRITER__QUEUE_CAPACITY", "64");
        jail.set_env("QUILL_DATABASE__PATH", "env.db");

        let config = QuillConfig::load().expect("config loads");
        assert_eq!(config.writer.queue_capacity, 64);
        assert_eq!(config.database.path, "env.db");
        Ok(())
    });
}

#[test]
fn invalid_env_value_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("QUILL_GENERAL__DEFAULT_LIMIT", "0");
        let err = QuillConfig::load().unwrap_err();
        assert!(err.to_string().contains("general.default_limit"));
        Ok(())
    });
}
