//! Uses figment::Jail for sandboxed env vars and working directory.

use figment::Jail;
use pretty_assertions::assert_eq;
use tracker_config::{ConfigError, TrackerConfig};

#[test]
fn toml_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tracker.toml",
            r#"
[server]
port = 8080

[pomodoro]
work_minutes = 50
short_break_minutes = 10
"#,
        )?;

        let config = TrackerConfig::load(None).expect("config loads");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pomodoro.work_minutes, 50);
        assert_eq!(config.pomodoro.long_break_minutes, 15);
        Ok(())
    });
}

#[test]
fn explicit_path_replaces_default_file() {
    Jail::expect_with(|jail| {
        jail.create_file("tracker.toml", "[general]\nusers_per_page = 5\n")?;
        jail.create_file("prod.toml", "[general]\nusers_per_page = 50\n")?;

        let config = TrackerConfig::load(Some("prod.toml".as_ref())).expect("config loads");
        assert_eq!(config.general.users_per_page, 50);
        Ok(())
    });
}

#[test]
fn legacy_variables_fill_database_and_admin() {
    Jail::expect_with(|jail| {
        jail.create_file("tracker.toml", "[database]\nurl = \"sqlite://file.db\"\n")?;
        jail.set_env("DATABASE_URL", "sqlite://legacy.db");
        jail.set_env("ADMIN_USERNAME", "root");
        jail.set_env("ADMIN_PASSWORD", "s3cret!");

        let config = TrackerConfig::load(None).expect("config loads");
        assert_eq!(config.database.url, "sqlite://legacy.db");
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.admin.password, "s3cret!");
        assert_eq!(config.admin.email, "admin@neetstudy.com");
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_legacy_variables() {
    Jail::expect_with(|jail| {
        jail.set_env("DATABASE_URL", "sqlite://legacy.db");
        jail.set_env("TRACKER_DATABASE__URL", "sqlite://prefixed.db");
        jail.set_env("TRACKER_GENERAL__REVISION_REMINDER_DAYS", "10");

        let config = TrackerConfig::load(None).expect("config loads");
        assert_eq!(config.database.url, "sqlite://prefixed.db");
        assert_eq!(config.general.revision_reminder_days, 10);
        Ok(())
    });
}

#[test]
fn invalid_values_are_reported() {
    Jail::expect_with(|jail| {
        jail.set_env("TRACKER_POMODORO__WORK_MINUTES", "0");
        let err = TrackerConfig::load(None).expect_err("zero work interval");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        jail.set_env("TRACKER_POMODORO__WORK_MINUTES", "many");
        let err = TrackerConfig::load(None).expect_err("not a number");
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
