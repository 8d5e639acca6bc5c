use rstest::rstest;

use super::*;

const REQUIRED: [(&str, Option<&str>); 4] = [
    ("ITEMSYNC__DATABASE__URL", Some("postgres://env@localhost/items")),
    ("ITEMSYNC__EMAIL__SMTP_HOST", Some("smtp.env.local")),
    ("ITEMSYNC__EMAIL__FROM_EMAIL", Some("etl@example.com")),
    ("ITEMSYNC__EMAIL__RECIPIENTS", Some("ops@example.com")),
];

fn email(recipients: &str) -> EmailConfig {
    EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: None,
        smtp_password: String::new(),
        security: SmtpSecurity::None,
        from_email: "etl@example.com".to_string(),
        from_name: "Itemsync".to_string(),
        recipients: recipients.to_string(),
    }
}

#[test]
fn test_defaults_apply_when_only_required_keys_are_set() {
    temp_env::with_vars(REQUIRED, || {
        let config = AppConfig::load().expect("config should load");

        assert_eq!(config.database.url, "postgres://env@localhost/items");
        assert_eq!(config.database.command_timeout_secs, 1200);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.fetch.retry_delay(), Duration::ZERO);
        assert_eq!(config.bulk_load.batch_size, 50_000);
        assert_eq!(config.bulk_load.batch_timeout(), Duration::from_secs(10));
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.email.security, SmtpSecurity::Starttls);
        assert_eq!(config.report.subject, "Expense item bulk load");
    });
}

#[test]
fn test_environment_values_are_parsed() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("ITEMSYNC__FETCH__MAX_RETRIES", Some("7")));
    vars.push(("ITEMSYNC__EMAIL__SECURITY", Some("tls")));

    temp_env::with_vars(vars, || {
        let config = AppConfig::load().expect("config should load");

        assert_eq!(config.fetch.max_retries, 7);
        assert_eq!(config.email.security, SmtpSecurity::Tls);
    });
}

#[test]
fn test_explicit_overrides_win_over_environment() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("ITEMSYNC__FETCH__MAX_RETRIES", Some("7")));

    temp_env::with_vars(vars, || {
        let overrides = ConfigOverrides {
            database_url: Some("postgres://cli@localhost/items".to_string()),
            max_retries: Some(1),
            smtp_port: Some(2525),
            recipients: Some("a@example.com;b@example.com".to_string()),
            ..ConfigOverrides::default()
        };
        let config = AppConfig::load_with(&overrides).expect("config should load");

        assert_eq!(config.database.url, "postgres://cli@localhost/items");
        assert_eq!(config.fetch.max_retries, 1);
        assert_eq!(config.email.smtp_port, 2525);
        assert_eq!(config.email.smtp_host, "smtp.env.local");
        assert_eq!(
            config.email.recipient_list(),
            vec!["a@example.com", "b@example.com"]
        );
    });
}

#[test]
fn test_missing_database_url_is_an_error() {
    temp_env::with_vars(
        [
            ("ITEMSYNC__DATABASE__URL", None),
            ("ITEMSYNC__EMAIL__SMTP_HOST", Some("smtp.env.local")),
            ("ITEMSYNC__EMAIL__FROM_EMAIL", Some("etl@example.com")),
            ("ITEMSYNC__EMAIL__RECIPIENTS", Some("ops@example.com")),
        ],
        || {
            assert!(AppConfig::load().is_err());
        },
    );
}

#[rstest]
#[case("ops@example.com", vec!["ops@example.com"])]
#[case("a@example.com;b@example.com", vec!["a@example.com", "b@example.com"])]
#[case(" a@example.com ; ;b@example.com;", vec!["a@example.com", "b@example.com"])]
#[case("", vec![])]
fn test_recipient_list_splits_on_semicolons(#[case] raw: &str, #[case] expected: Vec<&str>) {
    assert_eq!(email(raw).recipient_list(), expected);
}

#[test]
fn test_login_falls_back_to_sender() {
    let mut config = email("ops@example.com");
    assert_eq!(config.login(), "etl@example.com");

    config.smtp_username = Some("relay-user".to_string());
    assert_eq!(config.login(), "relay-user");
}
