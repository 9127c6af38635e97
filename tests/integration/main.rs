//! Integration tests for Poya

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    const DATASET: &str = r#"[
        {"uid": "duruthu", "summary": "Duruthu Full Moon Poya Day", "categories": ["Public", "Bank", "Poya"], "start": "2024-01-25", "end": "2024-01-26"},
        {"uid": "newyear-eve", "summary": "Day prior to Sinhala and Tamil New Year", "categories": ["Public", "Bank"], "start": "2024-04-12", "end": "2024-04-13"},
        {"uid": "newyear", "summary": "Sinhala and Tamil New Year", "categories": ["Public", "Bank"], "start": "2024-04-13", "end": "2024-04-14"},
        {"uid": "newyear-bank", "summary": "New Year Bank Holiday", "categories": ["Bank"], "start": "2024-04-13", "end": "2024-04-14"}
    ]"#;

    /// Temp workspace with a 2024 dataset and a cache-less config
    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let data = temp.path().join("json");
            std::fs::create_dir(&data).unwrap();
            std::fs::write(data.join("2024.json"), DATASET).unwrap();
            std::fs::write(data.join("2023.json"), "{not json").unwrap();
            std::fs::write(
                temp.path().join("config.toml"),
                "[cache]\nbackend = \"none\"\n",
            )
            .unwrap();
            Self { temp }
        }

        fn root(&self) -> &Path {
            self.temp.path()
        }

        fn poya(&self) -> Command {
            let mut cmd = poya();
            cmd.arg("--config")
                .arg(self.root().join("config.toml"))
                .arg("--data-dir")
                .arg(self.root().join("json"));
            cmd
        }
    }

    fn poya() -> Command {
        let mut cmd = cargo_bin_cmd!("poya");
        for var in [
            "API_KEYS",
            "REDIS_URL",
            "POYA_CONFIG",
            "POYA_DATA_DIR",
            "POYA_BIND",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    #[test]
    fn help_displays() {
        poya()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Holiday lookup service"));
    }

    #[test]
    fn version_displays() {
        poya()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("poya"));
    }

    #[test]
    fn check_holiday_json() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["check", "2024", "1", "25", "--output", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""response": true"#))
            .stdout(predicate::str::contains("2024-01-25"));
    }

    #[test]
    fn check_ordinary_day_table() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["check", "2024", "1", "26"])
            .assert()
            .success()
            .stdout(predicate::str::contains("is not a holiday"));
    }

    #[test]
    fn info_lists_every_match() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["info", "2024", "4", "13", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""count": 2"#))
            .stdout(predicate::str::contains("New Year Bank Holiday"))
            .stdout(predicate::str::contains("deprecated_warning").not());
    }

    #[test]
    fn info_single_match_has_legacy_fields() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["info", "2024", "4", "12", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("deprecated_warning"))
            .stdout(predicate::str::contains(r#""week": "15""#))
            .stdout(predicate::str::contains(r#""day": "Friday""#));
    }

    #[test]
    fn info_table_shows_names() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["info", "2024", "4", "13"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Sinhala and Tamil New Year"))
            .stdout(predicate::str::contains("2 holiday(s)"));
    }

    #[test]
    fn invalid_date_fails() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["info", "2024", "2", "30"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid date"));
    }

    #[test]
    fn year_out_of_range_fails() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["check", "2019", "1", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("outside the supported range"));
    }

    #[test]
    fn missing_year_fails_with_hint() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["list", "2025"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not available"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn corrupt_year_fails() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["list", "2023"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid data format"));
    }

    #[test]
    fn list_simple_json() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["list", "2024", "--month", "4", "--format", "simple", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2024-04-12"))
            .stdout(predicate::str::contains("2024-04-13"))
            .stdout(predicate::str::contains("2024-01-25").not());
    }

    #[test]
    fn list_filters_by_category() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["list", "2024", "--type", "poya"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Duruthu"))
            .stdout(predicate::str::contains("1 holiday(s)"));
    }

    #[test]
    fn list_rejects_unknown_format() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["list", "2024", "--format", "xml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid format"));
    }

    #[test]
    fn coverage_reports_both_states() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["coverage", "2024", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""coverage": "ok""#));
        fixture
            .poya()
            .args(["coverage", "2026", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("not available"));
    }

    #[test]
    fn status_reports_degraded_cache() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["status", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""cache_connected": false"#))
            .stdout(predicate::str::contains("api_key_validation").not());
    }

    #[test]
    fn config_path() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_hides_keys() {
        let fixture = Fixture::new();
        fixture
            .poya()
            .env("API_KEYS", "secret-one,secret-two")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[server]"))
            .stdout(predicate::str::contains("2 key(s) hidden"))
            .stdout(predicate::str::contains("secret-one").not());
    }

    #[test]
    fn invalid_config_fails() {
        let fixture = Fixture::new();
        let path = fixture.root().join("broken.toml");
        std::fs::write(&path, "[data]\nyear_min = 2030\nyear_max = 2020\n").unwrap();
        poya()
            .arg("--config")
            .arg(&path)
            .args(["status"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn completions_generate() {
        poya()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("poya"));
    }
}
