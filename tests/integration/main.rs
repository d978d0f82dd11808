//! Integration tests for Haetae

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn haetae(dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("haetae");
        cmd.current_dir(dir).env_remove("HAETAE_CONFIG_FILE");
        cmd
    }

    fn project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("haetae.config.toml"), config).unwrap();
        temp
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        haetae(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Incremental task runner"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        haetae(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("haetae"));
    }

    #[test]
    fn missing_config_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        haetae(temp.path())
            .args(["--config", "nowhere.toml", "records"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Config file could not be resolved"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = project("[commands.build]\nenv = \"true\"\n");
        haetae(temp.path())
            .args(["records", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("commands.build.run is missing"));
    }

    #[test]
    fn init_then_info() {
        let temp = TempDir::new().unwrap();
        haetae(temp.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("haetae.config.toml"));
        assert!(temp.path().join("haetae.config.toml").exists());

        haetae(temp.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        haetae(temp.path())
            .arg("info")
            .assert()
            .success()
            .stdout(predicate::str::contains("haetae.store.json"))
            .stdout(predicate::str::contains("example"));
    }

    #[test]
    fn records_of_empty_store() {
        let temp = project("[commands.build]\nrun = \"true\"\n");
        haetae(temp.path())
            .args(["records"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"commands\": {}"));

        haetae(temp.path())
            .args(["records", "build"])
            .assert()
            .success()
            .stdout(predicate::str::diff("null\n"));
    }

    #[test]
    fn unknown_command_fails() {
        let temp = project("[commands.build]\nrun = \"true\"\n");
        haetae(temp.path())
            .args(["run", "deploy"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command not found in config: deploy"));
    }

    #[cfg(unix)]
    mod shell {
        use super::*;

        const CONFIG: &str = r#"
[commands.build]
run = "echo '{\"durationMs\": 120}'"
env = "echo '{\"os\": \"test\"}'"

[commands.bad]
run = "echo '{\"time\": 1}'"
"#;

        #[test]
        fn run_appends_then_replaces() {
            let temp = project(CONFIG);

            haetae(temp.path())
                .args(["run", "build"])
                .assert()
                .success()
                .stdout(predicate::str::contains("appended record #0"));

            haetae(temp.path())
                .args(["run", "build"])
                .assert()
                .success()
                .stdout(predicate::str::contains("replaced record #0"));

            let content =
                std::fs::read_to_string(temp.path().join("haetae.store.json")).unwrap();
            let store: serde_json::Value = serde_json::from_str(&content).unwrap();
            let records = store["commands"]["build"].as_array().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0]["env"], serde_json::json!({"os": "test"}));
            assert_eq!(records[0]["durationMs"], 120);
        }

        #[test]
        fn records_after_run() {
            let temp = project(CONFIG);
            haetae(temp.path()).args(["run", "build"]).assert().success();

            haetae(temp.path())
                .args(["records", "build"])
                .assert()
                .success()
                .stdout(predicate::str::contains("\"time\""))
                .stdout(predicate::str::contains("\"durationMs\": 120"));

            haetae(temp.path())
                .args(["records", "build", "--current", "--data"])
                .assert()
                .success()
                .stdout(predicate::str::diff("{\n  \"durationMs\": 120\n}\n"));
        }

        #[test]
        fn env_prints_current_env() {
            let temp = project(CONFIG);
            haetae(temp.path())
                .args(["env", "build"])
                .assert()
                .success()
                .stdout(predicate::str::contains("\"os\": \"test\""));
        }

        #[test]
        fn reserved_key_fails_without_writing() {
            let temp = project(CONFIG);
            haetae(temp.path())
                .args(["run", "bad"])
                .assert()
                .failure()
                .stderr(predicate::str::contains("reserved key"));
            assert!(!temp.path().join("haetae.store.json").exists());
        }

        #[test]
        fn store_override_and_config_env_var() {
            let temp = project(CONFIG);
            let elsewhere = TempDir::new().unwrap();

            haetae(elsewhere.path())
                .env("HAETAE_CONFIG_FILE", temp.path())
                .args(["--store", "custom.json", "run", "build"])
                .assert()
                .success();

            assert!(elsewhere.path().join("custom.json").exists());
            assert!(!temp.path().join("haetae.store.json").exists());
        }

        #[test]
        fn config_found_from_subdirectory() {
            let temp = project(CONFIG);
            let nested = temp.path().join("src").join("deep");
            std::fs::create_dir_all(&nested).unwrap();

            haetae(&nested).args(["run", "build"]).assert().success();
            assert!(temp.path().join("haetae.store.json").exists());
        }
    }
}
