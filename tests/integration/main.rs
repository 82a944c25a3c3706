//! Integration tests for the netgauge launcher

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn launcher() -> Command {
        cargo_bin_cmd!("netgauge-launcher")
    }

    #[test]
    fn help_displays() {
        launcher()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("netgauge"));
    }

    #[test]
    fn version_displays() {
        launcher()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("netgauge-launcher"));
    }

    #[test]
    fn which_prints_cache_path_for_explicit_tag() {
        let cache = TempDir::new().unwrap();

        launcher()
            .args(["which", "--version-tag", "v1.2.3"])
            .env("NETGAUGE_CACHE_DIR", cache.path())
            .assert()
            .success()
            .stdout(
                predicate::str::contains("v1.2.3")
                    .and(predicate::str::contains(cache.path().to_str().unwrap())),
            );
    }

    #[test]
    fn which_honors_version_env_var() {
        let cache = TempDir::new().unwrap();

        launcher()
            .arg("which")
            .env("NETGAUGE_CACHE_DIR", cache.path())
            .env("NETGAUGE_VERSION", "v7.0.0")
            .assert()
            .success()
            .stdout(predicate::str::contains("v7.0.0"));
    }

    #[test]
    fn which_warns_when_not_cached() {
        let cache = TempDir::new().unwrap();

        launcher()
            .args(["which", "--version-tag", "v1.2.3"])
            .env("NETGAUGE_CACHE_DIR", cache.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("Not cached"));
    }

    #[test]
    fn cache_path_respects_env_override() {
        let cache = TempDir::new().unwrap();

        launcher()
            .args(["cache", "path"])
            .env("NETGAUGE_CACHE_DIR", cache.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(cache.path().to_str().unwrap()));
    }

    #[test]
    fn cache_clean_requires_a_target() {
        let cache = TempDir::new().unwrap();

        launcher()
            .args(["cache", "clean"])
            .env("NETGAUGE_CACHE_DIR", cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("--version-tag"));
    }

    #[test]
    fn cache_clean_removes_one_version() {
        let cache = TempDir::new().unwrap();
        let version_dir = cache.path().join("v1.0.0");
        std::fs::create_dir_all(&version_dir).unwrap();
        std::fs::write(version_dir.join("netgauge-linux-amd64"), b"bin").unwrap();

        launcher()
            .args(["cache", "clean", "--version-tag", "v1.0.0"])
            .env("NETGAUGE_CACHE_DIR", cache.path())
            .assert()
            .success();

        assert!(!version_dir.exists());
        assert!(cache.path().exists());
    }

    #[test]
    fn config_show_renders_toml() {
        launcher()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[release]"));
    }

    #[test]
    fn config_path_points_at_toml() {
        launcher()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_writes_then_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap().to_string();

        launcher()
            .args(["--config", &path_str, "config", "init"])
            .assert()
            .success();
        assert!(path.exists());

        launcher()
            .args(["--config", &path_str, "config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));

        launcher()
            .args(["--config", &path_str, "config", "init", "--force"])
            .assert()
            .success();
    }
}

#[cfg(unix)]
mod passthrough_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn launcher() -> Command {
        cargo_bin_cmd!("netgauge-launcher")
    }

    fn write_stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("netgauge-stub");
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn run_reproduces_stdin_on_stdout() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path(), "#!/bin/sh\nexec cat\n");

        launcher()
            .arg("run")
            .env("NETGAUGE_BIN", &stub)
            .write_stdin("protocol bytes\nsecond frame\n")
            .assert()
            .success()
            .stdout("protocol bytes\nsecond frame\n");
    }

    #[test]
    fn run_is_exit_code_transparent() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path(), "#!/bin/sh\nexit 5\n");

        launcher()
            .arg("run")
            .env("NETGAUGE_BIN", &stub)
            .assert()
            .code(5);
    }

    #[test]
    fn run_prepends_client_and_forwards_args() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path(), "#!/bin/sh\nprintf '%s %s %s' \"$1\" \"$2\" \"$3\"\n");

        launcher()
            .args(["run", "--", "--interval", "5s"])
            .env("NETGAUGE_BIN", &stub)
            .assert()
            .success()
            .stdout("client --interval 5s");
    }

    #[test]
    fn run_env_flag_reaches_the_child() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path(), "#!/bin/sh\nprintf '%s' \"$NETGAUGE_LOG\"\n");

        launcher()
            .args(["run", "--env", "NETGAUGE_LOG=debug"])
            .env("NETGAUGE_BIN", &stub)
            .assert()
            .success()
            .stdout("debug");
    }

    #[test]
    fn run_missing_binary_reports_spawn_error() {
        let dir = TempDir::new().unwrap();

        launcher()
            .arg("run")
            .env("NETGAUGE_BIN", dir.path().join("absent"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to start"));
    }
}
