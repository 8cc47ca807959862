// End-to-end checks of the breach-monitor binary: fatal paths and exit codes
use std::process::Command;

const UNSET_VAR: &str = "BREACH_MONITOR_TEST_UNSET_VARIABLE";

fn breach_monitor() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_breach-monitor"));
    cmd.env_remove(UNSET_VAR).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_api_key_is_fatal() {
    let output = breach_monitor()
        .args(["--env", UNSET_VAR, "--config", "tests/test_config.toml", "user@example.com"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API key provided"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_email_is_usage_error() {
    let output = breach_monitor().output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("EMAIL"));
}

#[test]
fn test_debug_and_silent_conflict() {
    let output = breach_monitor()
        .args(["-d", "-s", "-k", "key", "user@example.com"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--debug and --silent"));
}

#[test]
fn test_unreadable_config_is_fatal() {
    let output = breach_monitor()
        .args(["-k", "key", "--config", "tests/does-not-exist.toml", "user@example.com"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.toml"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_ctrl_c_during_lookup_exits_with_130() {
    use std::io::{Read, Write};
    use std::process::Stdio;
    use std::time::{Duration, Instant};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let hibp = MockServer::start().await;
    let hacked = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&hibp)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "notfound", "query": "", "results": 0}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&hacked)
        .await;

    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(
        config,
        "[hibp]\nbase_url = \"{}/api/v3\"\n\n[hacked_emails]\nbase_url = \"{}/\"\n\n[rate_limit]\ndelay_secs = 0\n",
        hibp.uri(),
        hacked.uri()
    )
    .unwrap();

    let mut child = breach_monitor()
        .args(["-k", "key", "--config"])
        .arg(config.path())
        .arg("user@example.com")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let sent = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    let interrupted_at = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if interrupted_at.elapsed() > Duration::from_secs(10) {
            child.kill().ok();
            panic!("breach-monitor kept running after SIGINT");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    };

    assert_eq!(status.code(), Some(130));

    let mut stdout = String::new();
    child.stdout.take().unwrap().read_to_string(&mut stdout).unwrap();
    assert!(stdout.contains("from haveibeenpwned.com"));
    assert!(!stdout.contains("from hacked-emails.com"));
}
