use super::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn launcher(headless: bool) -> ChromeLauncher {
    ChromeLauncher::new(LaunchOptions {
        headless,
        extra_args: vec!["--lang=es-CO".to_string()],
        ..LaunchOptions::default()
    })
}

#[test]
fn test_options_default() {
    let options = LaunchOptions::default();
    assert!(options.headless);
    assert!(options.chrome_path.is_none());
    assert_eq!(options.launch_timeout, Duration::from_secs(15));
}

#[test]
fn test_build_args_headless() {
    let args = launcher(true).build_args(Path::new("/tmp/profile"));
    assert_eq!(args[0], "--remote-debugging-port=0");
    assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
    assert!(args.contains(&"--headless=new".to_string()));
    assert!(args.contains(&"--no-sandbox".to_string()));
    assert!(args.contains(&"--disable-popup-blocking".to_string()));
    assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("about:blank"));
}

#[test]
fn test_build_args_headed() {
    let args = launcher(false).build_args(Path::new("/tmp/profile"));
    assert!(!args.iter().any(|a| a.starts_with("--headless")));
    assert!(args.contains(&"--start-maximized".to_string()));
}

#[test]
fn test_build_args_extra_after_builtin() {
    let args = launcher(true).build_args(Path::new("/tmp/profile"));
    let extra = args.iter().position(|a| a == "--lang=es-CO").unwrap();
    let builtin = args.iter().position(|a| a == "--mute-audio").unwrap();
    assert!(extra > builtin);
}

#[test]
fn test_parse_devtools_port() {
    let content = "41873\n/devtools/browser/7d1c0a0e-1f4e-4d6b-9f1c-7b7b0c1c9e55\n";
    assert_eq!(ChromeLauncher::parse_devtools_port(content), Some(41873));
    assert_eq!(ChromeLauncher::parse_devtools_port(""), None);
    assert_eq!(ChromeLauncher::parse_devtools_port("0\n"), None);
    assert_eq!(ChromeLauncher::parse_devtools_port("abc"), None);
}

#[test]
fn test_error_display() {
    let err = LaunchError::PortTimeout(Duration::from_secs(15));
    assert!(err.to_string().contains("15s"));

    let err = LaunchError::LaunchFailed("permission denied".to_string());
    assert_eq!(err.to_string(), "Failed to launch Chrome: permission denied");
}

#[tokio::test]
async fn test_launch_missing_configured_path() {
    let launcher = ChromeLauncher::new(LaunchOptions {
        chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
        ..LaunchOptions::default()
    });
    let result = launcher.launch().await;
    assert!(matches!(result, Err(LaunchError::ChromeNotFound)));
}

#[test]
fn test_find_chrome() {
    let _result = ChromeLauncher::find_chrome();
}
