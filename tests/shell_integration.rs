//! Shell Integration Tests
//!
//! Startup from a config file, deep links from the host and lazy modules
//! loaded through the shell.

use crosswing::host_bridge::{
    BridgeError, HostBridge, HostBridgeConfig, HostMessage, ViewportChange,
};
use crosswing::lazy::{BoxError, LoadError, LoadState};
use crosswing::router::{
    BrowserHistory, History, NativeHistory, NavigateOptions, NavigationAction,
};
use crosswing::{logging, ConfigError, Shell, ShellConfig, ShellError};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

// Shells started with `Shell::new` own the process-wide bridge
static PROCESS_BRIDGE: Mutex<()> = parking_lot::const_mutex(());

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

/// Shell started from a config file routes deep links
#[test]
fn test_shell_from_config_file() {
    let _bridge = PROCESS_BRIDGE.lock();
    let file = write_config(
        r#"{
            "router": { "initialPath": "/home", "navs": { "maxDepth": 8 } },
            "hostBridge": { "allowedSchemes": ["myapp", "https"] },
            "logFilter": "debug"
        }"#,
    );
    let config = ShellConfig::from_file(file.path()).unwrap();
    let shell = Shell::new(config).unwrap();
    assert_eq!(shell.router().history().top().href(), "/home");

    // Startup installed a subscriber using logFilter (or found one already)
    assert!(!logging::init("info"));

    assert!(shell.bridge().open_deep_link("myapp://items/42?ref=push").unwrap());
    assert_eq!(shell.router().history().top().href(), "/items/42?ref=push");

    assert!(shell
        .bridge()
        .open_deep_link("https://example.com/profile#bio")
        .unwrap());
    assert_eq!(shell.router().history().top().href(), "/profile");

    // Scheme outside the allow-list never reaches the router
    assert!(shell.bridge().open_deep_link("other://items/1").is_err());
    assert_eq!(shell.router().history().top().href(), "/profile");
}

/// Deep links replace the current entry when configured
#[test]
fn test_deep_links_replace_when_configured() {
    let _bridge = PROCESS_BRIDGE.lock();
    let config = ShellConfig::from_json_str(r#"{ "hostBridge": { "replaceOnDeepLink": true } }"#)
        .unwrap();
    let shell = Shell::new(config).unwrap();
    let actions = Arc::new(Mutex::new(Vec::new()));
    let sink = actions.clone();
    let _sub = shell.router().on_change(move |_, action| sink.lock().push(action));

    shell.bridge().open_deep_link("/items/1").unwrap();
    assert_eq!(*actions.lock(), vec![NavigationAction::Replace]);
}

/// Shutdown releases the deep-link channel
#[test]
fn test_shutdown_releases_channel() {
    let _bridge = PROCESS_BRIDGE.lock();
    let mut shell = Shell::new(ShellConfig::default()).unwrap();
    assert!(shell.bridge().deep_links().is_registered());

    shell.shutdown();
    assert!(!shell.bridge().deep_links().is_registered());
    assert_eq!(HostBridge::get().unwrap_err(), BridgeError::NotInitialized);
    assert!(!shell.bridge().open_deep_link("/items/1").unwrap());
    assert_eq!(shell.router().history().top().href(), "/");

    // Idempotent
    shell.shutdown();
}

/// Host JSON messages reach the right consumers
#[test]
fn test_host_messages() {
    let _bridge = PROCESS_BRIDGE.lock();
    let shell = Shell::new(ShellConfig::default()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _viewport = shell
        .bridge()
        .viewport()
        .register(move |change: &ViewportChange| sink.lock().push(change.height))
        .unwrap();

    let messages = [
        r#"{"type": "deepLink", "url": "/inbox"}"#,
        r#"{"type": "viewportChange", "width": 390, "height": 500, "keyboardHeight": 344}"#,
    ];
    for raw in messages {
        let message: HostMessage = serde_json::from_str(raw).unwrap();
        assert!(shell.bridge().handle_message(message).unwrap());
    }

    assert_eq!(shell.router().history().top().href(), "/inbox");
    assert_eq!(*seen.lock(), vec![500.0]);
    assert_eq!(shell.bridge().last_viewport().unwrap().keyboard_height, 344.0);
}

/// Host stack fake
struct FakeNative {
    stack: Mutex<Vec<String>>,
}

impl NativeHistory for FakeNative {
    fn current_href(&self) -> String {
        self.stack.lock().last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push_state(&self, href: &str) {
        self.stack.lock().push(href.to_string());
    }

    fn replace_state(&self, href: &str) {
        let mut stack = self.stack.lock();
        stack.pop();
        stack.push(href.to_string());
    }

    fn back(&self) {
        self.stack.lock().pop();
    }
}

/// Injected browser history starts where the host already is
#[test]
fn test_shell_with_browser_history() {
    let _bridge = PROCESS_BRIDGE.lock();
    let native = FakeNative {
        stack: Mutex::new(vec!["/feed".to_string()]),
    };
    let history = Arc::new(BrowserHistory::new(native).unwrap());
    let shell = Shell::with_history(ShellConfig::default(), history.clone()).unwrap();

    assert_eq!(shell.router().context().location().href(), "/feed");
    shell.bridge().open_deep_link("myapp://feed/post/3").unwrap();
    assert_eq!(*history.native().stack.lock(), vec!["/feed", "/feed/post/3"]);

    shell
        .router()
        .navigate("/settings", NavigateOptions::replace())
        .unwrap();
    assert_eq!(*history.native().stack.lock(), vec!["/feed", "/settings"]);
}

/// Invalid configuration is refused before anything starts
#[test]
fn test_invalid_config_rejected() {
    let _bridge = PROCESS_BRIDGE.lock();
    let err = ShellConfig::from_json_str(r#"{ "router": { "initialPath": "home" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = ShellConfig::from_json_str(r#"{ "lazy": { "timeoutMs": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let config = ShellConfig {
        log_filter: "warn".to_string(),
        ..Default::default()
    };
    let mut bad = config.clone();
    bad.host_bridge.allowed_schemes = vec!["myapp:".to_string()];
    assert!(matches!(Shell::new(bad), Err(ShellError::Config(_))));
    assert!(Shell::new(config).is_ok());

    assert!(matches!(
        ShellConfig::from_file("/nonexistent/crosswing.json"),
        Err(ConfigError::Io(_))
    ));
}

/// Lazy modules made by the shell pick up its timeout
#[tokio::test(start_paused = true)]
async fn test_lazy_module_uses_shell_timeout() {
    let _bridge = PROCESS_BRIDGE.lock();
    let config = ShellConfig::from_json_str(r#"{ "lazy": { "timeoutMs": 500 } }"#).unwrap();
    let shell = Shell::new(config).unwrap();

    let fast = shell.lazy_module("inbox", || async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, BoxError>(vec!["thread 1".to_string()])
    });
    assert_eq!(fast.load().await.unwrap().len(), 1);

    let slow = shell.lazy_module("reports", || async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, BoxError>(())
    });
    let err = slow.load().await.unwrap_err();
    assert_eq!(
        err,
        LoadError::Timeout {
            module: "reports".to_string(),
            timeout: Duration::from_millis(500)
        }
    );
    assert!(matches!(slow.state(), LoadState::Failed(_)));
}

/// Native code reaches the running shell through the process-wide bridge
#[test]
fn test_process_wide_bridge_lifecycle() {
    let _bridge = PROCESS_BRIDGE.lock();
    let shell = Shell::new(ShellConfig::default()).unwrap();
    assert!(shell.is_process_wide());

    let global = HostBridge::get().unwrap();
    assert!(Arc::ptr_eq(&global, shell.bridge()));
    assert!(global.open_deep_link("myapp://inbox/7").unwrap());
    assert_eq!(shell.router().history().top().href(), "/inbox/7");

    // One process-wide shell at a time
    assert!(matches!(
        Shell::new(ShellConfig::default()),
        Err(ShellError::Bridge(BridgeError::AlreadyInitialized))
    ));
    assert!(Arc::ptr_eq(&HostBridge::get().unwrap(), shell.bridge()));

    drop(shell);
    assert_eq!(HostBridge::get().unwrap_err(), BridgeError::NotInitialized);

    let next = Shell::new(ShellConfig::default()).unwrap();
    assert!(Arc::ptr_eq(&HostBridge::get().unwrap(), next.bridge()));
}

/// An injected bridge leaves the process-wide slot untouched
#[test]
fn test_injected_bridge_is_not_process_wide() {
    let _bridge = PROCESS_BRIDGE.lock();
    let bridge = Arc::new(HostBridge::new(HostBridgeConfig::default()));
    let history = Arc::new(crosswing::router::MemoryHistory::default());
    let mut shell =
        Shell::with_bridge(ShellConfig::default(), history, bridge.clone()).unwrap();

    assert!(!shell.is_process_wide());
    assert_eq!(HostBridge::get().unwrap_err(), BridgeError::NotInitialized);

    bridge.open_deep_link("/settings").unwrap();
    assert_eq!(shell.router().history().top().href(), "/settings");

    shell.shutdown();
    assert!(!bridge.deep_links().is_registered());
}
