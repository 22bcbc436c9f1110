use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::Deserialize;
use thiserror::Error;

use crate::text::lenient_string;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{0} is not installed")]
    Unavailable(String),
    #[error("timed out after {waited_ms}ms waiting for {app} to open a window")]
    LaunchTimedOut { app: String, waited_ms: u128 },
    #[error("source script failed: {0}")]
    Script(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabLocation {
    TopApp,
    Pinned,
    Unpinned,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTab {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    pub location: TabLocation,
}

impl RawTab {
    pub fn new(title: &str, url: &str, location: TabLocation) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSpace {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default)]
    pub tabs: Vec<RawTab>,
}

impl RawSpace {
    pub fn new(title: &str, tabs: Vec<RawTab>) -> Self {
        Self {
            title: title.to_string(),
            tabs,
        }
    }
}

/// The live browser, seen through its automation interface.
///
/// `list_tabs` returns window-level tabs; tabs owned by a space come back
/// through `list_spaces`.
pub trait TabSource: Send + Sync {
    fn app_name(&self) -> &str;
    fn is_installed(&self) -> Result<bool, SourceError>;
    fn is_running(&self) -> Result<bool, SourceError>;
    fn launch(&self) -> Result<(), SourceError>;
    fn window_count(&self) -> Result<usize, SourceError>;
    fn list_tabs(&self, window: usize) -> Result<Vec<RawTab>, SourceError>;
    fn list_spaces(&self, window: usize) -> Result<Vec<RawSpace>, SourceError>;
    fn active_space_title(&self, window: usize) -> Result<Option<String>, SourceError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureWindow {
    pub tabs: Vec<RawTab>,
    pub spaces: Vec<RawSpace>,
    pub active_space: Option<String>,
}

/// In-memory source with scripted install/launch behaviour.
pub struct FixtureSource {
    app_name: String,
    installed: bool,
    running: AtomicBool,
    windows: Vec<FixtureWindow>,
    windows_after_polls: usize,
    polls: AtomicUsize,
    tab_calls: AtomicUsize,
}

impl FixtureSource {
    pub fn from_windows(windows: Vec<FixtureWindow>) -> Self {
        Self {
            app_name: "Arc".to_string(),
            installed: true,
            running: AtomicBool::new(true),
            windows,
            windows_after_polls: 0,
            polls: AtomicUsize::new(0),
            tab_calls: AtomicUsize::new(0),
        }
    }

    pub fn not_installed() -> Self {
        Self {
            installed: false,
            running: AtomicBool::new(false),
            ..Self::from_windows(Vec::new())
        }
    }

    /// Starts stopped; after `launch`, windows appear once `polls` window
    /// counts have come back empty.
    pub fn stopped(self, polls: usize) -> Self {
        Self {
            running: AtomicBool::new(false),
            windows_after_polls: polls,
            ..self
        }
    }

    pub fn was_launched(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of `list_tabs` calls served, used to observe cache hits.
    pub fn tab_calls(&self) -> usize {
        self.tab_calls.load(Ordering::SeqCst)
    }

    pub fn deterministic_fixture() -> Self {
        Self::from_windows(vec![FixtureWindow {
            tabs: vec![RawTab::new(
                "Calendar",
                "https://calendar.example.com",
                TabLocation::TopApp,
            )],
            spaces: vec![
                RawSpace::new(
                    "Work",
                    vec![
                        RawTab::new(
                            "GitHub PR #42",
                            "https://github.com/acme/app/pull/42",
                            TabLocation::Pinned,
                        ),
                        RawTab::new(
                            "Build dashboard",
                            "https://ci.example.com",
                            TabLocation::Unpinned,
                        ),
                    ],
                ),
                RawSpace::new(
                    "Personal",
                    vec![RawTab::new(
                        "Recipes",
                        "https://food.example.com",
                        TabLocation::Unpinned,
                    )],
                ),
            ],
            active_space: Some("Work".to_string()),
        }])
    }

    fn window(&self, window: usize) -> Result<&FixtureWindow, SourceError> {
        self.windows
            .get(window)
            .ok_or_else(|| SourceError::Script(format!("window {window} does not exist")))
    }
}

impl TabSource for FixtureSource {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn is_installed(&self) -> Result<bool, SourceError> {
        Ok(self.installed)
    }

    fn is_running(&self) -> Result<bool, SourceError> {
        Ok(self.running.load(Ordering::SeqCst))
    }

    fn launch(&self) -> Result<(), SourceError> {
        if !self.installed {
            return Err(SourceError::Unavailable(self.app_name.clone()));
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn window_count(&self) -> Result<usize, SourceError> {
        if !self.running.load(Ordering::SeqCst) {
            return Ok(0);
        }
        let polls = self.polls.fetch_add(1, Ordering::SeqCst);
        if polls < self.windows_after_polls {
            return Ok(0);
        }
        Ok(self.windows.len())
    }

    fn list_tabs(&self, window: usize) -> Result<Vec<RawTab>, SourceError> {
        self.tab_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.window(window)?.tabs.clone())
    }

    fn list_spaces(&self, window: usize) -> Result<Vec<RawSpace>, SourceError> {
        Ok(self.window(window)?.spaces.clone())
    }

    fn active_space_title(&self, window: usize) -> Result<Option<String>, SourceError> {
        Ok(self.window(window)?.active_space.clone())
    }
}
