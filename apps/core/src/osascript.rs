//! Live `TabSource` backed by JavaScript for Automation.

use std::process::Command;

use serde::de::DeserializeOwned;

use crate::source::{RawSpace, RawTab, SourceError, TabSource};

pub struct OsaScriptSource {
    app_name: String,
}

impl OsaScriptSource {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    /// Runs `body` with `app` bound to the application. `body` must evaluate
    /// to a JSON string.
    fn eval<T: DeserializeOwned>(&self, body: &str) -> Result<T, SourceError> {
        let name = serde_json::to_string(&self.app_name)
            .map_err(|error| SourceError::Script(error.to_string()))?;
        let script = format!("(() => {{ const app = Application({name}); {body} }})()");

        let output = Command::new("osascript")
            .args(["-l", "JavaScript", "-e", &script])
            .output()
            .map_err(|error| SourceError::Script(format!("failed to spawn osascript: {error}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Script(format!(
                "osascript exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim())
            .map_err(|error| SourceError::Script(format!("unexpected osascript reply: {error}")))
    }
}

const TAB_FIELDS: &str = "const tabsOf = (tabs) => { \
    const titles = tabs.title(); const urls = tabs.url(); const locations = tabs.location(); \
    return titles.map((title, i) => ({ title, url: urls[i], location: locations[i] })); };";

impl TabSource for OsaScriptSource {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn is_installed(&self) -> Result<bool, SourceError> {
        let name = serde_json::to_string(&self.app_name)
            .map_err(|error| SourceError::Script(error.to_string()))?;
        let script = format!(
            "(() => {{ try {{ Application({name}).id(); return 'true'; }} catch (e) {{ return 'false'; }} }})()"
        );
        let output = Command::new("osascript")
            .args(["-l", "JavaScript", "-e", &script])
            .output()
            .map_err(|error| SourceError::Script(format!("failed to spawn osascript: {error}")))?;
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    fn is_running(&self) -> Result<bool, SourceError> {
        self.eval("return JSON.stringify(app.running());")
    }

    fn launch(&self) -> Result<(), SourceError> {
        let _: serde_json::Value = self.eval("app.launch(); return 'null';")?;
        Ok(())
    }

    fn window_count(&self) -> Result<usize, SourceError> {
        self.eval("return JSON.stringify(app.windows.length);")
    }

    fn list_tabs(&self, window: usize) -> Result<Vec<RawTab>, SourceError> {
        self.eval(&format!(
            "{TAB_FIELDS} return JSON.stringify(tabsOf(app.windows[{window}].tabs));"
        ))
    }

    fn list_spaces(&self, window: usize) -> Result<Vec<RawSpace>, SourceError> {
        self.eval(&format!(
            "{TAB_FIELDS} const spaces = app.windows[{window}].spaces(); \
             return JSON.stringify(spaces.map((space) => ({{ title: space.title(), tabs: tabsOf(space.tabs) }})));"
        ))
    }

    fn active_space_title(&self, window: usize) -> Result<Option<String>, SourceError> {
        self.eval(&format!(
            "try {{ return JSON.stringify(app.windows[{window}].activeSpace.title()); }} \
             catch (e) {{ return 'null'; }}"
        ))
    }
}
