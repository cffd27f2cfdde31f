//! Resolves the handful of environment variables needed to reach the
//! active desktop session. Real session discovery (enumerating logind
//! sessions, resolving the console user) is systems glue outside this
//! crate's scope; this just reads what the host environment already
//! exports to the process the daemon runs as.

#[derive(Debug, Clone, Default)]
pub struct ActiveSession {
    pub home: Option<String>,
    pub display: Option<String>,
    pub xauthority: Option<String>,
    pub xdg_runtime_dir: Option<String>,
}

impl ActiveSession {
    pub fn from_env() -> Self {
        ActiveSession {
            home: std::env::var("HOME").ok(),
            display: std::env::var("DISPLAY").ok(),
            xauthority: std::env::var("XAUTHORITY").ok(),
            xdg_runtime_dir: std::env::var("XDG_RUNTIME_DIR").ok(),
        }
    }

    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reads_what_is_set() {
        std::env::set_var("DISPLAY", ":1");
        let session = ActiveSession::from_env();
        assert_eq!(session.display.as_deref(), Some(":1"));
        assert!(session.has_display());
        std::env::remove_var("DISPLAY");
    }
}
