//! Plays a short notification sound when the layout switches, if the
//! user has enabled it and a display session is available.

use crate::config::SoundConfig;
use crate::session::ActiveSession;
use std::process::{Command, Stdio};

const SWITCH_TO_EN_SOUND: &str = "/usr/share/sounds/layoutguard/switch-en.wav";
const SWITCH_TO_RU_SOUND: &str = "/usr/share/sounds/layoutguard/switch-ru.wav";

fn sound_path(layout: crate::decision::LayoutId) -> &'static str {
    match layout {
        crate::decision::LayoutId::English => SWITCH_TO_EN_SOUND,
        crate::decision::LayoutId::Russian => SWITCH_TO_RU_SOUND,
    }
}

/// Spawns a player for the layout's notification sound and does not wait
/// on it: the child is left to exit on its own, so a slow or hung player
/// can never block the router's hot path.
pub fn play_for_layout(
    layout: crate::decision::LayoutId,
    cfg: &SoundConfig,
    session: &ActiveSession,
) {
    if !cfg.enabled || !session.has_display() {
        return;
    }

    let path = sound_path(layout);
    for player in ["paplay", "aplay"] {
        let spawned = Command::new(player)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => return,
            Err(e) => log::debug!("play_for_layout: {player} unavailable: {e}"),
        }
    }
    log::warn!("play_for_layout: no sound player found for {path}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_never_spawns() {
        let cfg = SoundConfig { enabled: false };
        let session = ActiveSession::default();
        play_for_layout(crate::decision::LayoutId::English, &cfg, &session);
    }

    #[test]
    fn no_display_never_spawns() {
        let cfg = SoundConfig { enabled: true };
        let session = ActiveSession::default();
        play_for_layout(crate::decision::LayoutId::Russian, &cfg, &session);
    }
}
