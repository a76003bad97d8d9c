//! Scripted input for unattended runs.
//!
//! Walks into the barrel cluster swinging, then boards the nearest chariot
//! and takes it for a spin.

use tumult_core::commands::PlayerCommand;
use tumult_core::enums::InputAction;

/// A command to inject at a given frame.
#[derive(Debug, Clone)]
pub struct ScriptedCommand {
    pub frame: u64,
    pub command: PlayerCommand,
}

fn down(frame: u64, action: InputAction) -> ScriptedCommand {
    ScriptedCommand {
        frame,
        command: PlayerCommand::KeyDown { action },
    }
}

fn up(frame: u64, action: InputAction) -> ScriptedCommand {
    ScriptedCommand {
        frame,
        command: PlayerCommand::KeyUp { action },
    }
}

/// Frame-ordered demo script.
pub fn demo_script() -> Vec<ScriptedCommand> {
    use InputAction::*;

    let mut script = vec![
        // Down to z = 8, then right into the barrel cluster at (12, 8).
        down(30, Backward),
        up(78, Backward),
        down(78, Right),
        up(138, Right),
    ];
    for swing in 0..8 {
        script.push(down(140 + swing * 35, Attack));
    }
    script.extend([
        // Back over to the chariot parked at (5, 5).
        down(400, Left),
        up(430, Left),
        down(430, Forward),
        up(442, Forward),
        down(460, Interact),
        down(470, Forward),
        down(520, Left),
        up(600, Left),
        up(650, Forward),
        down(660, Interact),
    ]);
    script.sort_by_key(|s| s.frame);
    script
}

/// Pops commands as their frames come due.
#[derive(Debug, Default)]
pub struct ScriptPlayer {
    script: Vec<ScriptedCommand>,
    cursor: usize,
}

impl ScriptPlayer {
    pub fn new(mut script: Vec<ScriptedCommand>) -> Self {
        script.sort_by_key(|s| s.frame);
        Self { script, cursor: 0 }
    }

    /// Commands scheduled at or before `frame` not yet handed out.
    pub fn due(&mut self, frame: u64) -> impl Iterator<Item = PlayerCommand> + '_ {
        let start = self.cursor;
        while self.cursor < self.script.len() && self.script[self.cursor].frame <= frame {
            self.cursor += 1;
        }
        self.script[start..self.cursor].iter().map(|s| s.command.clone())
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.script.len()
    }
}
