use bevy::prelude::*;

use super::session::AxisLock;
use crate::engine::assets::analysis::StatusCode;
use crate::engine::core::error::{ViewerError, ViewerResult};

/// Discrete viewport commands, from the keyboard or the frontend.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportCommand {
    ToggleMode,
    Cancel,
    ToggleGrid,
    /// `AxisLock::None` is the "free" command.
    SetAxisLock(AxisLock),
    ToggleCategory(StatusCode),
}

/// Default key table. Handlers never look at key codes directly.
pub const KEY_BINDINGS: &[(KeyCode, ViewportCommand)] = &[
    (KeyCode::Space, ViewportCommand::ToggleMode),
    (KeyCode::Escape, ViewportCommand::Cancel),
    (KeyCode::KeyG, ViewportCommand::ToggleGrid),
    (KeyCode::KeyW, ViewportCommand::SetAxisLock(AxisLock::Y)),
    (KeyCode::ArrowUp, ViewportCommand::SetAxisLock(AxisLock::Y)),
    (KeyCode::KeyA, ViewportCommand::SetAxisLock(AxisLock::X)),
    (KeyCode::KeyD, ViewportCommand::SetAxisLock(AxisLock::X)),
    (KeyCode::ArrowLeft, ViewportCommand::SetAxisLock(AxisLock::X)),
    (KeyCode::ArrowRight, ViewportCommand::SetAxisLock(AxisLock::X)),
    (KeyCode::KeyS, ViewportCommand::SetAxisLock(AxisLock::Z)),
    (KeyCode::ArrowDown, ViewportCommand::SetAxisLock(AxisLock::Z)),
    (KeyCode::KeyQ, ViewportCommand::SetAxisLock(AxisLock::Z)),
    (KeyCode::KeyE, ViewportCommand::SetAxisLock(AxisLock::Z)),
    (KeyCode::KeyR, ViewportCommand::SetAxisLock(AxisLock::None)),
    (
        KeyCode::Digit1,
        ViewportCommand::ToggleCategory(StatusCode::Completo),
    ),
    (
        KeyCode::Digit2,
        ViewportCommand::ToggleCategory(StatusCode::Parcial),
    ),
    (
        KeyCode::Digit3,
        ViewportCommand::ToggleCategory(StatusCode::Iniciado),
    ),
    (
        KeyCode::Digit4,
        ViewportCommand::ToggleCategory(StatusCode::Ausente),
    ),
];

pub fn command_for_key(key: KeyCode) -> Option<ViewportCommand> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}

impl ViewportCommand {
    /// Convert string identifier to command for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "toggle_mode" => Some(Self::ToggleMode),
            "cancel" => Some(Self::Cancel),
            "toggle_grid" => Some(Self::ToggleGrid),
            "lock_x" => Some(Self::SetAxisLock(AxisLock::X)),
            "lock_y" => Some(Self::SetAxisLock(AxisLock::Y)),
            "lock_z" => Some(Self::SetAxisLock(AxisLock::Z)),
            "free" => Some(Self::SetAxisLock(AxisLock::None)),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> ViewerResult<Self> {
        Self::from_string(s).ok_or_else(|| ViewerError::UnknownCommand(s.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleMode => "toggle_mode",
            Self::Cancel => "cancel",
            Self::ToggleGrid => "toggle_grid",
            Self::SetAxisLock(AxisLock::X) => "lock_x",
            Self::SetAxisLock(AxisLock::Y) => "lock_y",
            Self::SetAxisLock(AxisLock::Z) => "lock_z",
            Self::SetAxisLock(AxisLock::None) => "free",
            Self::ToggleCategory(_) => "toggle_category",
        }
    }
}

/// Turn key presses into viewport commands through `KEY_BINDINGS`.
pub fn dispatch_keyboard_commands(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<ViewportCommand>,
) {
    for key in keyboard.get_just_pressed() {
        if let Some(command) = command_for_key(*key) {
            commands.write(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_table_matches_bindings() {
        assert_eq!(
            command_for_key(KeyCode::Space),
            Some(ViewportCommand::ToggleMode)
        );
        assert_eq!(
            command_for_key(KeyCode::KeyE),
            Some(ViewportCommand::SetAxisLock(AxisLock::Z))
        );
        assert_eq!(
            command_for_key(KeyCode::ArrowRight),
            Some(ViewportCommand::SetAxisLock(AxisLock::X))
        );
        assert_eq!(
            command_for_key(KeyCode::Digit2),
            Some(ViewportCommand::ToggleCategory(StatusCode::Parcial))
        );
        assert_eq!(command_for_key(KeyCode::KeyM), None);
    }

    #[test]
    fn each_key_is_bound_once() {
        for (i, (key, _)) in KEY_BINDINGS.iter().enumerate() {
            assert!(KEY_BINDINGS[i + 1..].iter().all(|(other, _)| other != key));
        }
    }

    #[test]
    fn names_round_trip() {
        for name in ["toggle_mode", "cancel", "toggle_grid", "lock_x", "lock_y", "lock_z", "free"] {
            assert_eq!(ViewportCommand::parse(name).unwrap().as_str(), name);
        }
        assert!(matches!(
            ViewportCommand::parse("explode"),
            Err(ViewerError::UnknownCommand(_))
        ));
    }

    #[test]
    fn keyboard_presses_emit_commands() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<ViewportCommand>()
            .add_systems(Update, dispatch_keyboard_commands);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyG);
        app.update();

        let events = app.world().resource::<Events<ViewportCommand>>();
        let mut cursor = events.get_cursor();
        let sent: Vec<_> = cursor.read(events).copied().collect();
        assert_eq!(sent, vec![ViewportCommand::ToggleGrid]);
    }
}
