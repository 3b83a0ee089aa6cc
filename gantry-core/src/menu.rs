use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::mpsc};

/// Symbolic commands issued from the menu bar or key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuEvent {
    Push,
    Pull,
    SelectChanges,
    SelectHistory,
    AddLocalRepository,
    CreateBranch,
    ShowBranches,
    RemoveRepository,
    AddRepository,
    RenameBranch,
    DeleteBranch,
}

impl MenuEvent {
    pub const ALL: [MenuEvent; 11] = [
        MenuEvent::Push,
        MenuEvent::Pull,
        MenuEvent::SelectChanges,
        MenuEvent::SelectHistory,
        MenuEvent::AddLocalRepository,
        MenuEvent::CreateBranch,
        MenuEvent::ShowBranches,
        MenuEvent::RemoveRepository,
        MenuEvent::AddRepository,
        MenuEvent::RenameBranch,
        MenuEvent::DeleteBranch,
    ];

    /// Wire identifier, also used as the menu item id.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
            Self::SelectChanges => "select-changes",
            Self::SelectHistory => "select-history",
            Self::AddLocalRepository => "add-local-repository",
            Self::CreateBranch => "create-branch",
            Self::ShowBranches => "show-branches",
            Self::RemoveRepository => "remove-repository",
            Self::AddRepository => "add-repository",
            Self::RenameBranch => "rename-branch",
            Self::DeleteBranch => "delete-branch",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Push => "Push",
            Self::Pull => "Pull",
            Self::SelectChanges => "Changes",
            Self::SelectHistory => "History",
            Self::AddLocalRepository => "Add local repository",
            Self::CreateBranch => "New branch",
            Self::ShowBranches => "Branches",
            Self::RemoveRepository => "Remove repository",
            Self::AddRepository => "Add repository",
            Self::RenameBranch => "Rename branch",
            Self::DeleteBranch => "Delete branch",
        }
    }

    /// Commands that act on the selected repository.
    pub const fn requires_repository(self) -> bool {
        !matches!(self, Self::AddLocalRepository | Self::AddRepository)
    }
}

impl fmt::Display for MenuEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MenuEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| format!("Unknown menu event: {s}"))
    }
}

/// A menu command as it crosses the untyped boundary: just a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSignal {
    pub name: String,
}

impl MenuSignal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<MenuEvent> for MenuSignal {
    fn from(event: MenuEvent) -> Self {
        Self::new(event.name())
    }
}

#[derive(Debug, Clone)]
pub struct MenuSender {
    tx: mpsc::Sender<MenuSignal>,
}

impl MenuSender {
    pub fn send(&self, signal: MenuSignal) {
        if self.tx.send(signal).is_err() {
            log::debug!("menu signal dropped: receiver gone");
        }
    }

    pub fn send_event(&self, event: MenuEvent) {
        self.send(event.into());
    }
}

#[derive(Debug)]
pub struct MenuReceiver {
    rx: mpsc::Receiver<MenuSignal>,
}

impl MenuReceiver {
    /// Non-blocking drain of every pending signal, in send order.
    pub fn drain(&self) -> Vec<MenuSignal> {
        self.rx.try_iter().collect()
    }
}

pub fn menu_channel() -> (MenuSender, MenuReceiver) {
    let (tx, rx) = mpsc::channel();
    (MenuSender { tx }, MenuReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for event in MenuEvent::ALL {
            assert_eq!(event.name().parse::<MenuEvent>().unwrap(), event);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!("force-push".parse::<MenuEvent>().is_err());
        assert!("Push".parse::<MenuEvent>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&MenuEvent::AddLocalRepository).unwrap();
        assert_eq!(json, "\"add-local-repository\"");
        let parsed: MenuEvent = serde_json::from_str("\"select-history\"").unwrap();
        assert_eq!(parsed, MenuEvent::SelectHistory);
    }

    #[test]
    fn test_only_add_commands_work_without_repository() {
        let free: Vec<_> = MenuEvent::ALL
            .into_iter()
            .filter(|e| !e.requires_repository())
            .collect();
        assert_eq!(
            free,
            vec![MenuEvent::AddLocalRepository, MenuEvent::AddRepository]
        );
    }

    #[test]
    fn test_channel_preserves_order() {
        let (tx, rx) = menu_channel();
        tx.send_event(MenuEvent::Pull);
        tx.send(MenuSignal::new("not-a-command"));
        tx.send_event(MenuEvent::Push);
        let names: Vec<_> = rx.drain().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["pull", "not-a-command", "push"]);
        assert!(rx.drain().is_empty());
    }
}
