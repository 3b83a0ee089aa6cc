use crate::{menu::MenuEvent, state::SelectionState};

/// Receives menu item enablement by command id. Implementations must tolerate redundant calls.
pub trait MenuEnablementSink {
    fn set_enabled(&mut self, command_id: &str, enabled: bool);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuEnablement {
    pub rename_branch: bool,
    pub delete_branch: bool,
}

impl MenuEnablement {
    /// Rename and delete are only offered for a checked-out branch that is not the default.
    pub fn derive(selection: &SelectionState) -> Self {
        let SelectionState::Repository { state, .. } = selection else {
            return Self::default();
        };
        let branches = &state.branches_state;
        let enabled = match (&branches.current_branch, &branches.default_branch) {
            (Some(current), Some(default)) => !current.same_branch(default),
            _ => false,
        };
        Self {
            rename_branch: enabled,
            delete_branch: enabled,
        }
    }

    pub fn apply(self, sink: &mut dyn MenuEnablementSink) {
        sink.set_enabled(MenuEvent::RenameBranch.name(), self.rename_branch);
        sink.set_enabled(MenuEvent::DeleteBranch.name(), self.delete_branch);
    }
}
