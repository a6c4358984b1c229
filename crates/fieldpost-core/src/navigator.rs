//! Tab and folder selection state.

use fieldpost_api::Folder;

/// Top-level surface the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    /// The folder listings (inbox, sent, trash).
    #[default]
    Inbox,
    /// The compose surface.
    Compose,
    /// The saved draft list.
    Drafts,
}

/// Pure selection state: which tab is up and which folder is active.
///
/// The folder only matters while the listing tab is up; it is kept
/// across tab switches so returning to the listing lands where the
/// user left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FolderNavigator {
    /// Current tab.
    pub tab: ActiveTab,
    /// Folder shown while the listing tab is up.
    pub folder: Folder,
}

impl FolderNavigator {
    /// Whether `folder`'s listing is the surface on screen.
    #[must_use]
    pub fn viewing(self, folder: Folder) -> bool {
        self.tab == ActiveTab::Inbox && self.folder == folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_inbox_listing() {
        let nav = FolderNavigator::default();
        assert!(nav.viewing(Folder::Inbox));
        assert!(!nav.viewing(Folder::Trash));
    }

    #[test]
    fn other_tabs_are_not_viewing_any_folder() {
        let nav = FolderNavigator {
            tab: ActiveTab::Compose,
            folder: Folder::Inbox,
        };
        assert!(!nav.viewing(Folder::Inbox));
    }
}
