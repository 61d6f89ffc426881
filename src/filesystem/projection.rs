use crate::directory::{ItemKind, SortMode};
use crate::filesystem::{DirectoryTree, TreeNode};

/// The direct children of one folder, as all items, files only and folders only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSet {
    all: Vec<String>,
    files: Vec<String>,
    folders: Vec<String>,
}

impl ListingSet {
    /// Classifies the children of `folder`.
    ///
    /// `SortMode::Alphanumeric` sorts each view by lowercased name, keeping the
    /// relative order of names that compare equal. `SortMode::DateModified` keeps the
    /// folder's insertion order, which the tree builder derived from the record order.
    pub fn project(folder: &DirectoryTree, sort_mode: SortMode) -> Self {
        let mut listings = folder
            .iter()
            .fold(Self::default(), |mut listings, (name, node)| {
                match node {
                    TreeNode::File => listings.files.push(name.clone()),
                    TreeNode::Folder(_) => listings.folders.push(name.clone()),
                }
                listings.all.push(name.clone());
                listings
            });

        if sort_mode == SortMode::Alphanumeric {
            for items in [&mut listings.all, &mut listings.files, &mut listings.folders] {
                items.sort_by_cached_key(|item| item.to_lowercase());
            }
        }
        listings
    }

    pub fn get(&self, kind: ItemKind) -> &[String] {
        match kind {
            ItemKind::All => &self.all,
            ItemKind::Files => &self.files,
            ItemKind::Folders => &self.folders,
        }
    }
}
