pub mod folders;

pub use folders::{ensure_folder, make_directory, FolderStatus};
