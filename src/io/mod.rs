pub mod fs;
pub mod repo;

pub use fs::{
    build_globset, files_matching, is_markdown, markdown_files_under, read_to_string,
    resolve_files, write_atomic,
};
pub use repo::{is_adr_file_name, RepoLayout};
