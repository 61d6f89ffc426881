use std::path::{Component, Path, PathBuf};

/// Renders a path for log and error messages as absolute as the filesystem allows.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> BestEffortPathExt for P {
    fn best_effort_path_display(&self) -> String {
        let path = self.as_ref();
        match path.canonicalize() {
            Ok(canonical) => canonical.display().to_string(),
            Err(_) => lexical_absolute(path).display().to_string(),
        }
    }
}

/// Absolute form of `path` with `.` and `..` resolved without touching the filesystem.
fn lexical_absolute(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .components()
        .fold(PathBuf::new(), |mut normalized, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
            normalized
        })
}
