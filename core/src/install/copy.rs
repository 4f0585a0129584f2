use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

pub const MARKER_FILE: &str = "SKILL.md";

/// Recursively copies `src` to `dst`. Symlinks are followed and their
/// targets copied. `dst` must not exist: the copy never merges.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

pub fn has_marker(dir: &Path) -> bool {
    dir.join(MARKER_FILE).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_nested_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("scripts/lib")).unwrap();
        fs::write(src.join(MARKER_FILE), "# Review\n").unwrap();
        fs::write(src.join("scripts/lib/run.sh"), "echo hi\n").unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst = tmp.path().join("dst");
        copy_tree(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join(MARKER_FILE)).unwrap(), "# Review\n");
        assert_eq!(
            fs::read_to_string(dst.join("scripts/lib/run.sh")).unwrap(),
            "echo hi\n"
        );
        assert!(dst.join("empty").is_dir());
        assert!(has_marker(&dst));
    }

    #[test]
    fn refuses_to_merge_into_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "new").unwrap();

        let dst = tmp.path().join("dst");
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("keep.txt"), "old").unwrap();

        let err = copy_tree(&src, &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(!dst.join("a.txt").exists());
    }

    #[test]
    fn marker_must_be_a_file() {
        let tmp = TempDir::new().unwrap();
        assert!(!has_marker(tmp.path()));

        fs::create_dir_all(tmp.path().join(MARKER_FILE)).unwrap();
        assert!(!has_marker(tmp.path()));
    }
}
