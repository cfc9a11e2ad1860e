//! Where tests look for sample files and write scratch output.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or(manifest)
}

/// Look for a netCDF sample under `$TEST_DATA_DIR`, then
/// `crates/netcdf-parser/testdata/`, then `testdata/` at the root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    std::env::var_os("TEST_DATA_DIR")
        .map(PathBuf::from)
        .into_iter()
        .chain([
            root.join("crates").join("netcdf-parser").join("testdata"),
            root.join("testdata"),
        ])
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// Scratch directory for preset documents and rendered images, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("map_render_test_")
        .tempdir()
        .expect("scratch directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_holds_workspace_manifest() {
        let manifest = workspace_root().join("Cargo.toml");
        let text = std::fs::read_to_string(manifest).unwrap();
        assert!(text.contains("[workspace]"));
    }

    #[test]
    fn test_unknown_sample_is_none() {
        assert_eq!(find_test_file("no_such_reanalysis.nc"), None);
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let dir = temp_test_dir();
        let path = dir.path().to_path_buf();
        assert!(path.is_dir());
        drop(dir);
        assert!(!path.exists());
    }
}
