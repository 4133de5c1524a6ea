//! Directory resolution abstraction for platform-specific paths.
//!
//! Wrapping `directories-next` behind [`BaseDirs`] lets configuration
//! discovery be tested without touching the real user profile.

use camino::Utf8PathBuf;
use std::path::PathBuf;

/// Directory under the user configuration root shared by envm tools.
pub const APP_DIR: &str = "envm";
/// Configuration file name for this tool.
pub const CONFIG_FILE_NAME: &str = "fetch.toml";

/// Source of platform base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's configuration root (e.g. `~/.config` on Linux).
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn config_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
    }
}

/// Location of the default configuration file, if one can be determined.
///
/// Returns `None` when the platform has no configuration root or the root
/// is not valid UTF-8.
#[must_use]
pub fn default_config_path(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    let root = Utf8PathBuf::from_path_buf(dirs.config_dir()?).ok()?;
    Some(root.join(APP_DIR).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_lives_under_envm() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_config_dir()
            .returning(|| Some(PathBuf::from("/home/test/.config")));

        assert_eq!(
            default_config_path(&dirs),
            Some(Utf8PathBuf::from("/home/test/.config/envm/fetch.toml"))
        );
    }

    #[test]
    fn missing_config_root_yields_none() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_config_dir().return_once(|| None);
        assert!(default_config_path(&dirs).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_config_root_yields_none() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut dirs = MockBaseDirs::new();
        dirs.expect_config_dir().return_once(|| {
            Some(PathBuf::from(OsString::from_vec(vec![
                b'/', b't', b'm', b'p', b'/', 0xff,
            ])))
        });
        assert!(default_config_path(&dirs).is_none());
    }
}
