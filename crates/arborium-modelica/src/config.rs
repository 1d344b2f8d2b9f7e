//! Where to look for a compiled Modelica grammar at runtime.

use std::ffi::OsString;
use std::path::PathBuf;

/// Explicit path to a compiled grammar library.
pub const LIBRARY_ENV: &str = "ARBORIUM_MODELICA_LIBRARY";

/// Extra directories to search, in the platform's path-list syntax.
pub const SEARCH_PATH_ENV: &str = "ARBORIUM_GRAMMAR_PATH";

/// Configuration for locating a shared-library grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// A specific library file. Takes precedence over `search_paths`.
    pub library: Option<PathBuf>,
    /// Directories searched for [`library_file_name`] in order.
    pub search_paths: Vec<PathBuf>,
    /// Exported symbol returning the `TSLanguage` pointer.
    pub symbol: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            library: None,
            search_paths: Vec::new(),
            symbol: crate::LANGUAGE_SYMBOL.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Reads [`LIBRARY_ENV`] and [`SEARCH_PATH_ENV`], then appends the
    /// per-user and executable-relative grammar directories.
    pub fn from_env() -> Self {
        let mut config = Self::from_vars(|key| std::env::var_os(key), dirs::data_local_dir());
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            config.search_paths.push(dir.join("grammars"));
        }
        config
    }

    fn from_vars(var: impl Fn(&str) -> Option<OsString>, data_dir: Option<PathBuf>) -> Self {
        let library = var(LIBRARY_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let mut search_paths: Vec<PathBuf> = var(SEARCH_PATH_ENV)
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();
        search_paths.retain(|path| !path.as_os_str().is_empty());

        if let Some(data) = data_dir {
            search_paths.push(data.join("arborium").join("grammars"));
        }

        Self {
            library,
            search_paths,
            ..Self::default()
        }
    }

    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Candidate library files in lookup order.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let file_name = library_file_name(crate::GRAMMAR_ID);
        self.library.iter().cloned().chain(
            self.search_paths
                .iter()
                .map(move |dir| dir.join(&file_name)),
        )
    }

    /// The first candidate that exists on disk.
    pub fn resolve(&self) -> Option<PathBuf> {
        self.candidates().find(|path| path.is_file())
    }
}

/// Platform-specific file name of a compiled grammar library.
pub fn library_file_name(grammar_id: &str) -> String {
    let safe_name = grammar_id.replace('-', "_");
    #[cfg(target_os = "macos")]
    {
        format!("lib{safe_name}.dylib")
    }
    #[cfg(target_os = "windows")]
    {
        format!("{safe_name}.dll")
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        format!("lib{safe_name}.so")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_library_file_name() {
        let name = library_file_name("modelica");
        #[cfg(target_os = "linux")]
        assert_eq!(name, "libmodelica.so");
        #[cfg(target_os = "macos")]
        assert_eq!(name, "libmodelica.dylib");
        #[cfg(target_os = "windows")]
        assert_eq!(name, "modelica.dll");
    }

    #[test]
    fn library_env_comes_first() {
        let config = LoaderConfig::from_vars(
            vars(&[
                (LIBRARY_ENV, "/opt/modelica/custom.so"),
                (SEARCH_PATH_ENV, "/srv/grammars"),
            ]),
            None,
        );

        let candidates: Vec<_> = config.candidates().collect();
        assert_eq!(candidates[0], PathBuf::from("/opt/modelica/custom.so"));
        assert_eq!(
            candidates[1],
            PathBuf::from("/srv/grammars").join(library_file_name("modelica"))
        );
        assert_eq!(config.symbol, "tree_sitter_modelica");
    }

    #[test]
    fn empty_library_env_is_ignored() {
        let config = LoaderConfig::from_vars(vars(&[(LIBRARY_ENV, "")]), None);
        assert_eq!(config.library, None);
    }

    #[cfg(unix)]
    #[test]
    fn data_dir_is_searched_last() {
        let config = LoaderConfig::from_vars(
            vars(&[(SEARCH_PATH_ENV, "/a:/b")]),
            Some(PathBuf::from("/data")),
        );
        assert_eq!(
            config.search_paths,
            vec![
                PathBuf::from("/a"),
                PathBuf::from("/b"),
                PathBuf::from("/data/arborium/grammars"),
            ]
        );
    }

    #[test]
    fn from_env_searches_platform_data_dir() {
        let config = LoaderConfig::from_env();
        if let Some(data) = dirs::data_local_dir() {
            assert!(
                config
                    .search_paths
                    .contains(&data.join("arborium").join("grammars"))
            );
        }
        assert_eq!(config.symbol, crate::LANGUAGE_SYMBOL);
    }

    #[test]
    fn resolve_finds_first_existing_file() {
        let missing = tempfile::tempdir().unwrap();
        let present = tempfile::tempdir().unwrap();
        let library = present.path().join(library_file_name("modelica"));
        std::fs::write(&library, b"").unwrap();

        let config = LoaderConfig::default()
            .with_search_path(missing.path())
            .with_search_path(present.path());

        assert_eq!(config.resolve(), Some(library));
    }

    #[test]
    fn resolve_without_candidates_is_none() {
        assert_eq!(LoaderConfig::default().resolve(), None);
    }
}
