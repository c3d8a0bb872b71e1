use std::path::PathBuf;

/// Directories where user-level tool installs commonly land but which are
/// missing from a non-interactive PATH.
fn extra_bin_dirs() -> Vec<PathBuf> {
    let mut dirs_list = Vec::new();

    if let Some(home) = dirs::home_dir() {
        dirs_list.push(home.join(".local").join("bin"));
        dirs_list.push(home.join(".npm-global").join("bin"));
        dirs_list.push(home.join(".yarn").join("bin"));
        dirs_list.push(home.join(".bun").join("bin"));
        dirs_list.push(home.join(".claude").join("bin"));
    }

    #[cfg(target_os = "macos")]
    {
        dirs_list.push(PathBuf::from("/opt/homebrew/bin"));
        dirs_list.push(PathBuf::from("/usr/local/bin"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs_list.push(PathBuf::from("/usr/local/bin"));
        dirs_list.push(PathBuf::from("/home/linuxbrew/.linuxbrew/bin"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = dirs::data_dir() {
            dirs_list.push(appdata.join("npm"));
        }
    }

    dirs_list
}

/// Build a PATH value that approximates the user's interactive session, so
/// probes find tools installed via npm, Homebrew, or vendor scripts without
/// going through a login shell.
pub fn enhanced_path() -> String {
    let current = std::env::var("PATH").unwrap_or_default();

    let mut parts: Vec<String> = std::env::split_paths(&current)
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    for dir in extra_bin_dirs() {
        let dir = dir.to_string_lossy().into_owned();
        if !parts.iter().any(|p| p == &dir) {
            parts.push(dir);
        }
    }

    std::env::join_paths(parts.iter().map(std::ffi::OsString::from))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or(current)
}
