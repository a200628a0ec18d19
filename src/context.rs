//! Environment facts gathered once at startup.
//!
//! Collects information about the local system so the prompt can steer the
//! model toward commands that actually work here. Detection is best-effort:
//! anything we cannot determine degrades to `None` or `Os::Other`, never to
//! an error.

use std::fmt;

/// Operating system family, as the prompt names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
    /// Unknown or unsupported platform; omitted from the prompt.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Os::Linux => "linux",
            Os::MacOs => "macOS",
            Os::Windows => "windows",
            Os::Other => "other",
        };
        f.write_str(name)
    }
}

/// Read-only facts about the local environment, captured at process start.
#[derive(Debug, Clone)]
pub struct EnvContext {
    /// Operating system family.
    pub os: Os,
    /// Linux distribution (or macOS version) pretty name.
    pub distro: Option<String>,
    /// Shell name, e.g. `zsh` (basename of `$SHELL`).
    pub shell: Option<String>,
    /// Home directory path.
    pub home_dir: Option<String>,
}

/// Gather the environment context for this process.
pub fn gather() -> EnvContext {
    EnvContext {
        os: detect_os(),
        distro: detect_distro(),
        shell: detect_shell(),
        home_dir: dirs::home_dir().map(|p| p.display().to_string()),
    }
}

fn detect_os() -> Os {
    match std::env::consts::OS {
        "linux" => Os::Linux,
        "macos" => Os::MacOs,
        "windows" => Os::Windows,
        _ => Os::Other,
    }
}

/// Shell name from `$SHELL`, reduced to its basename.
fn detect_shell() -> Option<String> {
    let shell = std::env::var("SHELL").ok()?;
    let name = shell.rsplit('/').next().unwrap_or(&shell);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Distribution info from /etc/os-release (Linux) or sw_vers (macOS).
fn detect_distro() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(contents) = std::fs::read_to_string("/etc/os-release") {
            for line in contents.lines() {
                if let Some(pretty_name) = line.strip_prefix("PRETTY_NAME=") {
                    let name = pretty_name.trim_matches('"');
                    if !name.is_empty() {
                        return Some(name.to_string());
                    }
                }
            }
        }
        None
    }

    #[cfg(target_os = "macos")]
    {
        use std::process::Command;
        if let Ok(output) = Command::new("sw_vers").arg("-productVersion").output() {
            if output.status.success() {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !version.is_empty() {
                    return Some(format!("macOS {}", version));
                }
            }
        }
        None
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_display() {
        assert_eq!(Os::Linux.to_string(), "linux");
        assert_eq!(Os::MacOs.to_string(), "macOS");
        assert_eq!(Os::Windows.to_string(), "windows");
        assert_eq!(Os::Other.to_string(), "other");
    }

    #[test]
    fn test_detect_os_matches_build_target() {
        let os = detect_os();
        #[cfg(target_os = "linux")]
        assert_eq!(os, Os::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(os, Os::MacOs);
        #[cfg(target_os = "windows")]
        assert_eq!(os, Os::Windows);
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        assert_eq!(os, Os::Other);
    }
}
