use std::fmt;
use std::str::FromStr;

/// Name of the reserved variable that selects the shell for a block.
pub const SHELL_VAR: &str = "shell";

/// Shell used to run prep commands.
///
/// Selected per block through the `shell` variable. Parsing only checks the
/// name; whether the program is actually installed is checked each time a
/// block runs (see [`Shell::ensure_installed`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Sh,
    Bash,
    Zsh,
    Powershell,
    Pwsh,
    Cmd,
}

impl Default for Shell {
    fn default() -> Self {
        if cfg!(windows) { Shell::Cmd } else { Shell::Sh }
    }
}

impl Shell {
    /// Executable looked up on `PATH`.
    pub fn program(self) -> &'static str {
        match self {
            Shell::Sh => "sh",
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Powershell => "powershell",
            Shell::Pwsh => "pwsh",
            Shell::Cmd => "cmd",
        }
    }

    /// Argument that makes the shell run the next argument as a command.
    pub fn command_flag(self) -> &'static str {
        match self {
            Shell::Sh | Shell::Bash | Shell::Zsh => "-c",
            Shell::Powershell | Shell::Pwsh => "-Command",
            Shell::Cmd => "/C",
        }
    }

    /// Resolve the value of the `shell` variable. Empty or missing means the
    /// platform default.
    pub fn resolve(name: Option<&str>) -> Result<Self, String> {
        match name.map(str::trim) {
            None | Some("") => Ok(Shell::default()),
            Some(name) => name.parse(),
        }
    }

    /// Check that the shell can be found on `PATH`.
    pub fn ensure_installed(self) -> Result<(), String> {
        which::which(self.program())
            .map(|_| ())
            .map_err(|e| format!("shell '{}' is not available: {e}", self.program()))
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Shell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sh" => Ok(Shell::Sh),
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "powershell" => Ok(Shell::Powershell),
            "pwsh" => Ok(Shell::Pwsh),
            "cmd" => Ok(Shell::Cmd),
            other => Err(format!(
                "unknown shell: {other} (expected one of sh, bash, zsh, powershell, pwsh, cmd)"
            )),
        }
    }
}
