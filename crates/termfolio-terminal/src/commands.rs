//! Built-in commands: help, clear, echo, sudo, date, whoami, history, theme.

use termfolio_types::error::Result;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};
use crate::network_commands::{GithubCmd, ProjectsCmd, WeatherCmd};
use crate::profile_commands::{
    AboutCmd, BannerCmd, ContactCmd, MotdCmd, NeofetchCmd, SocialsCmd, SystemCmd, WelcomeCmd,
};

/// Usage text printed by `echo --help`.
pub const ECHO_USAGE: &str = "Usage: echo [text...]\nPrint the given words separated by single spaces.";

/// Register every built-in command (general, profile, network) into a registry.
///
/// Registration order is the order `help` lists commands in.
pub fn register_builtins(reg: &mut CommandRegistry) -> Result<()> {
    // General.
    reg.register(Box::new(HelpCmd))?;
    reg.register(Box::new(ClearCmd))?;
    reg.register(Box::new(MotdCmd))?;
    reg.register(Box::new(WelcomeCmd))?;
    reg.register(Box::new(SudoCmd))?;
    reg.register(Box::new(EchoCmd))?;
    reg.register(Box::new(DateCmd))?;
    reg.register(Box::new(WhoamiCmd))?;
    reg.register(Box::new(HistoryCmd))?;
    reg.register(Box::new(BannerCmd))?;
    // About Me.
    reg.register(Box::new(AboutCmd))?;
    reg.register(Box::new(ProjectsCmd))?;
    reg.alias("ls", "projects")?;
    reg.register(Box::new(ContactCmd))?;
    reg.register(Box::new(GithubCmd))?;
    reg.register(Box::new(SocialsCmd))?;
    // System.
    reg.register(Box::new(NeofetchCmd))?;
    reg.register(Box::new(SystemCmd))?;
    reg.register(Box::new(ThemeCmd))?;
    reg.register(Box::new(WeatherCmd))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "Displays this help message."
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            return Ok(CommandOutput::Text(command_help(env.registry, name)));
        }

        let mut out = String::from("Available commands:");
        for category in env.registry.categories() {
            out.push_str(&format!("\n\n{category}"));
            for cmd in env.registry.list_by_category(category) {
                out.push_str(&format!("\n  {:<10}: {}", cmd.name(), cmd.description()));
                let aliases = env.registry.aliases_of(cmd.name());
                if !aliases.is_empty() {
                    out.push_str(&format!(" (alias: {})", aliases.join(", ")));
                }
                if cmd.usage() != cmd.name() {
                    out.push_str(&format!("\n  {:<10}  Usage: {}", "", cmd.usage()));
                }
                if cmd.name() == "theme" {
                    out.push_str(&format!(
                        "\n  {:<10}  Available themes: {}.",
                        "",
                        env.theme.names().join(", ")
                    ));
                }
            }
        }
        out.push_str("\n\nTip: Use Tab for auto-completion, Up/Down for command history.");
        Ok(CommandOutput::Text(out))
    }
}

fn command_help(registry: &CommandRegistry, name: &str) -> String {
    match registry.lookup(name) {
        Ok(cmd) => {
            let mut out = format!("{} ({})\n", cmd.name(), cmd.category());
            out.push_str(&format!("  {}\n", cmd.description()));
            out.push_str(&format!("  Usage: {}", cmd.usage()));
            let aliases = registry.aliases_of(cmd.name());
            if !aliases.is_empty() {
                out.push_str(&format!("\n  Aliases: {}", aliases.join(", ")));
            }
            out
        },
        Err(_) => format!("help: no such command: {name}"),
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clears the terminal history."
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// sudo
// ---------------------------------------------------------------------------

struct SudoCmd;
impl Command for SudoCmd {
    fn name(&self) -> &str {
        "sudo"
    }
    fn description(&self) -> &str {
        "Attempts to run a command as superuser."
    }
    fn usage(&self) -> &str {
        "sudo <command> [args...]"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Ok(CommandOutput::Text("sudo: missing operand".to_string()));
        }
        Ok(CommandOutput::Text(format!(
            "sudo: {}: command not found",
            args.join(" ")
        )))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Echoes the input."
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args == ["--help"] {
            return Ok(CommandOutput::Text(ECHO_USAGE.to_string()));
        }
        Ok(CommandOutput::Text(args.join(" ")))
    }
}

// ---------------------------------------------------------------------------
// date
// ---------------------------------------------------------------------------

struct DateCmd;
impl Command for DateCmd {
    fn name(&self) -> &str {
        "date"
    }
    fn description(&self) -> &str {
        "Displays the current date and time."
    }
    fn usage(&self) -> &str {
        "date"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let now = chrono::Local::now();
        Ok(CommandOutput::Text(
            now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

struct WhoamiCmd;
impl Command for WhoamiCmd {
    fn name(&self) -> &str {
        "whoami"
    }
    fn description(&self) -> &str {
        "Displays the current username."
    }
    fn usage(&self) -> &str {
        "whoami"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text("guest".to_string()))
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "Displays the command history."
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        // The invocation itself is listed last.
        let lines: Vec<String> = env
            .scrollback
            .iter()
            .map(|record| record.input.as_str())
            .chain(std::iter::once(env.input))
            .enumerate()
            .map(|(i, input)| format!("{:>4}  {input}", i + 1))
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// theme
// ---------------------------------------------------------------------------

struct ThemeCmd;
impl Command for ThemeCmd {
    fn name(&self) -> &str {
        "theme"
    }
    fn description(&self) -> &str {
        "Changes the terminal theme."
    }
    fn usage(&self) -> &str {
        "theme [name]"
    }
    fn category(&self) -> &str {
        "System"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let catalog = env.theme.names().join(", ");
        let Some(&name) = args.first() else {
            return Ok(CommandOutput::Text(format!(
                "Available themes: {catalog}."
            )));
        };
        if !env.theme.exists(name) {
            return Ok(CommandOutput::Text(format!(
                "Invalid theme. Available themes: {catalog}."
            )));
        }
        match env.theme.apply(name) {
            Ok(()) => {
                log::info!("Theme changed to {name}");
                Ok(CommandOutput::Text(format!("Theme changed to {name}.")))
            },
            Err(e) => {
                log::warn!("Theme host rejected '{name}': {e}");
                Ok(CommandOutput::Text(format!(
                    "Invalid theme. Available themes: {catalog}."
                )))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::testing::Fixture;
    use crate::scrollback::{HistoryRecord, RecordOutput};
    use crate::theme::ThemeHost;

    fn record(input: &str, idx: u64) -> HistoryRecord {
        HistoryRecord {
            input: input.to_string(),
            output: RecordOutput::Empty,
            sequence_index: idx,
            timestamp: chrono::Local::now(),
        }
    }

    #[test]
    fn echo_joins_args() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("echo a b c"), "a b c");
        assert_eq!(fx.run_text("echo   spaced    out"), "spaced out");
    }

    #[test]
    fn echo_no_args_is_empty() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("echo"), "");
    }

    #[test]
    fn echo_help_prints_usage() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("echo --help"), ECHO_USAGE);
        assert_eq!(fx.run_text("echo --help me"), "--help me");
    }

    #[test]
    fn echo_keeps_argument_case() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("ECHO Hello World"), "Hello World");
    }

    #[test]
    fn sudo_messages() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("sudo"), "sudo: missing operand");
        assert_eq!(
            fx.run_text("sudo rm -rf /"),
            "sudo: rm -rf /: command not found"
        );
    }

    #[test]
    fn whoami_is_guest() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("whoami"), "guest");
    }

    #[test]
    fn date_contains_current_year() {
        let mut fx = Fixture::new();
        let out = fx.run_text("date");
        let year = chrono::Local::now().format("%Y").to_string();
        assert!(out.contains(&year), "date output {out:?} lacks {year}");
    }

    #[test]
    fn clear_emits_signal() {
        let mut fx = Fixture::new();
        assert!(matches!(fx.run("clear"), CommandOutput::Clear));
        assert!(matches!(fx.run("CLEAR now"), CommandOutput::Clear));
    }

    #[test]
    fn history_lists_inputs_in_order() {
        let mut fx = Fixture::new();
        fx.records = vec![record("echo hi", 0), record("whoami", 1)];
        assert_eq!(
            fx.run_text("history"),
            "   1  echo hi\n   2  whoami\n   3  history"
        );
    }

    #[test]
    fn history_on_empty_scrollback_lists_itself() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("  HISTORY  "), "   1  HISTORY");
    }

    #[test]
    fn theme_no_args_lists_catalog() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.run_text("theme"),
            "Available themes: dark, light, matrix, dracula, solarized."
        );
    }

    #[test]
    fn theme_valid_switches() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("theme dracula"), "Theme changed to dracula.");
        assert_eq!(fx.theme.current(), "dracula");
    }

    #[test]
    fn theme_invalid_leaves_theme() {
        let mut fx = Fixture::new();
        let out = fx.run_text("theme xyz");
        assert!(out.starts_with("Invalid theme."));
        for name in crate::theme::builtin_names() {
            assert!(out.contains(name));
        }
        assert_eq!(fx.theme.current(), "dark");
    }

    #[test]
    fn help_lists_categories_in_order() {
        let mut fx = Fixture::new();
        let out = fx.run_text("help");
        assert!(out.starts_with("Available commands:"));
        let general = out.find("\nGeneral").unwrap();
        let about = out.find("\nAbout Me").unwrap();
        let system = out.find("\nSystem").unwrap();
        assert!(general < about && about < system);
        assert!(out.contains("echo      : Echoes the input."));
        assert!(out.contains("Usage: weather [location]"));
        assert!(out.contains("Available themes: dark"));
        assert!(out.contains("(alias: ls)"));
    }

    #[test]
    fn help_does_not_list_aliases_as_commands() {
        let mut fx = Fixture::new();
        let out = fx.run_text("help");
        assert!(!out.contains("\n  ls "));
    }

    #[test]
    fn help_for_single_command() {
        let mut fx = Fixture::new();
        let out = fx.run_text("help THEME");
        assert!(out.starts_with("theme (System)"));
        assert!(out.contains("Usage: theme [name]"));
        let alias = fx.run_text("help ls");
        assert!(alias.starts_with("projects (About Me)"));
        assert!(alias.contains("Aliases: ls"));
    }

    #[test]
    fn help_unknown_command() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run_text("help nope"), "help: no such command: nope");
    }

    #[test]
    fn builtins_register_without_duplicates() {
        let reg = CommandRegistry::with_builtins().unwrap();
        for name in [
            "help", "clear", "motd", "welcome", "sudo", "echo", "date", "whoami", "history",
            "banner", "about", "projects", "contact", "github", "socials", "neofetch", "system",
            "theme", "weather", "ls",
        ] {
            assert!(reg.lookup(name).is_ok(), "missing {name}");
        }
        assert_eq!(reg.categories(), vec!["General", "About Me", "System"]);
    }

    #[test]
    fn registering_builtins_twice_fails() {
        let mut reg = CommandRegistry::with_builtins().unwrap();
        assert!(register_builtins(&mut reg).is_err());
    }
}
