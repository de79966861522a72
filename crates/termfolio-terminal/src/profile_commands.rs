//! Static portfolio commands: motd, welcome, banner, about, contact,
//! socials, neofetch, system.
//!
//! Content comes from the `[profile]` table of the configuration, except
//! `system`, which samples the host through
//! [`SystemMonitor`](crate::monitor::SystemMonitor).

use termfolio_types::error::Result;

use crate::interpreter::{Command, CommandOutput, Environment};

const BANNER: &str = r"  _                       __       _ _
 | |_ ___ _ __ _ __ ___  / _| ___ | (_) ___
 | __/ _ \ '__| '_ ` _ \| |_ / _ \| | |/ _ \
 | ||  __/ |  | | | | | |  _| (_) | | | (_) |
  \__\___|_|  |_| |_| |_|_|  \___/|_|_|\___/";

const LOGO: [&str; 6] = [
    r"   ______   ",
    r"  / ____ \  ",
    r" | |    | | ",
    r" | | >_ | | ",
    r" | |____| | ",
    r"  \______/  ",
];

// ---------------------------------------------------------------------------
// motd
// ---------------------------------------------------------------------------

pub(crate) struct MotdCmd;
impl Command for MotdCmd {
    fn name(&self) -> &str {
        "motd"
    }
    fn description(&self) -> &str {
        "Displays the message of the day."
    }
    fn usage(&self) -> &str {
        "motd"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(env.config.profile.motd.clone()))
    }
}

// ---------------------------------------------------------------------------
// welcome
// ---------------------------------------------------------------------------

pub(crate) struct WelcomeCmd;
impl Command for WelcomeCmd {
    fn name(&self) -> &str {
        "welcome"
    }
    fn description(&self) -> &str {
        "Displays the welcome message."
    }
    fn usage(&self) -> &str {
        "welcome"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(welcome_text()))
    }
}

/// Greeting printed at session start and by `welcome`.
pub fn welcome_text() -> String {
    [
        "Booting up terminal...",
        "Welcome to my portfolio!",
        "Type 'help' to see available commands.",
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// banner
// ---------------------------------------------------------------------------

pub(crate) struct BannerCmd;
impl Command for BannerCmd {
    fn name(&self) -> &str {
        "banner"
    }
    fn description(&self) -> &str {
        "Displays the banner."
    }
    fn usage(&self) -> &str {
        "banner"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(BANNER.to_string()))
    }
}

// ---------------------------------------------------------------------------
// about
// ---------------------------------------------------------------------------

pub(crate) struct AboutCmd;
impl Command for AboutCmd {
    fn name(&self) -> &str {
        "about"
    }
    fn description(&self) -> &str {
        "Displays information about me."
    }
    fn usage(&self) -> &str {
        "about"
    }
    fn category(&self) -> &str {
        "About Me"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let p = &env.config.profile;
        let mut lines = vec![
            format!("{} - {}", p.name, p.title),
            format!("Location: {}", p.location),
            String::new(),
            p.bio.clone(),
        ];
        if let Some(site) = &p.website {
            lines.push(String::new());
            lines.push(format!("Website: {site}"));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// contact
// ---------------------------------------------------------------------------

pub(crate) struct ContactCmd;
impl Command for ContactCmd {
    fn name(&self) -> &str {
        "contact"
    }
    fn description(&self) -> &str {
        "Displays my contact information."
    }
    fn usage(&self) -> &str {
        "contact"
    }
    fn category(&self) -> &str {
        "About Me"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let user = &env.config.github_username;
        Ok(CommandOutput::Text(format!(
            "You can reach me at:\n  Email:  {}\n  GitHub: https://github.com/{user}",
            env.config.profile.email
        )))
    }
}

// ---------------------------------------------------------------------------
// socials
// ---------------------------------------------------------------------------

pub(crate) struct SocialsCmd;
impl Command for SocialsCmd {
    fn name(&self) -> &str {
        "socials"
    }
    fn description(&self) -> &str {
        "Displays my social media links."
    }
    fn usage(&self) -> &str {
        "socials"
    }
    fn category(&self) -> &str {
        "About Me"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let socials = &env.config.profile.socials;
        if socials.is_empty() {
            return Ok(CommandOutput::Text("No social links configured.".to_string()));
        }
        let mut out = String::from("You can find me on the following platforms:");
        for link in socials {
            out.push_str(&format!("\n  {:<10} {}", link.name, link.url));
        }
        Ok(CommandOutput::Text(out))
    }
}

// ---------------------------------------------------------------------------
// neofetch
// ---------------------------------------------------------------------------

pub(crate) struct NeofetchCmd;
impl Command for NeofetchCmd {
    fn name(&self) -> &str {
        "neofetch"
    }
    fn description(&self) -> &str {
        "Displays system information."
    }
    fn usage(&self) -> &str {
        "neofetch"
    }
    fn category(&self) -> &str {
        "System"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let secs = env.started_at.elapsed().as_secs();
        let info = [
            "guest@termfolio".to_string(),
            "---------------".to_string(),
            format!("Name:     {}", env.config.profile.name),
            format!("Role:     {}", env.config.profile.title),
            format!("Shell:    termfolio {}", env!("CARGO_PKG_VERSION")),
            format!("Theme:    {}", env.theme.current()),
            format!("Commands: {}", env.registry.len()),
            format!("Uptime:   {}", format_uptime(secs)),
        ];

        let rows = LOGO.len().max(info.len());
        let mut lines = Vec::with_capacity(rows);
        for i in 0..rows {
            let logo = LOGO.get(i).copied().unwrap_or("            ");
            let text = info.get(i).map(String::as_str).unwrap_or("");
            lines.push(format!("{logo}  {text}").trim_end().to_string());
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// system
// ---------------------------------------------------------------------------

/// Cells in a resource bar.
const BAR_WIDTH: usize = 10;

pub(crate) struct SystemCmd;
impl Command for SystemCmd {
    fn name(&self) -> &str {
        "system"
    }
    fn description(&self) -> &str {
        "Displays the system monitor."
    }
    fn usage(&self) -> &str {
        "system"
    }
    fn category(&self) -> &str {
        "System"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(monitor) = env.monitor else {
            return Ok(CommandOutput::Text(
                "system: no system monitor available".to_string(),
            ));
        };
        let stats = monitor.sample()?;
        let lines = [
            "System Monitor".to_string(),
            stat_bar("CPU", stats.cpu),
            stat_bar("Memory", stats.memory),
            stat_bar("Disk", stats.disk),
        ];
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

/// `CPU    [#####.....]  50%`. Unknown readings show an empty bar and `n/a`.
fn stat_bar(name: &str, percent: Option<u8>) -> String {
    match percent {
        Some(pct) => {
            let pct = pct.min(100);
            let filled = usize::from(pct) * BAR_WIDTH / 100;
            format!(
                "{name:<6} [{}{}] {pct:>3}%",
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH - filled)
            )
        },
        None => format!("{name:<6} [{}]  n/a", ".".repeat(BAR_WIDTH)),
    }
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let s = secs % 60;
    if hours > 0 {
        format!("{hours}h {mins}m {s}s")
    } else if mins > 0 {
        format!("{mins}m {s}s")
    } else {
        format!("{s}s")
    }
}
