//! Hook management commands
//!
//! `run` fires a hook point the same way the tray commands do; the rest
//! help users set up and inspect their hooks directory.

use anyhow::{Context, Result, bail};
use clap::Args;
use intray_hooks::{HookScript, KNOWN_HOOK_POINTS, resolver};
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;

/// Fire a hook point
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Hook point to fire, e.g. pre-add
    #[arg(value_name = "POINT")]
    pub point: String,

    /// Variables exported to every script, as KEY=VALUE
    #[arg(value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

impl Command for RunCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        context
            .engine
            .run(&self.point, &self.vars)
            .with_context(|| format!("Hook point '{}' aborted", self.point))
    }
}

/// List hook scripts
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only list scripts for this hook point
    #[arg(value_name = "POINT")]
    pub point: Option<String>,

    /// Output format (simple, json)
    #[arg(short, long, default_value = "simple")]
    pub format: String,
}

impl Command for ListCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let Some(hooks_dir) = context.hooks_dir() else {
            bail!("Could not determine the hooks directory");
        };

        let points: Vec<String> = match &self.point {
            Some(point) => vec![point.clone()],
            None => KNOWN_HOOK_POINTS.iter().map(ToString::to_string).collect(),
        };

        let mut listing = Vec::with_capacity(points.len());
        for point in points {
            let scripts = context.engine.scripts(&point)?;
            let enabled = context.engine.is_enabled(&point);
            listing.push((point, enabled, scripts));
        }

        match self.format.as_str() {
            "json" => print_json(&hooks_dir.display().to_string(), &listing),
            "simple" => {
                print_simple(&hooks_dir.display().to_string(), &listing);
                Ok(())
            }
            other => bail!("Unknown format '{other}' (expected simple or json)"),
        }
    }
}

fn print_json(hooks_dir: &str, listing: &[(String, bool, Vec<HookScript>)]) -> Result<()> {
    let points: Vec<_> = listing
        .iter()
        .map(|(point, enabled, scripts)| {
            serde_json::json!({
                "point": point,
                "enabled": enabled,
                "scripts": scripts
                    .iter()
                    .map(|s| s.path.display().to_string())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    let json = serde_json::json!({
        "hooks_dir": hooks_dir,
        "points": points,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_simple(hooks_dir: &str, listing: &[(String, bool, Vec<HookScript>)]) {
    println!("Hooks directory: {}", hooks_dir.cyan());

    for (point, enabled, scripts) in listing {
        let state = if *enabled {
            String::new()
        } else {
            format!(" {}", "(disabled)".yellow())
        };
        println!();
        println!("{} ({} scripts){}", point.bold(), scripts.len(), state);
        if scripts.is_empty() {
            println!("  {}", "none".dimmed());
        }
        for script in scripts {
            println!("  • {}", script.name.green());
        }
    }
}

/// Create the hooks directory layout
#[derive(Debug, Args)]
pub struct InitCommand;

impl Command for InitCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let Some(hooks_dir) = context.hooks_dir() else {
            bail!("Could not determine the hooks directory");
        };

        let created = resolver::scaffold(&hooks_dir)
            .with_context(|| format!("Failed to create hooks in {}", hooks_dir.display()))?;

        if created.is_empty() {
            println!("Hooks directory already set up: {}", hooks_dir.display().cyan());
            return Ok(());
        }

        println!("Initialized hooks in {}", hooks_dir.display().cyan());
        for dir in &created {
            println!("  {} {}", "created".green(), dir.display());
        }
        println!(
            "\nAdd executable scripts such as {} to run them.",
            "pre-add/01-notify.sh".bold()
        );
        Ok(())
    }
}

/// Print the hooks directory
#[derive(Debug, Args)]
pub struct DirCommand;

impl Command for DirCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let Some(hooks_dir) = context.hooks_dir() else {
            bail!("Could not determine the hooks directory");
        };
        println!("{}", hooks_dir.display());
        Ok(())
    }
}
