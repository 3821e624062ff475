// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `export` command: emit service definitions for another process
//! manager. Only the upstart format exists.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;

pub fn run(app: &App, format: &str, location: &Path) -> Result<()> {
    std::fs::create_dir_all(location)
        .with_context(|| format!("create {}", location.display()))?;

    if format == "upstart" {
        return upstart(app, location);
    }
    Ok(())
}

fn upstart(app: &App, location: &Path) -> Result<()> {
    let taskfile = std::path::absolute(&app.flags.taskfile)
        .with_context(|| format!("resolve {}", app.flags.taskfile))?;
    let base = taskfile.parent().unwrap_or(Path::new("/"));
    let env = parse_env_file(&base.join(".env"))?;

    for (index, proc) in app.stored.all().iter().enumerate() {
        let name = proc.name();
        let mut conf = String::new();
        let _ = writeln!(conf, "start on starting app-{name}");
        let _ = writeln!(conf, "stop on stopping app-{name}");
        let _ = writeln!(conf, "respawn");
        let _ = writeln!(conf);
        let _ = writeln!(conf, "env PORT={}", app.flags.base_port + index as u16);
        for (key, value) in &env {
            let _ = writeln!(conf, "env {key}='{}'", value.replace('\'', "\\'"));
        }
        let _ = writeln!(conf);
        let _ = writeln!(conf, "setuid app");
        let _ = writeln!(conf);
        let _ = writeln!(conf, "chdir {}", base.display());
        let _ = writeln!(conf);
        let _ = writeln!(conf, "exec {}", proc.spec.cmdline.join(" "));

        let path = location.join(format!("app-{name}.conf"));
        std::fs::write(&path, conf).with_context(|| format!("write {}", path.display()))?;
    }

    Ok(())
}

/// Raw key=value pairs from a dotenv file, `export` prefixes stripped.
fn parse_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;

    let mut env = BTreeMap::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().trim_start_matches("export ").trim();
        env.insert(key.to_string(), value.trim().to_string());
    }
    Ok(env)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
