// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Notemap CLI entrypoint.
//!
//! Opens the map panel for a vault folder (or the built-in demo corpus) in the terminal. Logs go
//! to a file because the terminal belongs to the UI.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use notemap::builder::NoteMarkerBuilder;
use notemap::config::{MapSettings, SettingsFile};
use notemap::store::{demo_documents, DocumentIndex, MemoryIndex, VaultFolder, WriteDurability};
use notemap::tui::{EditorHost, MapShell, ShellOptions};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NOTEMAP_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<vault-dir>] [--settings <file>] [--tags <a,b>] [--log <file>] [--durable-writes]\n  {program} [--vault <dir>] [--settings <file>] [--tags <a,b>] [--log <file>] [--durable-writes]\n  {program} --demo [--tags <a,b>] [--log <file>]\n\nIf vault-dir/--vault is omitted, the current working directory is used.\nSettings default to <vault-dir>/notemap.settings.json; --demo keeps them in memory.\n--tags applies an initial tag filter (comma separated).\n--log selects the log file (default: $TMPDIR/notemap.log); {LOG_ENV} sets the filter.\n\n--durable-writes opts into slower, best-effort durable settings writes (fsync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    vault_dir: Option<String>,
    settings_file: Option<String>,
    tags: Option<String>,
    log_file: Option<String>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    fn set_once(slot: &mut Option<String>, value: Option<String>) -> Result<(), ()> {
        if slot.is_some() {
            return Err(());
        }
        *slot = Some(value.ok_or(())?);
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--vault" => set_once(&mut options.vault_dir, args.next())?,
            "--settings" => set_once(&mut options.settings_file, args.next())?,
            "--tags" => set_once(&mut options.tags, args.next())?,
            "--log" => set_once(&mut options.log_file, args.next())?,
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut options.vault_dir, Some(arg))?,
        }
    }

    if options.demo && (options.vault_dir.is_some() || options.settings_file.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn init_logging(log_file: Option<&str>) -> Result<PathBuf, Box<dyn Error>> {
    let path = log_file
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("notemap.log"));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;
    Ok(path)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "notemap".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let log_path = init_logging(options.log_file.as_deref())?;
        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::Fast
        };

        let (index, settings, settings_file, host): (Arc<dyn DocumentIndex>, _, _, _) =
            if options.demo {
                let index: Arc<dyn DocumentIndex> = Arc::new(MemoryIndex::new(demo_documents()));
                (index, MapSettings::default(), None, EditorHost::new(None))
            } else {
                let dir = options.vault_dir.unwrap_or_else(|| ".".to_owned());
                let folder = VaultFolder::new(dir);
                let settings_file = match options.settings_file {
                    Some(path) => SettingsFile::new(path),
                    None => SettingsFile::in_vault(folder.root()),
                }
                .with_durability(durability);
                let settings = settings_file.load_or_default()?;
                let host = EditorHost::new(Some(folder.clone()));
                let index: Arc<dyn DocumentIndex> = Arc::new(folder);
                (index, settings, Some(settings_file), host)
            };

        tracing::info!(
            demo = options.demo,
            log = %log_path.display(),
            "starting notemap"
        );

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(async move {
            let shell = MapShell::new(
                index,
                Arc::new(NoteMarkerBuilder),
                ShellOptions {
                    settings,
                    settings_file,
                    host,
                    initial_tags: options.tags,
                },
            )?;
            shell.run().await
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("notemap: {err}");
        std::process::exit(1);
    }
}
