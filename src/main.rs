use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};

use backdrop::app::App;
use backdrop::catalog;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const RUN_USAGE: &str = "backdrop run <data-dir> [--seed <u64>]";
const INSPECT_USAGE: &str = "backdrop inspect <data-dir>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("run") => {
            let dir = args.next().context(RUN_USAGE)?;
            let seed = match args.next().as_deref() {
                Some("--seed") => {
                    let value = args.next().context(RUN_USAGE)?;
                    Some(value.parse().with_context(|| format!("bad seed {value:?}"))?)
                }
                Some(other) => bail!("unknown argument {other:?}\n\nUsage:\n  {RUN_USAGE}"),
                None => None,
            };
            App::new(Path::new(&dir), seed).run()
        }
        Some("inspect") => {
            let dir = args.next().context(INSPECT_USAGE)?;
            inspect(Path::new(&dir))
        }
        _ => bail!(
            "Backdrop — two-layer animated background driver\n\nUsage:\n  {RUN_USAGE}\n  {INSPECT_USAGE}"
        ),
    }
}

/// Load both documents once and print the resolved catalog, group by group.
fn inspect(dir: &Path) -> Result<()> {
    let catalog = catalog::load_catalog(dir)?;
    println!(
        "{} groups, {} enemy configurations",
        catalog.group_count(),
        catalog.config_count(),
    );

    for id in catalog.group_ids() {
        let enemies = catalog.enemies_in_group(id).unwrap_or_default();
        let names: Vec<&str> = enemies.iter().map(|config| config.name.as_str()).collect();
        println!(
            "group {id}: {}",
            if names.is_empty() {
                "(no enemies)".to_string()
            } else {
                names.join(", ")
            }
        );
    }
    Ok(())
}
