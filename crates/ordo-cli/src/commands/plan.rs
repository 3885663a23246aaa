//! Handler for `ordo plan`.

use std::path::Path;

use miette::Result;
use ordo_core::plan::{Plan, Step};
use ordo_resolver::{Resolution, Resolver};
use ordo_util::status::{status, status_warn};

pub fn exec(file: &Path, warn_on_missing: bool, tree: bool) -> Result<()> {
    let resolution = resolve_file(file, warn_on_missing)?;
    status("Resolved", &format!("{} steps", resolution.len()));

    if tree {
        print!("{}", resolution.render_tree());
    } else {
        for (i, step) in resolution.iter().enumerate() {
            println!("{:>3}. {step}", i + 1);
        }
    }
    Ok(())
}

/// Load the plan at `file` and resolve it.
///
/// The plan's `[resolver]` table is the base configuration, then the
/// environment override, then `force_warn`.
pub(crate) fn resolve_file(file: &Path, force_warn: bool) -> Result<Resolution<Step>> {
    let plan = Plan::from_path(file)?;
    let mut config = plan.resolver.with_env_overrides()?;
    if force_warn {
        config.warn_on_missing_dependencies = true;
    }
    tracing::debug!("resolving {} steps with {config:?}", plan.steps.len());

    let mut resolver = Resolver::with_config(config);
    resolver.add_all(plan.steps);
    let resolution = resolver.resolve()?;

    if let Some(report) = resolution.unresolved() {
        for entry in report.entries() {
            status_warn(
                "Missing",
                &format!("{}: {}", entry.source_name, entry.dependencies.join(", ")),
            );
        }
    }
    Ok(resolution)
}
