//! `wpr groups`: list group namespaces under the store root.

use serde::Serialize;
use wpr_core::list_groups;

use crate::cmd::Session;
use crate::output::{fail_store, render};

#[derive(Debug, Serialize)]
struct Groups {
    groups: Vec<String>,
}

pub fn run_groups(session: &Session) -> anyhow::Result<()> {
    let groups =
        list_groups(&session.config.root).map_err(|err| fail_store(session.output, &err))?;
    render(session.output, &Groups { groups }, |g, w| {
        for name in &g.groups {
            writeln!(w, "{name}")?;
        }
        Ok(())
    })
}
