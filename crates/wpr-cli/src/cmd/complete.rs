//! `wpr complete`: mark a task of the current week as done.

use clap::Args;
use serde::Serialize;

use crate::cmd::Session;
use crate::output::{fail_store, render_mode};

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// 1-based task id as shown by `wpr weekly`.
    pub id: usize,
}

#[derive(Debug, Serialize)]
struct Completed {
    id: usize,
    description: String,
    completed: bool,
}

pub fn run_complete(args: &CompleteArgs, session: &Session) -> anyhow::Result<()> {
    let mut store = session.open()?;
    store
        .complete_task(args.id)
        .map_err(|err| fail_store(session.output, &err))?;
    session.sync(&mut store)?;

    let description = store
        .task(args.id)
        .map(|task| task.description().to_string())
        .unwrap_or_default();
    let done = Completed {
        id: args.id,
        description,
        completed: true,
    };

    render_mode(
        session.output,
        &done,
        |v, w| writeln!(w, "{}", v.id),
        |v, w| writeln!(w, "✓ Completed task {}: {}", v.id, v.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CompleteArgs,
    }

    #[test]
    fn complete_args_parse_id() {
        let w = Wrapper::parse_from(["test", "3"]);
        assert_eq!(w.args.id, 3);
    }

    #[test]
    fn complete_args_reject_non_numbers() {
        assert!(Wrapper::try_parse_from(["test", "three"]).is_err());
        assert!(Wrapper::try_parse_from(["test", "-1"]).is_err());
    }
}
