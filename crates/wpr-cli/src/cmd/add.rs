//! `wpr add`: append a task to the current week.

use clap::Args;

use crate::cmd::{Session, TaskView, join_words};
use crate::output::{fail_store, render_mode};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task description; several words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,
}

pub fn run_add(args: &AddArgs, session: &Session) -> anyhow::Result<()> {
    let mut store = session.open()?;
    session.require_editable(&store)?;

    store
        .add_task(&join_words(&args.description))
        .map_err(|err| fail_store(session.output, &err))?;
    session.sync(&mut store)?;

    let id = store.len();
    let Some(task) = store.task(id) else {
        anyhow::bail!("task {id} missing right after add");
    };
    let view = TaskView::new(id, task);

    render_mode(
        session.output,
        &view,
        |v, w| writeln!(w, "{}", v.id),
        |v, w| writeln!(w, "✓ Added task {}: {}", v.id, v.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AddArgs,
    }

    #[test]
    fn add_args_join_words() {
        let w = Wrapper::parse_from(["test", "buy", "milk"]);
        assert_eq!(join_words(&w.args.description), "buy milk");
    }

    #[test]
    fn add_args_require_a_description() {
        assert!(Wrapper::try_parse_from(["test"]).is_err());
    }
}
