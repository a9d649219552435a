//! `wpr memo` and `wpr set-memo`.

use clap::Args;
use serde::Serialize;
use wpr_core::CalendarDate;

use crate::cmd::{Session, join_words};
use crate::output::{render, render_success};

#[derive(Args, Debug)]
pub struct SetMemoArgs {
    /// New memo text. Omit to clear the memo.
    #[arg(num_args = 0..)]
    pub text: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MemoView {
    week_start: CalendarDate,
    memo: String,
}

/// Print the memo of the selected week.
pub fn run_memo(session: &Session) -> anyhow::Result<()> {
    let store = session.open()?;
    let view = MemoView {
        week_start: store.week_start(),
        memo: store.memo().to_string(),
    };
    render(session.output, &view, |v, w| {
        if v.memo.is_empty() || v.memo.ends_with('\n') {
            write!(w, "{}", v.memo)
        } else {
            writeln!(w, "{}", v.memo)
        }
    })
}

/// Replace the memo of the current week and sync it.
pub fn run_set_memo(args: &SetMemoArgs, session: &Session) -> anyhow::Result<()> {
    let mut store = session.open()?;
    session.require_editable(&store)?;

    let text = join_words(&args.text);
    let cleared = text.is_empty();
    store.set_memo(text);
    session.sync(&mut store)?;

    let message = if cleared {
        format!("Cleared memo for week {}", store.week_start())
    } else {
        format!("Updated memo for week {}", store.week_start())
    };
    render_success(session.output, &message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SetMemoArgs,
    }

    #[test]
    fn set_memo_collects_words() {
        let w = Wrapper::parse_from(["test", "focus", "on", "taxes"]);
        assert_eq!(join_words(&w.args.text), "focus on taxes");
    }

    #[test]
    fn set_memo_without_text_clears() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.text.is_empty());
    }
}
